use serde::{Deserialize, Serialize};

/// Role stored in the `trabajadores` row. Screens check it before letting a
/// worker in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rol {
    Doctor,
    Farmaceutico,
    Administrador,
}

impl Rol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rol::Doctor => "Doctor",
            Rol::Farmaceutico => "Farmaceutico",
            Rol::Administrador => "Administrador",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Doctor" => Some(Rol::Doctor),
            "Farmaceutico" => Some(Rol::Farmaceutico),
            "Administrador" => Some(Rol::Administrador),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trabajador {
    pub id: String,
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    pub rol: Rol,
    pub farmacia_id: Option<String>,
    /// Professional licence number, printed on prescriptions.
    pub cedula: Option<String>,
}

impl Trabajador {
    pub fn nombre_completo(&self) -> String {
        format!("{} {}", self.nombre, self.apellido)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NuevoTrabajador {
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    pub rol: Rol,
    pub farmacia_id: Option<String>,
    pub cedula: Option<String>,
}
