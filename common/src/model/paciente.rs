use serde::{Deserialize, Serialize};

/// A registered patient (`pacientes` row).
///
/// `surecode` is the short code a patient gives at the counter instead of an
/// RFID tag. It is generated by the backend on registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paciente {
    pub id: String,
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    pub telefono: Option<String>,
    pub fecha_nacimiento: Option<String>,
    pub surecode: String,
    pub rfid: Option<String>,
    pub creado_en: String,
}

impl Paciente {
    pub fn nombre_completo(&self) -> String {
        format!("{} {}", self.nombre, self.apellido)
    }
}

/// Registration form payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NuevoPaciente {
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    pub telefono: Option<String>,
    pub fecha_nacimiento: Option<String>,
}

impl NuevoPaciente {
    /// Required-field check run on both sides before the row is written.
    pub fn validate(&self) -> Result<(), String> {
        if self.nombre.trim().is_empty() || self.apellido.trim().is_empty() {
            return Err("El nombre y el apellido son obligatorios".to_string());
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err("El correo electrónico es obligatorio".to_string());
        }
        if !(email.contains('@') && email.contains('.')) {
            return Err("El correo electrónico no es válido".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> NuevoPaciente {
        NuevoPaciente {
            nombre: "Ana".into(),
            apellido: "López".into(),
            email: "ana@example.com".into(),
            ..Default::default()
        }
    }

    #[test]
    fn accepts_complete_form() {
        assert!(form().validate().is_ok());
    }

    #[test]
    fn rejects_missing_names_and_bad_email() {
        let mut f = form();
        f.apellido = "  ".into();
        assert!(f.validate().is_err());

        let mut f = form();
        f.email = "ana.example.com".into();
        assert!(f.validate().is_err());
    }
}
