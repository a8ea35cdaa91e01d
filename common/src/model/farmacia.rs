use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Farmacia {
    pub id: String,
    pub nombre: String,
    pub direccion: String,
    pub telefono: Option<String>,
    /// Free-text business hours, e.g. `"08:00-14:00, 16:00-20:00"`.
    /// Parsed by [`crate::schedule`].
    pub horario: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NuevaFarmacia {
    pub nombre: String,
    pub direccion: String,
    pub telefono: Option<String>,
    pub horario: String,
}
