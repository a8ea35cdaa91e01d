use serde::{Deserialize, Serialize};

/// Consultation fee charged when an appointment is paid ahead, in centavos.
pub const CONSULTA_CENTAVOS: i64 = 25_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstadoCita {
    Programada,
    Confirmada,
    Cancelada,
    Completada,
}

impl EstadoCita {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoCita::Programada => "Programada",
            EstadoCita::Confirmada => "Confirmada",
            EstadoCita::Cancelada => "Cancelada",
            EstadoCita::Completada => "Completada",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Programada" => Some(EstadoCita::Programada),
            "Confirmada" => Some(EstadoCita::Confirmada),
            "Cancelada" => Some(EstadoCita::Cancelada),
            "Completada" => Some(EstadoCita::Completada),
            _ => None,
        }
    }
}

/// An appointment (`citas` row). `fecha` is `YYYY-MM-DD`, `hora` a slot
/// label `HH:MM`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cita {
    pub id: String,
    pub paciente_id: String,
    pub farmacia_id: String,
    pub fecha: String,
    pub hora: String,
    pub motivo: Option<String>,
    pub estado: EstadoCita,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NuevaCita {
    pub paciente_id: String,
    pub farmacia_id: String,
    pub fecha: String,
    pub hora: String,
    pub motivo: Option<String>,
}
