use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstadoReceta {
    Pendiente,
    Surtida,
}

impl EstadoReceta {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoReceta::Pendiente => "Pendiente",
            EstadoReceta::Surtida => "Surtida",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Pendiente" => Some(EstadoReceta::Pendiente),
            "Surtida" => Some(EstadoReceta::Surtida),
            _ => None,
        }
    }
}

/// A prescription written by a doctor for a patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receta {
    pub id: String,
    pub paciente_id: String,
    pub doctor_id: String,
    pub medicamento: String,
    pub dosis: String,
    pub frecuencia: String,
    pub duracion: String,
    pub indicaciones: Option<String>,
    pub fecha_emision: String,
    pub estado: EstadoReceta,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NuevaReceta {
    pub paciente_id: String,
    pub doctor_id: String,
    pub medicamento: String,
    pub dosis: String,
    pub frecuencia: String,
    pub duracion: String,
    pub indicaciones: Option<String>,
}

impl NuevaReceta {
    pub fn validate(&self) -> Result<(), String> {
        let required = [
            ("paciente", &self.paciente_id),
            ("doctor", &self.doctor_id),
            ("medicamento", &self.medicamento),
            ("dosis", &self.dosis),
            ("frecuencia", &self.frecuencia),
            ("duración", &self.duracion),
        ];
        for (campo, valor) in required {
            if valor.trim().is_empty() {
                return Err(format!("El campo {} es obligatorio", campo));
            }
        }
        Ok(())
    }
}
