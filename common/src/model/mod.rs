//! Row models shared by the backend store and the frontend screens.
//!
//! Field names follow the column names of the relational schema
//! (`pacientes`, `trabajadores`, `farmacias`, `medicamentos`, `citas`,
//! `recetas`, `ventas`, `pago_e_cita`) so the JSON on the wire matches the rows.
//! Money is always integer centavos.

pub mod cita;
pub mod farmacia;
pub mod medicamento;
pub mod paciente;
pub mod receta;
pub mod trabajador;
pub mod venta;

use serde::{Deserialize, Serialize};

/// How a sale or an appointment payment is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetodoPago {
    Efectivo,
    Tarjeta,
}

impl MetodoPago {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetodoPago::Efectivo => "Efectivo",
            MetodoPago::Tarjeta => "Tarjeta",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Efectivo" => Some(MetodoPago::Efectivo),
            "Tarjeta" => Some(MetodoPago::Tarjeta),
            _ => None,
        }
    }
}
