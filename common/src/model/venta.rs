use crate::model::MetodoPago;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstadoVenta {
    Pendiente,
    Pagada,
    Cancelada,
}

impl EstadoVenta {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoVenta::Pendiente => "Pendiente",
            EstadoVenta::Pagada => "Pagada",
            EstadoVenta::Cancelada => "Cancelada",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Pendiente" => Some(EstadoVenta::Pendiente),
            "Pagada" => Some(EstadoVenta::Pagada),
            "Cancelada" => Some(EstadoVenta::Cancelada),
            _ => None,
        }
    }
}

/// A point-of-sale sale (`ventas` row) with its lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venta {
    pub id: String,
    pub farmacia_id: String,
    pub trabajador_id: String,
    pub paciente_id: Option<String>,
    pub total_centavos: i64,
    pub metodo_pago: MetodoPago,
    pub estado: EstadoVenta,
    pub numero_recibo: String,
    pub creado_en: String,
    #[serde(default)]
    pub lineas: Vec<LineaVenta>,
}

/// A sold line. Name and unit price are copied from the inventory row at sale
/// time so later price changes don't rewrite receipts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineaVenta {
    pub medicamento_id: String,
    pub nombre: String,
    pub precio_centavos: i64,
    pub cantidad: i64,
}

impl LineaVenta {
    pub fn subtotal(&self) -> i64 {
        self.precio_centavos * self.cantidad
    }
}
