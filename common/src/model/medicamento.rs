use serde::{Deserialize, Serialize};

/// An inventory row: one medication stocked by one pharmacy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medicamento {
    pub id: String,
    pub farmacia_id: String,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub precio_centavos: i64,
    /// On-hand count.
    pub unidades: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NuevoMedicamento {
    pub farmacia_id: String,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub precio_centavos: i64,
    pub unidades: i64,
}
