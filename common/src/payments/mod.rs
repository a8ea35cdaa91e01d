use serde::{Deserialize, Serialize};

/// Status of a card payment as reported by `GET /api/pagos/{id}/estado`.
///
/// Cash payments are reported as `Confirmado` right away. The frontend keeps
/// polling while the status is `Pendiente`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pendiente,
    /// Carries the receipt number.
    Confirmado(String),
    /// Carries the gateway's rejection reason.
    Rechazado(String),
}

impl PaymentStatus {
    pub fn is_final(&self) -> bool {
        !matches!(self, PaymentStatus::Pendiente)
    }
}
