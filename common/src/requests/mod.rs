//! Request and response payloads of the API endpoints that are not plain rows.

use crate::model::MetodoPago;
use serde::{Deserialize, Serialize};

/// One requested line of a point-of-sale order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItemRequest {
    pub medicamento_id: String,
    pub cantidad: i64,
}

/// Body of `POST /api/ordenes`.
///
/// `monto_centavos` is the total the client computed; the server rejects the
/// order when it differs from the total of the stored prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub monto_centavos: i64,
    pub carrito: Vec<CartItemRequest>,
    pub paciente_id: Option<String>,
    pub metodo_pago: MetodoPago,
    pub farmacia_id: String,
    pub trabajador_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    pub order_id: String,
    pub numero_recibo: String,
    /// Set for card payments when a payment gateway is configured.
    pub redirect_url: Option<String>,
}

/// Body of `POST /api/citas/{id}/pago`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentPaymentRequest {
    pub monto_centavos: i64,
    pub metodo_pago: MetodoPago,
}

/// Body of the payment gateway callback `POST /api/pagos/{id}/confirmar`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmPaymentRequest {
    pub aprobado: bool,
    pub motivo: Option<String>,
}

/// Response of `GET /api/citas/disponibles`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableSlots {
    pub farmacia_id: String,
    pub fecha: String,
    pub horas: Vec<String>,
}

/// Body of `PUT /api/medicamentos/{id}/unidades`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockUpdate {
    pub unidades: i64,
}

/// Body of `PUT /api/pacientes/{id}/rfid`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RfidLink {
    pub rfid: String,
}

/// Body of `POST /api/recetas/{id}/surtir`: the worker dispensing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispenseRequest {
    pub trabajador_id: String,
}
