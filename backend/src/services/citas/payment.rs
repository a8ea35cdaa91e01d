use super::load_cita;
use crate::db::Database;
use crate::error::ServiceError;
use crate::payments::state::PaymentsState;
use crate::payments::{numero_recibo, PaymentGateway};
use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::cart::format_centavos;
use common::model::cita::{EstadoCita, CONSULTA_CENTAVOS};
use common::model::venta::EstadoVenta;
use common::model::MetodoPago;
use common::requests::{AppointmentPaymentRequest, CreateOrderResponse};
use log::info;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

pub async fn process(
    db: web::Data<Database>,
    payments: web::Data<PaymentsState>,
    gateway: web::Data<PaymentGateway>,
    cita_id: web::Path<String>,
    payload: web::Json<AppointmentPaymentRequest>,
) -> Result<HttpResponse, ServiceError> {
    let mut conn = db.connect()?;
    let request = payload.into_inner();
    let (pago_id, numero) = create_appointment_payment(&mut conn, &cita_id, &request)?;

    let redirect_url = match request.metodo_pago {
        MetodoPago::Tarjeta => {
            payments.register_pending(&pago_id).await;
            gateway.checkout_url(&pago_id)
        }
        MetodoPago::Efectivo => None,
    };
    info!(
        "Appointment payment {} for {} ({})",
        numero,
        cita_id,
        request.metodo_pago.as_str()
    );

    Ok(HttpResponse::Created().json(CreateOrderResponse {
        order_id: pago_id,
        numero_recibo: numero,
        redirect_url,
    }))
}

/// Inserts the `pago_e_cita` row. The amount must be the consultation fee.
/// Cash confirms the appointment at once; card payments stay `Pendiente`
/// until the gateway calls back.
pub(crate) fn create_appointment_payment(
    conn: &mut Connection,
    cita_id: &str,
    request: &AppointmentPaymentRequest,
) -> Result<(String, String), ServiceError> {
    if request.monto_centavos != CONSULTA_CENTAVOS {
        return Err(ServiceError::validation(format!(
            "El monto {} no coincide con la tarifa de consulta {}",
            format_centavos(request.monto_centavos),
            format_centavos(CONSULTA_CENTAVOS)
        )));
    }

    let tx = conn.transaction()?;
    let cita = load_cita(&tx, cita_id)?;
    if matches!(cita.estado, EstadoCita::Cancelada | EstadoCita::Completada) {
        return Err(ServiceError::Conflict(format!(
            "No se puede pagar una cita {}",
            cita.estado.as_str().to_lowercase()
        )));
    }
    let existing: Option<String> = tx
        .query_row(
            "SELECT numero_recibo FROM pago_e_cita WHERE cita_id = ?1 AND estado <> ?2",
            params![cita_id, EstadoVenta::Cancelada.as_str()],
            |row| row.get(0),
        )
        .optional()?;
    if let Some(numero) = existing {
        return Err(ServiceError::Conflict(format!(
            "La cita ya tiene un pago registrado ({})",
            numero
        )));
    }

    let id = Uuid::new_v4().to_string();
    let now = Utc::now();
    let numero = numero_recibo(now, &id);
    let estado = match request.metodo_pago {
        MetodoPago::Efectivo => EstadoVenta::Pagada,
        MetodoPago::Tarjeta => EstadoVenta::Pendiente,
    };
    tx.execute(
        "INSERT INTO pago_e_cita (id, cita_id, monto_centavos, metodo_pago, estado, numero_recibo, creado_en)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            id,
            cita_id,
            request.monto_centavos,
            request.metodo_pago.as_str(),
            estado.as_str(),
            numero,
            now.to_rfc3339(),
        ],
    )?;
    if estado == EstadoVenta::Pagada {
        tx.execute(
            "UPDATE citas SET estado = ?1 WHERE id = ?2",
            params![EstadoCita::Confirmada.as_str(), cita_id],
        )?;
    }
    tx.commit()?;
    Ok((id, numero))
}
