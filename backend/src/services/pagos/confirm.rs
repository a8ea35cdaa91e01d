use super::{find_order, OrderKind};
use crate::db::Database;
use crate::error::ServiceError;
use crate::payments::state::PaymentsState;
use actix_web::{web, HttpResponse};
use common::model::cita::EstadoCita;
use common::model::venta::EstadoVenta;
use common::payments::PaymentStatus;
use common::requests::ConfirmPaymentRequest;
use log::{info, warn};
use rusqlite::{params, Connection};

pub async fn process(
    db: web::Data<Database>,
    payments: web::Data<PaymentsState>,
    id: web::Path<String>,
    payload: web::Json<ConfirmPaymentRequest>,
) -> Result<HttpResponse, ServiceError> {
    let mut conn = db.connect()?;
    let request = payload.into_inner();
    let status = confirm_payment(&mut conn, &id, request.aprobado, request.motivo)?;

    if !payments.send(&id, status.clone()).await {
        warn!("Payment updater is not running; {} stays in the database only", id);
    }
    Ok(HttpResponse::Ok().json(status))
}

/// Settles a pending payment.
///
/// Approved: the row becomes `Pagada` and a paid appointment becomes
/// `Confirmada`. Rejected: the row becomes `Cancelada` and, for a sale, the
/// units it took are put back in stock.
pub(crate) fn confirm_payment(
    conn: &mut Connection,
    id: &str,
    aprobado: bool,
    motivo: Option<String>,
) -> Result<PaymentStatus, ServiceError> {
    let tx = conn.transaction()?;
    let order = find_order(&tx, id)?;
    if order.estado != EstadoVenta::Pendiente {
        return Err(ServiceError::Conflict(format!(
            "El pago {} ya fue procesado",
            order.numero_recibo
        )));
    }

    let table = match order.kind {
        OrderKind::Venta => "ventas",
        OrderKind::Cita { .. } => "pago_e_cita",
    };
    let estado = if aprobado {
        EstadoVenta::Pagada
    } else {
        EstadoVenta::Cancelada
    };
    tx.execute(
        &format!("UPDATE {table} SET estado = ?1 WHERE id = ?2"),
        params![estado.as_str(), order.id],
    )?;

    let status = match (&order.kind, aprobado) {
        (OrderKind::Cita { cita_id }, true) => {
            tx.execute(
                "UPDATE citas SET estado = ?1 WHERE id = ?2 AND estado = ?3",
                params![
                    EstadoCita::Confirmada.as_str(),
                    cita_id,
                    EstadoCita::Programada.as_str()
                ],
            )?;
            PaymentStatus::Confirmado(order.numero_recibo.clone())
        }
        (OrderKind::Venta, true) => PaymentStatus::Confirmado(order.numero_recibo.clone()),
        (OrderKind::Venta, false) => {
            restore_stock(&tx, &order.id)?;
            PaymentStatus::Rechazado(motivo.unwrap_or_else(|| "Pago rechazado".to_string()))
        }
        (OrderKind::Cita { .. }, false) => {
            PaymentStatus::Rechazado(motivo.unwrap_or_else(|| "Pago rechazado".to_string()))
        }
    };
    tx.commit()?;

    info!("Payment {} settled: {:?}", order.numero_recibo, status);
    Ok(status)
}

fn restore_stock(conn: &Connection, venta_id: &str) -> Result<(), ServiceError> {
    let mut stmt =
        conn.prepare("SELECT medicamento_id, cantidad FROM venta_lineas WHERE venta_id = ?1")?;
    let lineas = stmt
        .query_map(params![venta_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;
    for (medicamento_id, cantidad) in lineas {
        conn.execute(
            "UPDATE medicamentos SET unidades = unidades + ?1 WHERE id = ?2",
            params![cantidad, medicamento_id],
        )?;
    }
    Ok(())
}
