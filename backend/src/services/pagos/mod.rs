//! # Payment Service Module
//!
//! `/api/pagos/{id}` covers both kinds of payable rows: point-of-sale sales
//! (`ventas`) and appointment payments (`pago_e_cita`). The id is looked up in
//! `ventas` first.
//!
//! ## Sub-modules:
//! - `status`: polled by the frontend while a card payment is pending.
//! - `confirm`: gateway callback that settles or rejects a pending payment.

mod confirm;
mod status;

use crate::db::parse_column;
use crate::error::{OptionalRow, ServiceError};
use actix_web::web::{get, post, scope};
use actix_web::Scope;
use common::model::venta::EstadoVenta;
use common::payments::PaymentStatus;
use rusqlite::{params, Connection, OptionalExtension};

#[cfg(test)]
pub(crate) use confirm::confirm_payment;

const API_PATH: &str = "/api/pagos";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/{id}/estado", get().to(status::process))
        .route("/{id}/confirmar", post().to(confirm::process))
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum OrderKind {
    Venta,
    Cita { cita_id: String },
}

/// The payable row behind an order id.
#[derive(Debug, Clone)]
pub(crate) struct OrderRecord {
    pub id: String,
    pub kind: OrderKind,
    pub estado: EstadoVenta,
    pub numero_recibo: String,
}

impl OrderRecord {
    pub fn status(&self) -> PaymentStatus {
        match self.estado {
            EstadoVenta::Pendiente => PaymentStatus::Pendiente,
            EstadoVenta::Pagada => PaymentStatus::Confirmado(self.numero_recibo.clone()),
            EstadoVenta::Cancelada => PaymentStatus::Rechazado("Pago rechazado".to_string()),
        }
    }
}

pub(crate) fn find_order(conn: &Connection, id: &str) -> Result<OrderRecord, ServiceError> {
    let venta = conn
        .query_row(
            "SELECT estado, numero_recibo FROM ventas WHERE id = ?1",
            params![id],
            |row| {
                Ok(OrderRecord {
                    id: id.to_string(),
                    kind: OrderKind::Venta,
                    estado: parse_column(0, row.get(0)?, EstadoVenta::parse)?,
                    numero_recibo: row.get(1)?,
                })
            },
        )
        .optional()?;
    if let Some(venta) = venta {
        return Ok(venta);
    }

    conn.query_row(
        "SELECT estado, numero_recibo, cita_id FROM pago_e_cita WHERE id = ?1",
        params![id],
        |row| {
            Ok(OrderRecord {
                id: id.to_string(),
                kind: OrderKind::Cita {
                    cita_id: row.get(2)?,
                },
                estado: parse_column(0, row.get(0)?, EstadoVenta::parse)?,
                numero_recibo: row.get(1)?,
            })
        },
    )
    .or_not_found("Pago")
}
