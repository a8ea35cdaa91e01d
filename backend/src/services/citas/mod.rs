//! # Appointment Service Module
//!
//! Endpoints under `/api/citas` for the patient booking screen.
//!
//! ## Sub-modules:
//! - `available`: half-hour slots of a pharmacy for a day, minus booked ones.
//! - `book`: books a slot after checking it is still available.
//! - `list`: appointments of a patient, or of a pharmacy for a day; cancellation.
//! - `payment`: the `pago_e_cita` row attached to an appointment.

mod available;
mod book;
mod list;
mod payment;

use crate::db::parse_column;
use crate::error::{OptionalRow, ServiceError};
use actix_web::web::{get, post, scope};
use actix_web::Scope;
use chrono::NaiveDate;
use common::model::cita::{Cita, EstadoCita};
use rusqlite::{params, Connection, Row};

#[cfg(test)]
pub(crate) use book::book_cita;

const API_PATH: &str = "/api/citas";

pub(crate) const CITA_COLUMNS: &str =
    "id, paciente_id, farmacia_id, fecha, hora, motivo, estado";

/// Configures the Actix `Scope` for appointment routes.
///
/// *   **`GET /disponibles?farmacia_id=&fecha=`**: available slot labels.
/// *   **`POST /`**: book (`NuevaCita`), `409` when the slot is taken.
/// *   **`GET /?paciente_id=`** or **`GET /?farmacia_id=&fecha=`**: list.
/// *   **`POST /{id}/cancelar`**: cancel, freeing the slot.
/// *   **`POST /{id}/pago`**: create the appointment payment.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/disponibles", get().to(available::process))
        .route("", post().to(book::process))
        .route("", get().to(list::process))
        .route("/{id}/cancelar", post().to(list::cancel))
        .route("/{id}/pago", post().to(payment::process))
}

pub(crate) fn cita_from_row(row: &Row) -> rusqlite::Result<Cita> {
    Ok(Cita {
        id: row.get(0)?,
        paciente_id: row.get(1)?,
        farmacia_id: row.get(2)?,
        fecha: row.get(3)?,
        hora: row.get(4)?,
        motivo: row.get(5)?,
        estado: parse_column(6, row.get(6)?, EstadoCita::parse)?,
    })
}

pub(crate) fn load_cita(conn: &Connection, id: &str) -> Result<Cita, ServiceError> {
    conn.query_row(
        &format!("SELECT {CITA_COLUMNS} FROM citas WHERE id = ?1"),
        params![id],
        cita_from_row,
    )
    .or_not_found("Cita")
}

/// Parses a `YYYY-MM-DD` date.
pub(crate) fn parse_fecha(fecha: &str) -> Result<NaiveDate, ServiceError> {
    NaiveDate::parse_from_str(fecha.trim(), "%Y-%m-%d")
        .map_err(|_| ServiceError::validation(format!("Fecha inválida '{}', use AAAA-MM-DD", fecha)))
}
