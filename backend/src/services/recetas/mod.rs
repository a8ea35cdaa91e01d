//! # Prescription Service Module
//!
//! Endpoints under `/api/recetas`. Doctors write prescriptions, pharmacists
//! and administrators mark them as dispensed, and any screen can print one.
//!
//! ## Sub-modules:
//! - `create`: writes a prescription for a registered patient.
//! - `get`: one prescription, a patient's prescriptions, dispensing.
//! - `pdf`: the printable prescription.

mod create;
mod get;
mod pdf;

use crate::db::parse_column;
use crate::error::{OptionalRow, ServiceError};
use actix_web::web::{get, post, scope};
use actix_web::Scope;
use common::model::receta::{EstadoReceta, Receta};
use rusqlite::{params, Connection, Row};

const API_PATH: &str = "/api/recetas";

pub(crate) const RECETA_COLUMNS: &str = "id, paciente_id, doctor_id, medicamento, dosis, \
                                         frecuencia, duracion, indicaciones, fecha_emision, estado";

/// *   **`POST /`**: write a prescription (`NuevaReceta`); the author must be a
///     doctor.
/// *   **`GET /?paciente_id=`**: a patient's prescriptions, newest first.
/// *   **`GET /{id}`**: one prescription.
/// *   **`POST /{id}/surtir`**: mark as dispensed (`DispenseRequest`).
/// *   **`GET /{id}/pdf`**: the prescription as `application/pdf`.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(create::process))
        .route("", get().to(get::list))
        .route("/{id}", get().to(get::process))
        .route("/{id}/surtir", post().to(get::dispense))
        .route("/{id}/pdf", get().to(pdf::process))
}

pub(crate) fn receta_from_row(row: &Row) -> rusqlite::Result<Receta> {
    Ok(Receta {
        id: row.get(0)?,
        paciente_id: row.get(1)?,
        doctor_id: row.get(2)?,
        medicamento: row.get(3)?,
        dosis: row.get(4)?,
        frecuencia: row.get(5)?,
        duracion: row.get(6)?,
        indicaciones: row.get(7)?,
        fecha_emision: row.get(8)?,
        estado: parse_column(9, row.get(9)?, EstadoReceta::parse)?,
    })
}

pub(crate) fn load_receta(conn: &Connection, id: &str) -> Result<Receta, ServiceError> {
    conn.query_row(
        &format!("SELECT {RECETA_COLUMNS} FROM recetas WHERE id = ?1"),
        params![id],
        receta_from_row,
    )
    .or_not_found("Receta")
}
