//! # Patient Service Module
//!
//! Endpoints under `/api/pacientes`: registration from the landing page and
//! the three ways a screen identifies a patient (row id, surecode typed by
//! the patient, RFID tag read at the counter).
//!
//! ## Sub-modules:
//! - `register`: creates the row and its surecode, links RFID tags.
//! - `get`: lookups by id, surecode and RFID.

mod get;
mod register;

use actix_web::web::{get, post, put, scope};
use actix_web::Scope;
use common::model::paciente::Paciente;
use rusqlite::Row;

pub(crate) use get::load_paciente;
#[cfg(test)]
pub(crate) use register::register_paciente;

const API_PATH: &str = "/api/pacientes";

pub(crate) const PACIENTE_COLUMNS: &str =
    "id, nombre, apellido, email, telefono, fecha_nacimiento, surecode, rfid, creado_en";

/// Configures the Actix `Scope` for patient routes.
///
/// *   **`POST /`**: register a patient (`NuevoPaciente` JSON), returns the row
///     with its generated surecode.
/// *   **`GET /{id}`**, **`GET /surecode/{code}`**, **`GET /rfid/{tag}`**:
///     lookups, `404` when no row matches.
/// *   **`PUT /{id}/rfid`**: link an RFID tag to the patient.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(register::process))
        .route("/surecode/{code}", get().to(get::by_surecode))
        .route("/rfid/{tag}", get().to(get::by_rfid))
        .route("/{id}", get().to(get::process))
        .route("/{id}/rfid", put().to(register::link_rfid))
}

pub(crate) fn paciente_from_row(row: &Row) -> rusqlite::Result<Paciente> {
    Ok(Paciente {
        id: row.get(0)?,
        nombre: row.get(1)?,
        apellido: row.get(2)?,
        email: row.get(3)?,
        telefono: row.get(4)?,
        fecha_nacimiento: row.get(5)?,
        surecode: row.get(6)?,
        rfid: row.get(7)?,
        creado_en: row.get(8)?,
    })
}
