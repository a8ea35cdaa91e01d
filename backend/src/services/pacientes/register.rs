use super::load_paciente;
use crate::db::Database;
use crate::error::ServiceError;
use actix_web::{web, HttpResponse};
use common::model::paciente::{NuevoPaciente, Paciente};
use common::requests::RfidLink;
use log::info;
use rusqlite::{params, Connection, ErrorCode};
use uuid::Uuid;

const SURECODE_ATTEMPTS: usize = 3;

pub async fn process(
    db: web::Data<Database>,
    payload: web::Json<NuevoPaciente>,
) -> Result<HttpResponse, ServiceError> {
    let paciente = register_paciente(&db, payload.into_inner())?;
    info!("Registered patient {} ({})", paciente.id, paciente.surecode);
    Ok(HttpResponse::Created().json(paciente))
}

pub async fn link_rfid(
    db: web::Data<Database>,
    id: web::Path<String>,
    payload: web::Json<RfidLink>,
) -> Result<HttpResponse, ServiceError> {
    let tag = payload.rfid.trim();
    if tag.is_empty() {
        return Err(ServiceError::validation("La etiqueta RFID está vacía"));
    }
    let conn = db.connect()?;
    let updated = conn.execute(
        "UPDATE pacientes SET rfid = ?1 WHERE id = ?2",
        params![tag, id.as_str()],
    )?;
    if updated == 0 {
        return Err(ServiceError::not_found("Paciente"));
    }
    Ok(HttpResponse::Ok().json(load_paciente(&conn, &id)?))
}

/// Validates the form and inserts the row with a fresh surecode.
pub fn register_paciente(db: &Database, form: NuevoPaciente) -> Result<Paciente, ServiceError> {
    form.validate().map_err(ServiceError::Validation)?;

    let conn = db.connect()?;
    let id = Uuid::new_v4().to_string();
    let creado_en = chrono::Utc::now().to_rfc3339();

    for _ in 0..SURECODE_ATTEMPTS {
        let surecode = new_surecode();
        match insert(&conn, &id, &form, &surecode, &creado_en) {
            Ok(()) => return load_paciente(&conn, &id),
            Err(rusqlite::Error::SqliteFailure(e, Some(msg)))
                if e.code == ErrorCode::ConstraintViolation && msg.contains("surecode") =>
            {
                continue;
            }
            Err(e) => return Err(e.into()),
        }
    }
    Err(ServiceError::Conflict(
        "No se pudo generar un código único, intente de nuevo".to_string(),
    ))
}

fn insert(
    conn: &Connection,
    id: &str,
    form: &NuevoPaciente,
    surecode: &str,
    creado_en: &str,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO pacientes (id, nombre, apellido, email, telefono, fecha_nacimiento, surecode, creado_en)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            id,
            form.nombre.trim(),
            form.apellido.trim(),
            form.email.trim(),
            form.telefono.as_deref().map(str::trim).filter(|t| !t.is_empty()),
            form.fecha_nacimiento.as_deref().filter(|f| !f.is_empty()),
            surecode,
            creado_en,
        ],
    )?;
    Ok(())
}

/// Eight upper-case hex characters taken from a random UUID.
fn new_surecode() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_uppercase()
}
