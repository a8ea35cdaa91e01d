use super::{paciente_from_row, PACIENTE_COLUMNS};
use crate::db::Database;
use crate::error::{OptionalRow, ServiceError};
use actix_web::{web, HttpResponse};
use common::model::paciente::Paciente;
use rusqlite::{params, Connection};

pub async fn process(
    db: web::Data<Database>,
    id: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let conn = db.connect()?;
    Ok(HttpResponse::Ok().json(load_paciente(&conn, &id)?))
}

pub async fn by_surecode(
    db: web::Data<Database>,
    code: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let conn = db.connect()?;
    let code = code.trim().to_uppercase();
    Ok(HttpResponse::Ok().json(find_by(&conn, "surecode", &code)?))
}

pub async fn by_rfid(
    db: web::Data<Database>,
    tag: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let conn = db.connect()?;
    Ok(HttpResponse::Ok().json(find_by(&conn, "rfid", tag.trim())?))
}

pub(crate) fn load_paciente(conn: &Connection, id: &str) -> Result<Paciente, ServiceError> {
    find_by(conn, "id", id)
}

// `column` is always one of the literals above.
fn find_by(conn: &Connection, column: &str, value: &str) -> Result<Paciente, ServiceError> {
    conn.query_row(
        &format!("SELECT {PACIENTE_COLUMNS} FROM pacientes WHERE {column} = ?1"),
        params![value],
        paciente_from_row,
    )
    .or_not_found("Paciente")
}
