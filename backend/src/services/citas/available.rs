use super::parse_fecha;
use crate::db::Database;
use crate::error::ServiceError;
use crate::services::farmacias::load_farmacia;
use actix_web::{web, HttpResponse};
use common::requests::AvailableSlots;
use common::schedule::available_slots;
use rusqlite::{params, Connection};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SlotQuery {
    pub farmacia_id: String,
    pub fecha: String,
}

pub async fn process(
    db: web::Data<Database>,
    query: web::Query<SlotQuery>,
) -> Result<HttpResponse, ServiceError> {
    let fecha = parse_fecha(&query.fecha)?.format("%Y-%m-%d").to_string();
    let conn = db.connect()?;
    let horas = available_for(&conn, &query.farmacia_id, &fecha)?;
    Ok(HttpResponse::Ok().json(AvailableSlots {
        farmacia_id: query.farmacia_id.clone(),
        fecha,
        horas,
    }))
}

/// Slots of the pharmacy's schedule not held by a non-cancelled appointment.
pub(crate) fn available_for(
    conn: &Connection,
    farmacia_id: &str,
    fecha: &str,
) -> Result<Vec<String>, ServiceError> {
    let farmacia = load_farmacia(conn, farmacia_id)?;
    let booked = booked_hours(conn, farmacia_id, fecha)?;
    Ok(available_slots(&farmacia.horario, &booked))
}

fn booked_hours(
    conn: &Connection,
    farmacia_id: &str,
    fecha: &str,
) -> Result<Vec<String>, ServiceError> {
    let mut stmt = conn.prepare(
        "SELECT hora FROM citas WHERE farmacia_id = ?1 AND fecha = ?2 AND estado <> 'Cancelada'",
    )?;
    let horas = stmt
        .query_map(params![farmacia_id, fecha], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(horas)
}
