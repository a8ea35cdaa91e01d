use super::{cita_from_row, load_cita, parse_fecha, CITA_COLUMNS};
use crate::db::Database;
use crate::error::ServiceError;
use actix_web::{web, HttpResponse};
use common::model::cita::{Cita, EstadoCita};
use log::info;
use rusqlite::{params, Connection};
use serde::Deserialize;

/// Either `paciente_id`, or `farmacia_id` together with `fecha`.
#[derive(Debug, Deserialize)]
pub struct CitasQuery {
    pub paciente_id: Option<String>,
    pub farmacia_id: Option<String>,
    pub fecha: Option<String>,
}

pub async fn process(
    db: web::Data<Database>,
    query: web::Query<CitasQuery>,
) -> Result<HttpResponse, ServiceError> {
    let conn = db.connect()?;
    let citas = match (&query.paciente_id, &query.farmacia_id, &query.fecha) {
        (Some(paciente_id), _, _) => select(
            &conn,
            "paciente_id = ?1 ORDER BY fecha, hora",
            &[paciente_id.as_str()],
        )?,
        (None, Some(farmacia_id), Some(fecha)) => {
            let fecha = parse_fecha(fecha)?.format("%Y-%m-%d").to_string();
            select(
                &conn,
                "farmacia_id = ?1 AND fecha = ?2 ORDER BY hora",
                &[farmacia_id.as_str(), fecha.as_str()],
            )?
        }
        _ => {
            return Err(ServiceError::validation(
                "Indique paciente_id, o farmacia_id y fecha",
            ))
        }
    };
    Ok(HttpResponse::Ok().json(citas))
}

pub async fn cancel(
    db: web::Data<Database>,
    id: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let conn = db.connect()?;
    let cita = cancel_cita(&conn, &id)?;
    info!("Cancelled appointment {}", cita.id);
    Ok(HttpResponse::Ok().json(cita))
}

/// Cancels a scheduled or confirmed appointment.
pub(crate) fn cancel_cita(conn: &Connection, id: &str) -> Result<Cita, ServiceError> {
    let updated = conn.execute(
        "UPDATE citas SET estado = ?1 WHERE id = ?2 AND estado IN (?3, ?4)",
        params![
            EstadoCita::Cancelada.as_str(),
            id,
            EstadoCita::Programada.as_str(),
            EstadoCita::Confirmada.as_str(),
        ],
    )?;
    let cita = load_cita(conn, id)?;
    if updated == 0 {
        return Err(ServiceError::Conflict(format!(
            "La cita ya está {}",
            cita.estado.as_str().to_lowercase()
        )));
    }
    Ok(cita)
}

// `filter` is one of the literal WHERE clauses above.
fn select(conn: &Connection, filter: &str, args: &[&str]) -> Result<Vec<Cita>, ServiceError> {
    let mut stmt = conn.prepare(&format!("SELECT {CITA_COLUMNS} FROM citas WHERE {filter}"))?;
    let citas = stmt
        .query_map(rusqlite::params_from_iter(args), cita_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(citas)
}
