use super::{load_receta, receta_from_row, RECETA_COLUMNS};
use crate::db::Database;
use crate::error::ServiceError;
use crate::services::trabajadores::require_role;
use actix_web::{web, HttpResponse};
use common::model::receta::EstadoReceta;
use common::model::trabajador::Rol;
use common::requests::DispenseRequest;
use log::info;
use rusqlite::params;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RecetasQuery {
    pub paciente_id: String,
}

pub async fn process(
    db: web::Data<Database>,
    id: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let conn = db.connect()?;
    Ok(HttpResponse::Ok().json(load_receta(&conn, &id)?))
}

pub async fn list(
    db: web::Data<Database>,
    query: web::Query<RecetasQuery>,
) -> Result<HttpResponse, ServiceError> {
    let conn = db.connect()?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {RECETA_COLUMNS} FROM recetas
         WHERE paciente_id = ?1
         ORDER BY fecha_emision DESC, rowid DESC"
    ))?;
    let recetas = stmt
        .query_map(params![query.paciente_id], receta_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(HttpResponse::Ok().json(recetas))
}

/// `Pendiente` to `Surtida`, by a pharmacist or an administrator.
pub async fn dispense(
    db: web::Data<Database>,
    id: web::Path<String>,
    payload: web::Json<DispenseRequest>,
) -> Result<HttpResponse, ServiceError> {
    let conn = db.connect()?;
    let trabajador = require_role(
        &conn,
        &payload.trabajador_id,
        &[Rol::Farmaceutico, Rol::Administrador],
    )?;
    let receta = load_receta(&conn, &id)?;
    if receta.estado != EstadoReceta::Pendiente {
        return Err(ServiceError::Conflict(format!(
            "La receta {} ya fue surtida",
            receta.id
        )));
    }

    conn.execute(
        "UPDATE recetas SET estado = ?1 WHERE id = ?2 AND estado = ?3",
        params![
            EstadoReceta::Surtida.as_str(),
            receta.id,
            EstadoReceta::Pendiente.as_str()
        ],
    )?;
    info!("Prescription {} dispensed by {}", receta.id, trabajador.id);
    Ok(HttpResponse::Ok().json(load_receta(&conn, &id)?))
}
