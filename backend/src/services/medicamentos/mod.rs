//! Inventory (`medicamentos`) endpoints used by the point of sale.

use crate::db::Database;
use crate::error::{OptionalRow, ServiceError};
use crate::services::farmacias::load_farmacia;
use actix_web::web::{get, post, put, scope};
use actix_web::{web, HttpResponse, Scope};
use common::model::medicamento::{Medicamento, NuevoMedicamento};
use common::requests::StockUpdate;
use log::info;
use rusqlite::{params, Connection, Row};
use serde::Deserialize;
use uuid::Uuid;

const API_PATH: &str = "/api/medicamentos";

const MEDICAMENTO_COLUMNS: &str =
    "id, farmacia_id, nombre, descripcion, precio_centavos, unidades";

/// Query of `GET /api/medicamentos`.
#[derive(Debug, Deserialize)]
pub struct InventoryQuery {
    pub farmacia_id: String,
    /// Case-insensitive substring of the name.
    pub q: Option<String>,
}

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(create))
        .route("", get().to(search))
        .route("/{id}", get().to(get_one))
        .route("/{id}/unidades", put().to(set_stock))
}

async fn create(
    db: web::Data<Database>,
    payload: web::Json<NuevoMedicamento>,
) -> Result<HttpResponse, ServiceError> {
    let medicamento = create_medicamento(&db, payload.into_inner())?;
    Ok(HttpResponse::Created().json(medicamento))
}

async fn search(
    db: web::Data<Database>,
    query: web::Query<InventoryQuery>,
) -> Result<HttpResponse, ServiceError> {
    let conn = db.connect()?;
    let pattern = format!("%{}%", escape_like(query.q.as_deref().unwrap_or("").trim()));
    let mut stmt = conn.prepare(&format!(
        "SELECT {MEDICAMENTO_COLUMNS} FROM medicamentos
         WHERE farmacia_id = ?1 AND nombre LIKE ?2 ESCAPE '\\'
         ORDER BY nombre"
    ))?;
    let medicamentos = stmt
        .query_map(params![query.farmacia_id, pattern], medicamento_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(HttpResponse::Ok().json(medicamentos))
}

async fn get_one(
    db: web::Data<Database>,
    id: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let conn = db.connect()?;
    Ok(HttpResponse::Ok().json(load_medicamento(&conn, &id)?))
}

async fn set_stock(
    db: web::Data<Database>,
    id: web::Path<String>,
    payload: web::Json<StockUpdate>,
) -> Result<HttpResponse, ServiceError> {
    if payload.unidades < 0 {
        return Err(ServiceError::validation("Las unidades no pueden ser negativas"));
    }
    let conn = db.connect()?;
    let updated = conn.execute(
        "UPDATE medicamentos SET unidades = ?1 WHERE id = ?2",
        params![payload.unidades, id.as_str()],
    )?;
    if updated == 0 {
        return Err(ServiceError::not_found("Medicamento"));
    }
    info!("Stock of {} set to {}", id, payload.unidades);
    Ok(HttpResponse::Ok().json(load_medicamento(&conn, &id)?))
}

pub fn create_medicamento(
    db: &Database,
    nuevo: NuevoMedicamento,
) -> Result<Medicamento, ServiceError> {
    if nuevo.nombre.trim().is_empty() {
        return Err(ServiceError::validation("El nombre del medicamento es obligatorio"));
    }
    if nuevo.precio_centavos < 0 || nuevo.unidades < 0 {
        return Err(ServiceError::validation("El precio y las unidades no pueden ser negativos"));
    }

    let conn = db.connect()?;
    load_farmacia(&conn, &nuevo.farmacia_id)?;
    let id = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO medicamentos (id, farmacia_id, nombre, descripcion, precio_centavos, unidades)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            id,
            nuevo.farmacia_id,
            nuevo.nombre.trim(),
            nuevo.descripcion,
            nuevo.precio_centavos,
            nuevo.unidades,
        ],
    )?;
    load_medicamento(&conn, &id)
}

pub(crate) fn load_medicamento(conn: &Connection, id: &str) -> Result<Medicamento, ServiceError> {
    conn.query_row(
        &format!("SELECT {MEDICAMENTO_COLUMNS} FROM medicamentos WHERE id = ?1"),
        params![id],
        medicamento_from_row,
    )
    .or_not_found("Medicamento")
}

/// Makes `%`, `_` and `\` match literally in a `LIKE ... ESCAPE '\'` pattern.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn medicamento_from_row(row: &Row) -> rusqlite::Result<Medicamento> {
    Ok(Medicamento {
        id: row.get(0)?,
        farmacia_id: row.get(1)?,
        nombre: row.get(2)?,
        descripcion: row.get(3)?,
        precio_centavos: row.get(4)?,
        unidades: row.get(5)?,
    })
}
