//! Pharmacy (`farmacias`) endpoints.
//!
//! Creating a pharmacy checks that its `horario` yields at least one bookable
//! slot; ranges that cannot be parsed are reported back but do not block the
//! insert as long as one range is usable.

use crate::db::Database;
use crate::error::{OptionalRow, ServiceError};
use actix_web::web::{get, post, scope};
use actix_web::{web, HttpResponse, Scope};
use common::model::farmacia::{Farmacia, NuevaFarmacia};
use common::schedule::parse_schedule;
use log::{info, warn};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const API_PATH: &str = "/api/farmacias";

const FARMACIA_COLUMNS: &str = "id, nombre, direccion, telefono, horario";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(create))
        .route("", get().to(list))
        .route("/{id}", get().to(get_one))
}

async fn create(
    db: web::Data<Database>,
    payload: web::Json<NuevaFarmacia>,
) -> Result<HttpResponse, ServiceError> {
    let farmacia = create_farmacia(&db, payload.into_inner())?;
    info!("Created pharmacy {} ({})", farmacia.nombre, farmacia.id);
    Ok(HttpResponse::Created().json(farmacia))
}

async fn list(db: web::Data<Database>) -> Result<HttpResponse, ServiceError> {
    let conn = db.connect()?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {FARMACIA_COLUMNS} FROM farmacias ORDER BY nombre"
    ))?;
    let farmacias = stmt
        .query_map([], farmacia_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(HttpResponse::Ok().json(farmacias))
}

async fn get_one(
    db: web::Data<Database>,
    id: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let conn = db.connect()?;
    Ok(HttpResponse::Ok().json(load_farmacia(&conn, &id)?))
}

pub fn create_farmacia(db: &Database, nueva: NuevaFarmacia) -> Result<Farmacia, ServiceError> {
    if nueva.nombre.trim().is_empty() || nueva.direccion.trim().is_empty() {
        return Err(ServiceError::validation("El nombre y la dirección son obligatorios"));
    }
    let parsed = parse_schedule(&nueva.horario);
    if parsed.ranges.is_empty() {
        return Err(ServiceError::validation(format!(
            "El horario '{}' no contiene ningún rango válido (HH:MM-HH:MM)",
            nueva.horario
        )));
    }
    if !parsed.skipped.is_empty() {
        warn!("Pharmacy {} schedule has unusable ranges: {:?}", nueva.nombre, parsed.skipped);
    }

    let conn = db.connect()?;
    let id = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO farmacias (id, nombre, direccion, telefono, horario) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            id,
            nueva.nombre.trim(),
            nueva.direccion.trim(),
            nueva.telefono,
            nueva.horario.trim(),
        ],
    )?;
    load_farmacia(&conn, &id)
}

pub(crate) fn load_farmacia(conn: &Connection, id: &str) -> Result<Farmacia, ServiceError> {
    conn.query_row(
        &format!("SELECT {FARMACIA_COLUMNS} FROM farmacias WHERE id = ?1"),
        params![id],
        farmacia_from_row,
    )
    .or_not_found("Farmacia")
}

fn farmacia_from_row(row: &Row) -> rusqlite::Result<Farmacia> {
    Ok(Farmacia {
        id: row.get(0)?,
        nombre: row.get(1)?,
        direccion: row.get(2)?,
        telefono: row.get(3)?,
        horario: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::test_db;

    #[test]
    fn rejects_schedule_without_usable_ranges() {
        let t = test_db();
        let nueva = NuevaFarmacia {
            nombre: "Central".into(),
            direccion: "Av. Juárez 10".into(),
            telefono: None,
            horario: "cerrado".into(),
        };
        assert!(matches!(
            create_farmacia(&t.db, nueva.clone()),
            Err(ServiceError::Validation(_))
        ));

        let ok = create_farmacia(
            &t.db,
            NuevaFarmacia {
                horario: "cerrado, 09:00-13:00".into(),
                ..nueva
            },
        )
        .unwrap();
        assert_eq!(ok.horario, "cerrado, 09:00-13:00");
    }
}
