//! Worker (`trabajadores`) endpoints. Role screens load the worker row first;
//! a missing row is the "missing role record" case and the screen bails out.

use crate::db::{parse_column, Database};
use crate::error::{OptionalRow, ServiceError};
use actix_web::web::{get, post, scope};
use actix_web::{web, HttpResponse, Scope};
use common::model::trabajador::{NuevoTrabajador, Rol, Trabajador};
use log::info;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const API_PATH: &str = "/api/trabajadores";

const TRABAJADOR_COLUMNS: &str = "id, nombre, apellido, email, rol, farmacia_id, cedula";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(create))
        .route("/{id}", get().to(get_one))
}

async fn create(
    db: web::Data<Database>,
    payload: web::Json<NuevoTrabajador>,
) -> Result<HttpResponse, ServiceError> {
    let trabajador = create_trabajador(&db, payload.into_inner())?;
    info!("Created {} {}", trabajador.rol.as_str(), trabajador.id);
    Ok(HttpResponse::Created().json(trabajador))
}

async fn get_one(
    db: web::Data<Database>,
    id: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let conn = db.connect()?;
    Ok(HttpResponse::Ok().json(load_trabajador(&conn, &id)?))
}

pub fn create_trabajador(db: &Database, nuevo: NuevoTrabajador) -> Result<Trabajador, ServiceError> {
    if nuevo.nombre.trim().is_empty() || nuevo.apellido.trim().is_empty() {
        return Err(ServiceError::validation("El nombre y el apellido son obligatorios"));
    }
    if nuevo.email.trim().is_empty() {
        return Err(ServiceError::validation("El correo electrónico es obligatorio"));
    }
    if nuevo.rol == Rol::Doctor && nuevo.cedula.as_deref().is_none_or(|c| c.trim().is_empty()) {
        return Err(ServiceError::validation("Un doctor debe registrar su cédula profesional"));
    }

    let conn = db.connect()?;
    let id = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO trabajadores (id, nombre, apellido, email, rol, farmacia_id, cedula)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            id,
            nuevo.nombre.trim(),
            nuevo.apellido.trim(),
            nuevo.email.trim(),
            nuevo.rol.as_str(),
            nuevo.farmacia_id,
            nuevo.cedula,
        ],
    )?;
    load_trabajador(&conn, &id)
}

pub(crate) fn load_trabajador(conn: &Connection, id: &str) -> Result<Trabajador, ServiceError> {
    conn.query_row(
        &format!("SELECT {TRABAJADOR_COLUMNS} FROM trabajadores WHERE id = ?1"),
        params![id],
        trabajador_from_row,
    )
    .or_not_found("Trabajador")
}

/// Loads the worker and checks its role.
pub(crate) fn require_role(
    conn: &Connection,
    id: &str,
    roles: &[Rol],
) -> Result<Trabajador, ServiceError> {
    let trabajador = load_trabajador(conn, id)?;
    if !roles.contains(&trabajador.rol) {
        return Err(ServiceError::Forbidden(format!(
            "el rol {} no puede realizar esta operación",
            trabajador.rol.as_str()
        )));
    }
    Ok(trabajador)
}

fn trabajador_from_row(row: &Row) -> rusqlite::Result<Trabajador> {
    Ok(Trabajador {
        id: row.get(0)?,
        nombre: row.get(1)?,
        apellido: row.get(2)?,
        email: row.get(3)?,
        rol: parse_column(4, row.get(4)?, Rol::parse)?,
        farmacia_id: row.get(5)?,
        cedula: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{seed_farmacia, test_db};

    #[test]
    fn doctor_needs_cedula_and_roles_are_checked() {
        let t = test_db();
        let farmacia = seed_farmacia(&t.db, "08:00-14:00");

        let mut nuevo = NuevoTrabajador {
            nombre: "Luis".into(),
            apellido: "Pérez".into(),
            email: "luis@example.com".into(),
            rol: Rol::Doctor,
            farmacia_id: Some(farmacia.id.clone()),
            cedula: None,
        };
        assert!(matches!(
            create_trabajador(&t.db, nuevo.clone()),
            Err(ServiceError::Validation(_))
        ));

        nuevo.cedula = Some("1234567".into());
        let doctor = create_trabajador(&t.db, nuevo).unwrap();

        let conn = t.db.connect().unwrap();
        assert!(require_role(&conn, &doctor.id, &[Rol::Doctor]).is_ok());
        assert!(matches!(
            require_role(&conn, &doctor.id, &[Rol::Farmaceutico]),
            Err(ServiceError::Forbidden(_))
        ));
        assert!(matches!(
            require_role(&conn, "nadie", &[Rol::Doctor]),
            Err(ServiceError::NotFound(_))
        ));
    }
}
