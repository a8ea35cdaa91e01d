//! # Sales Service Module
//!
//! Read side of the point of sale: the day's sales of a pharmacy, one sale
//! with its lines, and the printable receipt.

use crate::db::{parse_column, Database};
use crate::documents::{recibo_lines, DocumentRenderer};
use crate::error::{OptionalRow, ServiceError};
use crate::services::farmacias::load_farmacia;
use actix_web::web::{get, scope};
use actix_web::{web, HttpResponse, Scope};
use common::model::venta::{EstadoVenta, LineaVenta, Venta};
use common::model::MetodoPago;
use log::info;
use rusqlite::{params, Connection, Row};
use serde::Deserialize;

const API_PATH: &str = "/api/ventas";

const VENTA_COLUMNS: &str = "id, farmacia_id, trabajador_id, paciente_id, total_centavos, \
                             metodo_pago, estado, numero_recibo, creado_en";

#[derive(Debug, Deserialize)]
pub struct VentasQuery {
    pub farmacia_id: String,
    /// `YYYY-MM-DD`; all days when absent.
    pub fecha: Option<String>,
}

/// *   **`GET /?farmacia_id=&fecha=`**: sales of a pharmacy, newest first.
/// *   **`GET /{id}`**: one sale with its lines.
/// *   **`GET /{id}/recibo`**: the receipt as `application/pdf`.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list))
        .route("/{id}", get().to(get_one))
        .route("/{id}/recibo", get().to(receipt))
}

async fn list(
    db: web::Data<Database>,
    query: web::Query<VentasQuery>,
) -> Result<HttpResponse, ServiceError> {
    let conn = db.connect()?;
    let dia = match &query.fecha {
        Some(fecha) => format!("{}%", crate::services::citas::parse_fecha(fecha)?.format("%Y-%m-%d")),
        None => "%".to_string(),
    };
    let mut stmt = conn.prepare(&format!(
        "SELECT {VENTA_COLUMNS} FROM ventas
         WHERE farmacia_id = ?1 AND creado_en LIKE ?2
         ORDER BY creado_en DESC"
    ))?;
    let ventas = stmt
        .query_map(params![query.farmacia_id, dia], venta_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(HttpResponse::Ok().json(ventas))
}

async fn get_one(
    db: web::Data<Database>,
    id: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let conn = db.connect()?;
    Ok(HttpResponse::Ok().json(load_venta(&conn, &id)?))
}

async fn receipt(
    db: web::Data<Database>,
    renderer: web::Data<DocumentRenderer>,
    id: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let conn = db.connect()?;
    let venta = load_venta(&conn, &id)?;
    let farmacia = load_farmacia(&conn, &venta.farmacia_id)?;

    let pdf = renderer.render(&venta.numero_recibo, &recibo_lines(&venta, &farmacia))?;
    info!("Rendered receipt {} ({} bytes)", venta.numero_recibo, pdf.len());
    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header((
            "Content-Disposition",
            format!("inline; filename=\"{}.pdf\"", venta.numero_recibo),
        ))
        .body(pdf))
}

/// Loads a sale and its lines.
pub(crate) fn load_venta(conn: &Connection, id: &str) -> Result<Venta, ServiceError> {
    let mut venta = conn
        .query_row(
            &format!("SELECT {VENTA_COLUMNS} FROM ventas WHERE id = ?1"),
            params![id],
            venta_from_row,
        )
        .or_not_found("Venta")?;

    let mut stmt = conn.prepare(
        "SELECT medicamento_id, nombre, precio_centavos, cantidad
         FROM venta_lineas WHERE venta_id = ?1 ORDER BY rowid",
    )?;
    venta.lineas = stmt
        .query_map(params![id], |row| {
            Ok(LineaVenta {
                medicamento_id: row.get(0)?,
                nombre: row.get(1)?,
                precio_centavos: row.get(2)?,
                cantidad: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(venta)
}

fn venta_from_row(row: &Row) -> rusqlite::Result<Venta> {
    Ok(Venta {
        id: row.get(0)?,
        farmacia_id: row.get(1)?,
        trabajador_id: row.get(2)?,
        paciente_id: row.get(3)?,
        total_centavos: row.get(4)?,
        metodo_pago: parse_column(5, row.get(5)?, MetodoPago::parse)?,
        estado: parse_column(6, row.get(6)?, EstadoVenta::parse)?,
        numero_recibo: row.get(7)?,
        creado_en: row.get(8)?,
        lineas: Vec::new(),
    })
}
