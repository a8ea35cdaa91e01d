use super::load_receta;
use crate::db::Database;
use crate::documents::{receta_lines, DocumentRenderer};
use crate::error::ServiceError;
use crate::services::pacientes::load_paciente;
use crate::services::trabajadores::load_trabajador;
use actix_web::{web, HttpResponse};
use log::info;

pub async fn process(
    db: web::Data<Database>,
    renderer: web::Data<DocumentRenderer>,
    id: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let conn = db.connect()?;
    let receta = load_receta(&conn, &id)?;
    let paciente = load_paciente(&conn, &receta.paciente_id)?;
    let doctor = load_trabajador(&conn, &receta.doctor_id)?;

    let title = format!("Receta {}", paciente.nombre_completo());
    let pdf = renderer.render(&title, &receta_lines(&receta, &paciente, &doctor))?;
    info!("Rendered prescription {} ({} bytes)", receta.id, pdf.len());

    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header((
            "Content-Disposition",
            format!("inline; filename=\"receta-{}.pdf\"", receta.id),
        ))
        .body(pdf))
}
