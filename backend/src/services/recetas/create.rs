use super::load_receta;
use crate::db::Database;
use crate::error::ServiceError;
use crate::services::pacientes::load_paciente;
use crate::services::trabajadores::require_role;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::model::receta::{EstadoReceta, NuevaReceta, Receta};
use common::model::trabajador::Rol;
use log::info;
use rusqlite::params;
use uuid::Uuid;

pub async fn process(
    db: web::Data<Database>,
    payload: web::Json<NuevaReceta>,
) -> Result<HttpResponse, ServiceError> {
    let receta = create_receta(&db, payload.into_inner())?;
    info!(
        "Doctor {} issued prescription {} for patient {}",
        receta.doctor_id, receta.id, receta.paciente_id
    );
    Ok(HttpResponse::Created().json(receta))
}

/// Stores a prescription issued today (UTC). Free-text fields are trimmed; blank
/// `indicaciones` are stored as NULL.
pub fn create_receta(db: &Database, nueva: NuevaReceta) -> Result<Receta, ServiceError> {
    nueva.validate().map_err(ServiceError::Validation)?;

    let conn = db.connect()?;
    require_role(&conn, &nueva.doctor_id, &[Rol::Doctor])?;
    load_paciente(&conn, &nueva.paciente_id)?;

    let id = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO recetas (id, paciente_id, doctor_id, medicamento, dosis, frecuencia, duracion, indicaciones, fecha_emision, estado)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            id,
            nueva.paciente_id,
            nueva.doctor_id,
            nueva.medicamento.trim(),
            nueva.dosis.trim(),
            nueva.frecuencia.trim(),
            nueva.duracion.trim(),
            nueva.indicaciones.as_deref().map(str::trim).filter(|i| !i.is_empty()),
            Utc::now().format("%Y-%m-%d").to_string(),
            EstadoReceta::Pendiente.as_str(),
        ],
    )?;
    load_receta(&conn, &id)
}

#[cfg(test)]
mod tests {
    use crate::services::configure;
    use crate::testing::{seed_farmacia, seed_paciente, seed_trabajador, test_db};
    use actix_web::{test, web, App};
    use common::model::receta::{EstadoReceta, Receta};
    use common::model::trabajador::Rol;
    use serde_json::json;

    #[actix_web::test]
    async fn doctor_writes_and_pharmacist_dispenses() {
        let t = test_db();
        let farmacia = seed_farmacia(&t.db, "08:00-20:00");
        let doctor = seed_trabajador(&t.db, Rol::Doctor, &farmacia.id);
        let farmaceutico = seed_trabajador(&t.db, Rol::Farmaceutico, &farmacia.id);
        let paciente = seed_paciente(&t.db);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(t.db.clone()))
                .configure(configure),
        )
        .await;

        let body = json!({
            "paciente_id": paciente.id,
            "doctor_id": doctor.id,
            "medicamento": " Amoxicilina 500mg ",
            "dosis": "1 cápsula",
            "frecuencia": "cada 8 horas",
            "duracion": "7 días",
            "indicaciones": "  "
        });
        let req = test::TestRequest::post().uri("/api/recetas").set_json(&body).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);
        let receta: Receta = test::read_body_json(resp).await;
        assert_eq!(receta.medicamento, "Amoxicilina 500mg");
        assert_eq!(receta.indicaciones, None);
        assert_eq!(receta.estado, EstadoReceta::Pendiente);

        // A pharmacist cannot write one.
        let mut other = body.clone();
        other["doctor_id"] = json!(farmaceutico.id);
        let req = test::TestRequest::post().uri("/api/recetas").set_json(&other).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 403);

        // Missing dosage.
        let mut other = body.clone();
        other["dosis"] = json!("");
        let req = test::TestRequest::post().uri("/api/recetas").set_json(&other).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 400);

        // A doctor cannot dispense.
        let surtir = format!("/api/recetas/{}/surtir", receta.id);
        let req = test::TestRequest::post()
            .uri(&surtir)
            .set_json(json!({ "trabajador_id": doctor.id }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 403);

        let req = test::TestRequest::post()
            .uri(&surtir)
            .set_json(json!({ "trabajador_id": farmaceutico.id }))
            .to_request();
        let surtida: Receta = test::call_and_read_body_json(&app, req).await;
        assert_eq!(surtida.estado, EstadoReceta::Surtida);

        // Only once.
        let req = test::TestRequest::post()
            .uri(&surtir)
            .set_json(json!({ "trabajador_id": farmaceutico.id }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 409);

        let req = test::TestRequest::get()
            .uri(&format!("/api/recetas?paciente_id={}", paciente.id))
            .to_request();
        let recetas: Vec<Receta> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(recetas, vec![surtida]);
    }

    #[::core::prelude::v1::test]
    fn issue_date_is_the_utc_day() {
        let t = test_db();
        let farmacia = seed_farmacia(&t.db, "08:00-20:00");
        let doctor = seed_trabajador(&t.db, Rol::Doctor, &farmacia.id);
        let paciente = seed_paciente(&t.db);

        let before = chrono::Utc::now().format("%Y-%m-%d").to_string();
        let receta = super::create_receta(
            &t.db,
            common::model::receta::NuevaReceta {
                paciente_id: paciente.id,
                doctor_id: doctor.id,
                medicamento: "Losartán 50mg".into(),
                dosis: "1 tableta".into(),
                frecuencia: "cada 24 horas".into(),
                duracion: "30 días".into(),
                indicaciones: Some("   ".into()),
            },
        )
        .unwrap();
        let after = chrono::Utc::now().format("%Y-%m-%d").to_string();

        assert!(receta.fecha_emision == before || receta.fecha_emision == after);
        assert_eq!(receta.indicaciones, None);
    }
}
