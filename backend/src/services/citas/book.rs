use super::{available::available_for, load_cita, parse_fecha};
use crate::db::Database;
use crate::error::ServiceError;
use crate::services::pacientes::load_paciente;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::model::cita::{Cita, EstadoCita, NuevaCita};
use common::schedule::normalize_label;
use log::info;
use rusqlite::params;
use uuid::Uuid;

pub async fn process(
    db: web::Data<Database>,
    payload: web::Json<NuevaCita>,
) -> Result<HttpResponse, ServiceError> {
    let cita = book_cita(&db, payload.into_inner())?;
    info!(
        "Booked appointment {} at {} {} for pharmacy {}",
        cita.id, cita.fecha, cita.hora, cita.farmacia_id
    );
    Ok(HttpResponse::Created().json(cita))
}

/// Books a slot. The slot must be produced by the pharmacy's schedule and not
/// be held by another appointment; the unique index on
/// (farmacia_id, fecha, hora) catches concurrent bookings of the same slot.
pub fn book_cita(db: &Database, nueva: NuevaCita) -> Result<Cita, ServiceError> {
    let fecha = parse_fecha(&nueva.fecha)?;
    if fecha < Utc::now().date_naive() {
        return Err(ServiceError::validation("No se pueden reservar citas en fechas pasadas"));
    }
    let fecha = fecha.format("%Y-%m-%d").to_string();
    let hora = normalize_label(&nueva.hora)
        .ok_or_else(|| ServiceError::validation(format!("Hora inválida '{}'", nueva.hora)))?;

    let conn = db.connect()?;
    load_paciente(&conn, &nueva.paciente_id)?;

    let disponibles = available_for(&conn, &nueva.farmacia_id, &fecha)?;
    if !disponibles.contains(&hora) {
        return Err(ServiceError::Conflict(format!(
            "El horario {} del {} no está disponible",
            hora, fecha
        )));
    }

    let id = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO citas (id, paciente_id, farmacia_id, fecha, hora, motivo, estado)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            id,
            nueva.paciente_id,
            nueva.farmacia_id,
            fecha,
            hora,
            nueva.motivo.as_deref().map(str::trim).filter(|m| !m.is_empty()),
            EstadoCita::Programada.as_str(),
        ],
    )?;
    load_cita(&conn, &id)
}

#[cfg(test)]
mod tests {
    use crate::services::configure;
    use crate::testing::{seed_farmacia, seed_paciente, test_db};
    use actix_web::{test, web, App};
    use common::model::cita::{Cita, EstadoCita};
    use common::requests::AvailableSlots;
    use serde_json::json;

    const FECHA: &str = "2099-05-04";

    #[actix_web::test]
    async fn booking_removes_slot_and_cancel_frees_it() {
        let t = test_db();
        let farmacia = seed_farmacia(&t.db, "09:00-10:30");
        let paciente = seed_paciente(&t.db);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(t.db.clone()))
                .configure(configure),
        )
        .await;

        let slots_uri = format!(
            "/api/citas/disponibles?farmacia_id={}&fecha={}",
            farmacia.id, FECHA
        );
        let req = test::TestRequest::get().uri(&slots_uri).to_request();
        let slots: AvailableSlots = test::call_and_read_body_json(&app, req).await;
        assert_eq!(slots.horas, vec!["09:00", "09:30", "10:00"]);

        let req = test::TestRequest::post()
            .uri("/api/citas")
            .set_json(json!({
                "paciente_id": paciente.id,
                "farmacia_id": farmacia.id,
                "fecha": FECHA,
                "hora": "9:30",
                "motivo": "Toma de presión"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);
        let cita: Cita = test::read_body_json(resp).await;
        assert_eq!(cita.hora, "09:30");
        assert_eq!(cita.estado, EstadoCita::Programada);

        let req = test::TestRequest::get().uri(&slots_uri).to_request();
        let slots: AvailableSlots = test::call_and_read_body_json(&app, req).await;
        assert_eq!(slots.horas, vec!["09:00", "10:00"]);

        // Same slot again is a conflict.
        let req = test::TestRequest::post()
            .uri("/api/citas")
            .set_json(json!({
                "paciente_id": paciente.id,
                "farmacia_id": farmacia.id,
                "fecha": FECHA,
                "hora": "09:30",
                "motivo": null
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 409);

        let req = test::TestRequest::post()
            .uri(&format!("/api/citas/{}/cancelar", cita.id))
            .to_request();
        let cancelled: Cita = test::call_and_read_body_json(&app, req).await;
        assert_eq!(cancelled.estado, EstadoCita::Cancelada);

        let req = test::TestRequest::get().uri(&slots_uri).to_request();
        let slots: AvailableSlots = test::call_and_read_body_json(&app, req).await;
        assert_eq!(slots.horas, vec!["09:00", "09:30", "10:00"]);

        let req = test::TestRequest::get()
            .uri(&format!("/api/citas?paciente_id={}", paciente.id))
            .to_request();
        let citas: Vec<Cita> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(citas.len(), 1);
    }

    #[actix_web::test]
    async fn booked_slot_stays_open_at_other_pharmacies_and_dates() {
        let t = test_db();
        let centro = seed_farmacia(&t.db, "09:00-10:30");
        let norte = seed_farmacia(&t.db, "09:00-10:30");
        let paciente = seed_paciente(&t.db);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(t.db.clone()))
                .configure(configure),
        )
        .await;

        let book = |farmacia_id: &str, fecha: &str| {
            test::TestRequest::post()
                .uri("/api/citas")
                .set_json(json!({
                    "paciente_id": paciente.id,
                    "farmacia_id": farmacia_id,
                    "fecha": fecha,
                    "hora": "09:30",
                    "motivo": null
                }))
                .to_request()
        };
        let slots = |farmacia_id: &str, fecha: &str| {
            test::TestRequest::get()
                .uri(&format!(
                    "/api/citas/disponibles?farmacia_id={}&fecha={}",
                    farmacia_id, fecha
                ))
                .to_request()
        };

        assert_eq!(test::call_service(&app, book(&centro.id, FECHA)).await.status(), 201);

        let taken: AvailableSlots = test::call_and_read_body_json(&app, slots(&centro.id, FECHA)).await;
        assert_eq!(taken.horas, vec!["09:00", "10:00"]);

        let other_pharmacy: AvailableSlots =
            test::call_and_read_body_json(&app, slots(&norte.id, FECHA)).await;
        assert_eq!(other_pharmacy.horas, vec!["09:00", "09:30", "10:00"]);

        let other_day: AvailableSlots =
            test::call_and_read_body_json(&app, slots(&centro.id, "2099-05-05")).await;
        assert_eq!(other_day.horas, vec!["09:00", "09:30", "10:00"]);

        assert_eq!(test::call_service(&app, book(&norte.id, FECHA)).await.status(), 201);
        assert_eq!(
            test::call_service(&app, book(&centro.id, "2099-05-05")).await.status(),
            201
        );
    }

    #[actix_web::test]
    async fn rejects_slots_outside_schedule_and_bad_dates() {
        let t = test_db();
        let farmacia = seed_farmacia(&t.db, "09:00-10:00");
        let paciente = seed_paciente(&t.db);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(t.db.clone()))
                .configure(configure),
        )
        .await;

        for (fecha, hora, status) in [
            (FECHA, "11:00", 409),
            (FECHA, "09:15", 409),
            (FECHA, "nueve", 400),
            ("2099-13-01", "09:00", 400),
            ("2000-01-01", "09:00", 400),
        ] {
            let req = test::TestRequest::post()
                .uri("/api/citas")
                .set_json(json!({
                    "paciente_id": paciente.id,
                    "farmacia_id": farmacia.id,
                    "fecha": fecha,
                    "hora": hora,
                    "motivo": null
                }))
                .to_request();
            assert_eq!(
                test::call_service(&app, req).await.status(),
                status,
                "{fecha} {hora}"
            );
        }
    }
}
