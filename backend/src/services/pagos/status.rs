use super::find_order;
use crate::db::Database;
use crate::error::ServiceError;
use crate::payments::state::PaymentsState;
use actix_web::{web, HttpResponse};

/// Final statuses come from the tracker; anything else is read from the row,
/// which also covers payments created before a restart.
pub async fn process(
    db: web::Data<Database>,
    payments: web::Data<PaymentsState>,
    id: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    if let Some(status) = payments.status(&id).await {
        if status.is_final() {
            return Ok(HttpResponse::Ok().json(status));
        }
    }
    let conn = db.connect()?;
    let order = find_order(&conn, &id)?;
    Ok(HttpResponse::Ok().json(order.status()))
}
