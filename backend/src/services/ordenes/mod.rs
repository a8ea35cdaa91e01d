//! Order-processing endpoint used by the point of sale.

mod create;

use actix_web::web::{post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/ordenes";

/// *   **`POST /`**: create an order from a `CreateOrderRequest`. Returns
///     `CreateOrderResponse` with the sale id, the receipt number and, for card
///     payments, the gateway redirect link.
pub fn configure_routes() -> Scope {
    scope(API_PATH).route("", post().to(create::process))
}
