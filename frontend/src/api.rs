//! Thin JSON helpers over `gloo-net` for the portal's API.
//!
//! Every call resolves to `Result<T, String>`: on a non-2xx status the
//! plain-text body the backend sends is the error message, shown inline by
//! the screens.

use common::payments::PaymentStatus;
use gloo_console::error;
use gloo_net::http::{Request, Response};
use gloo_timers::future::TimeoutFuture;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Delay between two payment status polls.
const POLL_INTERVAL_MS: u32 = 3_000;

/// Polls give up after this many attempts (five minutes).
const POLL_ATTEMPTS: u32 = 100;

pub async fn get<T: DeserializeOwned>(url: &str) -> Result<T, String> {
    let response = Request::get(url).send().await.map_err(network_error)?;
    read(response).await
}

pub async fn post<B: Serialize, T: DeserializeOwned>(url: &str, body: &B) -> Result<T, String> {
    let response = Request::post(url)
        .json(body)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(network_error)?;
    read(response).await
}

/// `POST` without a body, for state transitions such as cancelling.
pub async fn post_empty<T: DeserializeOwned>(url: &str) -> Result<T, String> {
    let response = Request::post(url).send().await.map_err(network_error)?;
    read(response).await
}

async fn read<T: DeserializeOwned>(response: Response) -> Result<T, String> {
    if response.ok() {
        return response
            .json::<T>()
            .await
            .map_err(|e| format!("Respuesta inesperada del servidor: {}", e));
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    error!(format!("{} {}: {}", response.url(), status, body));
    if body.trim().is_empty() {
        Err(format!("Error del servidor ({})", status))
    } else {
        Err(body)
    }
}

fn network_error(err: gloo_net::Error) -> String {
    error!(format!("Request failed: {}", err));
    "No se pudo conectar con el servidor".to_string()
}

/// Percent-encodes user input placed in a URL path segment or query value.
pub fn encode(value: &str) -> String {
    String::from(js_sys::encode_uri_component(value))
}

/// Waits until the payment `order_id` is confirmed or rejected.
pub async fn wait_for_payment(order_id: &str) -> Result<PaymentStatus, String> {
    let url = format!("/api/pagos/{}/estado", order_id);
    for _ in 0..POLL_ATTEMPTS {
        TimeoutFuture::new(POLL_INTERVAL_MS).await;
        let status: PaymentStatus = get(&url).await?;
        if status.is_final() {
            return Ok(status);
        }
    }
    Err("El pago sigue pendiente; verifique más tarde".to_string())
}

/// Opens a payment gateway link in a new tab.
pub fn open_in_new_tab(url: &str) {
    let opened = web_sys::window().and_then(|w| w.open_with_url_and_target(url, "_blank").ok());
    if opened.flatten().is_none() {
        error!(format!("Could not open {}", url));
    }
}

/// Today's date as `YYYY-MM-DD`, in the browser's local time.
pub fn today() -> String {
    let now = js_sys::Date::new_0();
    format!(
        "{:04}-{:02}-{:02}",
        now.get_full_year(),
        now.get_month() + 1,
        now.get_date()
    )
}
