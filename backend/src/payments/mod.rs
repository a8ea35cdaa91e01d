pub mod state;

use chrono::{DateTime, Utc};

/// Where card payments are sent to be completed.
#[derive(Debug, Clone, Default)]
pub struct PaymentGateway {
    base_url: Option<String>,
}

impl PaymentGateway {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }

    /// Checkout link for an order, when a gateway is configured.
    pub fn checkout_url(&self, order_id: &str) -> Option<String> {
        self.base_url
            .as_ref()
            .map(|base| format!("{}/checkout/{}", base, order_id))
    }
}

/// Human-readable receipt number: `R-YYYYMMDD-XXXXXX`, the UTC date of the
/// sale followed by the first six hex digits of the row id.
pub fn numero_recibo(fecha: DateTime<Utc>, id: &str) -> String {
    let suffix: String = id
        .chars()
        .filter(|c| c.is_ascii_hexdigit())
        .take(6)
        .collect();
    format!("R-{}-{}", fecha.format("%Y%m%d"), suffix.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn receipt_number_format() {
        let fecha = Utc.with_ymd_and_hms(2026, 3, 9, 23, 59, 0).unwrap();
        assert_eq!(
            numero_recibo(fecha, "a1b2c3d4-0000-4000-8000-000000000000"),
            "R-20260309-A1B2C3"
        );
    }

    #[test]
    fn checkout_url_only_with_gateway() {
        assert_eq!(PaymentGateway::default().checkout_url("v1"), None);
        assert_eq!(
            PaymentGateway::new(Some("https://pagos.example".into())).checkout_url("v1"),
            Some("https://pagos.example/checkout/v1".into())
        );
    }
}
