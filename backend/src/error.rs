//! Error type shared by every service.
//!
//! Handlers return `Result<HttpResponse, ServiceError>`; the error is turned
//! into a status code plus a plain-text message the frontend shows as is.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use common::cart::CartError;
use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0} no encontrado")]
    NotFound(String),

    #[error("Datos inválidos: {0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Acceso denegado: {0}")]
    Forbidden(String),

    #[error("Error de base de datos: {0}")]
    Database(String),

    #[error("Error al generar PDF: {0}")]
    Pdf(String),
}

impl ServiceError {
    pub fn not_found(what: &str) -> Self {
        ServiceError::NotFound(what.to_string())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(message.into())
    }
}

impl From<rusqlite::Error> for ServiceError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::QueryReturnedNoRows => ServiceError::not_found("Registro"),
            rusqlite::Error::SqliteFailure(ref e, _) if e.code == ErrorCode::ConstraintViolation => {
                ServiceError::Conflict(format!("El registro ya existe o viola una restricción: {}", err))
            }
            other => ServiceError::Database(other.to_string()),
        }
    }
}

impl From<CartError> for ServiceError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::StockInsuficiente { .. } => ServiceError::Conflict(err.to_string()),
            CartError::CantidadInvalida | CartError::NoEncontrado(_) | CartError::MontoExcedido => {
                ServiceError::Validation(err.to_string())
            }
        }
    }
}

impl From<genpdf::error::Error> for ServiceError {
    fn from(err: genpdf::error::Error) -> Self {
        ServiceError::Pdf(err.to_string())
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::Pdf(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(self.to_string())
    }
}

/// Extension for lookups that use `QueryReturnedNoRows` as "not found":
/// names the missing row in the error message.
pub trait OptionalRow<T> {
    fn or_not_found(self, what: &str) -> Result<T, ServiceError>;
}

impl<T> OptionalRow<T> for rusqlite::Result<T> {
    fn or_not_found(self, what: &str) -> Result<T, ServiceError> {
        self.map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => ServiceError::not_found(what),
            other => other.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_rows_is_the_not_found_sentinel() {
        let err: ServiceError = rusqlite::Error::QueryReturnedNoRows.into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let res: rusqlite::Result<()> = Err(rusqlite::Error::QueryReturnedNoRows);
        let err = res.or_not_found("Paciente").unwrap_err();
        assert_eq!(err.to_string(), "Paciente no encontrado");
    }

    #[test]
    fn other_database_errors_are_unavailable() {
        let err: ServiceError = rusqlite::Error::InvalidQuery.into();
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn stock_errors_are_conflicts() {
        let err: ServiceError = CartError::StockInsuficiente {
            nombre: "Paracetamol".into(),
            solicitado: 3,
            disponible: 1,
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert!(err.to_string().contains("Paracetamol"));

        let err: ServiceError = CartError::MontoExcedido.into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
