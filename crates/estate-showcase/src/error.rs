use crate::config::ConfigError;
use crate::listings::{ListingId, UnknownCurrency};
use crate::telemetry::TelemetryError;
use crate::transactions::TransactionError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    HttpClient(reqwest::Error),
    ListingNotFound(ListingId),
    Currency(UnknownCurrency),
    Transaction(TransactionError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::HttpClient(err) => write!(f, "http client error: {}", err),
            AppError::ListingNotFound(id) => write!(f, "listing {} not found", id),
            AppError::Currency(err) => write!(f, "{}", err),
            AppError::Transaction(err) => write!(f, "transaction error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::HttpClient(err) => Some(err),
            AppError::ListingNotFound(_) => None,
            AppError::Currency(err) => Some(err),
            AppError::Transaction(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::ListingNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Currency(_) => StatusCode::BAD_REQUEST,
            AppError::Transaction(_) => StatusCode::CONFLICT,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::HttpClient(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(value: reqwest::Error) -> Self {
        Self::HttpClient(value)
    }
}

impl From<UnknownCurrency> for AppError {
    fn from(value: UnknownCurrency) -> Self {
        Self::Currency(value)
    }
}

impl From<TransactionError> for AppError {
    fn from(value: TransactionError) -> Self {
        Self::Transaction(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_domain_errors_to_http_statuses() {
        let missing = AppError::ListingNotFound(ListingId(42)).into_response();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let wallet = AppError::from(TransactionError::WalletNotConnected).into_response();
        assert_eq!(wallet.status(), StatusCode::CONFLICT);

        let currency = AppError::from(UnknownCurrency("eur".to_string())).into_response();
        assert_eq!(currency.status(), StatusCode::BAD_REQUEST);
    }
}
