//! errors.rs
//! Errores tipados: los de request (se devuelven al cliente) y los de
//! registro (se acumulan en el reporte del envío masivo).

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Record store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Could not parse input: {0}")]
    ParseFailure(String),

    #[error("Uploaded file contains no data rows")]
    EmptyFile,

    #[error("No stored record has a valid Email address")]
    NoEligibleRecipients,
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::StoreUnavailable(e.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(e: csv::Error) -> Self {
        AppError::ParseFailure(e.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::ParseFailure(_) => StatusCode::BAD_REQUEST,
            AppError::EmptyFile | AppError::NoEligibleRecipients => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "error": self.to_string()
        }))
    }
}

/// Fallo de un solo registro dentro del envío masivo. Nunca aborta el lote.
#[derive(Debug, Error)]
pub enum RecordFailure {
    #[error("QR encoding failed: {0}")]
    Encoding(String),

    #[error("Transport failure: {0}")]
    Transport(String),
}
