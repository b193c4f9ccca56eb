use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Queue not found")]
    NotFound,
    #[error("Validation failed: {0}")]
    Validation(&'static str),
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
    #[error("Corrupt document {path}: {source}")]
    CorruptData {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("QR render failed: {0}")]
    Qr(String),
}

impl ServiceError {
    /// Machine-readable code used in JSON error bodies.
    fn code(&self) -> &str {
        match self {
            Self::NotFound => "not_found",
            Self::Validation(code) => code,
            Self::Storage(_) | Self::CorruptData { .. } => "storage_error",
            Self::Qr(_) => "qr_error",
        }
    }

    fn as_status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        self.as_status_code()
    }

    fn error_response(&self) -> HttpResponse {
        if self.as_status_code().is_server_error() {
            log::error!("request failed: {self}");
        }

        HttpResponse::build(self.as_status_code()).json(json!({ "error": self.code() }))
    }
}
