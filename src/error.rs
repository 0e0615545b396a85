use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Non-standard status returned when a request body is not valid UTF-8 JSON.
pub const MALFORMED_JSON_STATUS: u16 = 753;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Malformed JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Request body error: {message}")]
    Body { status: StatusCode, message: String },

    #[error("JSON encode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Client went away before the response was written")]
    ClientGone,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Structured body for client errors.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub title: String,
    pub description: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AppError::MalformedJson(_) => {
                let status = StatusCode::from_u16(MALFORMED_JSON_STATUS)
                    .unwrap_or(StatusCode::BAD_REQUEST);
                let body = ErrorBody {
                    title: "Malformed JSON".to_string(),
                    description: "Could not decode the request body. The JSON was incorrect \
                                  or not encoded as UTF-8."
                        .to_string(),
                };
                (status, Json(body)).into_response()
            }
            AppError::InvalidDocument(description) => {
                let body = ErrorBody {
                    title: "Invalid document".to_string(),
                    description,
                };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            AppError::Body { status, message } => {
                let body = ErrorBody {
                    title: "Unreadable body".to_string(),
                    description: message,
                };
                (status, Json(body)).into_response()
            }
            other => {
                error!("Request failed: {other}");
                (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()).into_response()
            }
        }
    }
}
