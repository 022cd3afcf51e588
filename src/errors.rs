use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Failure taxonomy shared by services and handlers.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed")]
    ValidationFailure(Vec<String>),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{message}")]
    Duplicate {
        message: String,
        existing: Option<Value>,
    },

    #[error("{0}")]
    InvalidState(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Server Error")]
    Unexpected(#[from] anyhow::Error),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn not_found(entity: &str) -> Self {
        AppError::NotFound(format!("{entity} not found"))
    }

    pub fn duplicate(message: impl Into<String>) -> Self {
        AppError::Duplicate {
            message: message.into(),
            existing: None,
        }
    }

    /// Maps a store error, turning a unique index violation into `Duplicate`
    /// with the given message.
    pub fn from_db(err: DbErr, duplicate_message: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                tracing::debug!("Unique constraint violation: {}", detail);
                AppError::duplicate(duplicate_message)
            }
            _ => AppError::Unexpected(err.into()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationFailure(_) => StatusCode::BAD_REQUEST,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Duplicate { .. } => StatusCode::CONFLICT,
            AppError::InvalidState(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message for item-level reports such as bulk creation errors.
    pub fn describe(&self) -> String {
        match self {
            AppError::ValidationFailure(errors) => errors.join(", "),
            AppError::Unexpected(err) => err.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::from_db(err, "Record already exists")
    }
}

/// Whether `Unexpected` responses carry the underlying error text.
static EXPOSE_ERROR_DETAIL: AtomicBool = AtomicBool::new(true);

pub fn set_expose_error_detail(expose: bool) {
    EXPOSE_ERROR_DETAIL.store(expose, Ordering::Relaxed);
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::ValidationFailure(errors) => json!({
                "success": false,
                "message": "Validation failed",
                "errors": errors,
            }),
            AppError::Duplicate { message, existing } => {
                let mut body = json!({
                    "success": false,
                    "message": message,
                });
                if let Some(existing) = existing {
                    body["existing"] = existing;
                }
                body
            }
            AppError::Unexpected(err) => {
                tracing::error!(error = ?err, "Unexpected failure while handling request");
                let mut body = json!({
                    "success": false,
                    "message": "Server Error",
                });
                if EXPOSE_ERROR_DETAIL.load(Ordering::Relaxed) {
                    body["error"] = Value::String(format!("{err:#}"));
                }
                body
            }
            other => json!({
                "success": false,
                "message": other.to_string(),
            }),
        };

        (status, Json(body)).into_response()
    }
}
