//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Failures raised by a [`crate::gateway::Gateway`].
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("decode: {0}")]
    Decode(String),
    #[error("unsupported statement: {0}")]
    Unsupported(String),
}

/// Category of a [`GoatError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Persistence,
}

#[derive(Error, Debug)]
pub enum GoatError {
    #[error("Name is missing")]
    NameMissing,
    #[error("age is missing")]
    AgeMissing,
    #[error("age or name missing")]
    FieldsMissing,
    #[error("No goats available.")]
    NoGoats,
    #[error("This goat does not exist!")]
    NotFound,
    #[error("Cannot delete.")]
    CannotDelete,
    #[error(transparent)]
    Persistence(#[from] GatewayError),
}

impl GoatError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GoatError::NameMissing | GoatError::AgeMissing | GoatError::FieldsMissing => {
                ErrorKind::Validation
            }
            GoatError::NoGoats | GoatError::NotFound => ErrorKind::NotFound,
            GoatError::CannotDelete | GoatError::Persistence(_) => ErrorKind::Persistence,
        }
    }
}

/// How persistence failures are reported to API clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorExposure {
    /// Compatibility mode: the database's own message goes into the response body.
    #[default]
    Raw,
    /// Persistence failures are replaced by a generic message and only logged.
    Redacted,
}

impl ErrorExposure {
    /// Message shown to the client for `err`.
    ///
    /// Only `GoatError::Persistence` carries text from outside this crate; every
    /// other variant has a fixed message and is passed through unchanged.
    pub fn client_message(self, err: &GoatError) -> String {
        match (self, err) {
            (ErrorExposure::Redacted, GoatError::Persistence(cause)) => {
                tracing::warn!(error = %cause, "redacted persistence error");
                "internal server error".to_string()
            }
            _ => err.to_string(),
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// An error already bound to the status code chosen by the handler.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}
