use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Failure of a single call to the completion provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The request never produced an HTTP response (DNS, connect, TLS, body read).
    Transport(String),
    /// The provider answered with a non-success status; `body` is its raw error text.
    Status { status: u16, body: String },
    /// A success response without `choices[0].message.content`.
    MalformedResponse(String),
}

impl ProviderError {
    /// Text handed back to the caller in the `details` field.
    pub fn details(&self) -> String {
        match self {
            ProviderError::Transport(msg) => msg.clone(),
            ProviderError::Status { body, .. } => body.clone(),
            ProviderError::MalformedResponse(msg) => msg.clone(),
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Transport(msg) => write!(f, "Provider request failed: {}", msg),
            ProviderError::Status { status, body } => {
                write!(f, "Provider returned {}: {}", status, body)
            }
            ProviderError::MalformedResponse(msg) => {
                write!(f, "Malformed provider response: {}", msg)
            }
        }
    }
}

impl std::error::Error for ProviderError {}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Transport(err.to_string())
    }
}

/// Application-specific error types.
#[derive(Debug)]
pub enum AppError {
    /// Bad request error (invalid input).
    BadRequest(String),
    /// The scoring call to the completion provider failed.
    Provider(ProviderError),
    /// The lead store could not be written.
    Storage(String),
    /// Internal server error.
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Provider(e) => write!(f, "{}", e),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    /// Maps each variant to a status code and an `{error, details}` JSON body.
    fn into_response(self) -> Response {
        let (status, error_message, details) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "Bad request", msg),
            AppError::Provider(e) => {
                tracing::error!("Scoring call failed: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "Failed to get lead score",
                    e.details(),
                )
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to store lead",
                    msg,
                )
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    msg,
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
            "details": details,
        }));

        (status, body).into_response()
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::Provider(err)
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}
