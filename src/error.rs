//! Error types for the shortener service
//!
//! Provides the client-facing error taxonomy using thiserror.
//!
//! Hard errors (not found, collisions, malformed input) always map to a
//! client-visible failure. Durable-store failures surface as internal
//! errors. Cache-layer failures never appear here: they travel as a soft
//! indicator on otherwise-successful results.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == App Error Enum ==
/// Client-facing error type for the shortener service.
#[derive(Error, Debug)]
pub enum AppError {
    /// No durable record exists for the requested alias
    #[error("alias not found")]
    AliasNotFound,

    /// A durable record already exists for the alias being saved
    #[error("alias already exists")]
    AliasAlreadyExists,

    /// The rename target alias is already taken
    #[error("new alias already exists")]
    NewAliasAlreadyExists,

    /// Invalid request data
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Durable store unreachable or returned a malformed response
    #[error("storage error: {0}")]
    Storage(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::AliasNotFound => StatusCode::NOT_FOUND,
            AppError::AliasAlreadyExists => StatusCode::CONFLICT,
            AppError::NewAliasAlreadyExists => StatusCode::CONFLICT,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the shortener service.
pub type Result<T> = std::result::Result<T, AppError>;
