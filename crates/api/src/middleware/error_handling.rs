//! # Error Handling Middleware
//!
//! This module provides a standardized way to handle errors in the Salonsync
//! API. It maps domain-specific errors to appropriate HTTP status codes and
//! JSON error responses, ensuring a consistent error handling experience
//! across the entire API.
//!
//! The mapping follows the engine's error taxonomy: validation problems are
//! client errors, a lost booking race is a conflict the caller should resolve
//! by re-querying availability, and storage failures are retriable.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use salonsync_core::errors::EngineError;
use serde_json::json;

/// Application error wrapper that provides HTTP status code mapping
///
/// `AppError` wraps domain-specific `EngineError` instances and implements
/// `IntoResponse` to convert them into HTTP responses with appropriate
/// status codes and JSON payloads.
#[derive(Debug)]
pub struct AppError(pub EngineError);

/// Converts application errors to HTTP responses
///
/// This implementation maps each error type to the appropriate HTTP status
/// code and formats the error message into a JSON response body.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map error types to HTTP status codes
        let status = match &self.0 {
            EngineError::Validation(_) => StatusCode::BAD_REQUEST,
            EngineError::ServiceNotFound(_) => StatusCode::NOT_FOUND,
            EngineError::Conflict(_) => StatusCode::CONFLICT,
            EngineError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            // Retriable by the caller, so not a plain 500
            EngineError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
            EngineError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Get the error message and format as JSON
        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        // Combine status code and JSON body into a response
        (status, body).into_response()
    }
}

/// Automatic conversion from EngineError to AppError
///
/// This implementation allows using `?` operator with functions that return
/// `Result<T, EngineError>` in handler functions that return
/// `Result<T, AppError>`.
impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        AppError(err)
    }
}

/// Automatic conversion from eyre::Report to AppError
///
/// Repository functions return `eyre::Result`; their failures surface as
/// retriable storage errors.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(EngineError::Storage(err))
    }
}
