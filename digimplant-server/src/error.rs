//! Error types for the HTTP layer.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::protocol::ErrorResponse;

/// Message returned for every failure past input validation.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred while generating the response";

/// Errors surfaced to chat clients as `{ "error": ... }` bodies.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    /// Details are logged, never sent to the client.
    #[error("internal error")]
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Internal => {
                (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_ERROR_MESSAGE.to_string())
            }
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

/// Errors raised by case-record stores.
#[derive(Debug, Error)]
pub enum CaseStoreError {
    #[error("case record service request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("case record service returned {status} for '{id}'")]
    Status { id: String, status: reqwest::StatusCode },
}
