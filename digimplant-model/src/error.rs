//! Error types for the `digimplant-model` crate.

use thiserror::Error;

/// Errors raised by text-generation backends.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The client could not be configured (missing key, bad base URL, ...).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The request could not be built.
    #[error("Failed to build request ({provider}): {message}")]
    Request {
        /// The backend that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The service returned an error or could not be reached.
    #[error("API error ({provider}): {message}")]
    Api {
        /// The backend that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The service answered without any text.
    #[error("Empty response from {provider}")]
    EmptyResponse {
        /// The backend that produced the error.
        provider: String,
    },
}

/// Result type alias for generation operations.
pub type Result<T> = std::result::Result<T, ModelError>;
