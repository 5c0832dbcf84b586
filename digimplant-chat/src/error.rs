//! Error types for the `digimplant-chat` crate.

use digimplant_model::ModelError;
use thiserror::Error;

/// Errors raised while answering a question.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Invalid or incomplete pipeline configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The generator failed; the request cannot be answered.
    #[error("Generation failed: {0}")]
    Generation(#[from] ModelError),
}

/// Result type alias for chat operations.
pub type Result<T> = std::result::Result<T, ChatError>;
