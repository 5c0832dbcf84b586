//! Error types for the `digimplant-rag` crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or retrieving clinical documents.
///
/// Most retrieval failures are absorbed by the loader and the matcher
/// (missing directories, malformed files, empty match sets). These variants
/// cover what callers can still observe: invalid configuration and I/O on a
/// single file when a caller asks for it explicitly.
#[derive(Debug, Error)]
pub enum RagError {
    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A document file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A document file could not be parsed, even after sanitizing.
    #[error("Failed to parse {path}: {source}")]
    Parse {
        /// The file that failed.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
