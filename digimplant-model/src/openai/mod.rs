//! OpenAI provider.
//!
//! ```rust,ignore
//! use digimplant_model::openai::{OpenAIClient, OpenAIConfig};
//!
//! let client = OpenAIClient::new(OpenAIConfig::from_env()?)?;
//! ```

mod client;
mod config;

pub use client::OpenAIClient;
pub use config::{DEFAULT_MODEL, OpenAIConfig};
