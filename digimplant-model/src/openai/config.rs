//! OpenAI client configuration.

use crate::error::{ModelError, Result};

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Configuration for [`OpenAIClient`](super::OpenAIClient).
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub model: String,
    pub organization_id: Option<String>,
    /// Base URL for OpenAI-compatible servers.
    pub base_url: Option<String>,
}

impl OpenAIConfig {
    /// Configuration for the public OpenAI API.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self { api_key: api_key.into(), model: model.into(), organization_id: None, base_url: None }
    }

    /// Configuration for an OpenAI-compatible API (vLLM, Ollama, ...).
    pub fn compatible(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self { base_url: Some(base_url.into()), ..Self::new(api_key, model) }
    }

    /// Read `OPENAI_API_KEY`, `OPENAI_MODEL` and `OPENAI_BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidConfig`] when `OPENAI_API_KEY` is unset or empty.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ModelError::InvalidConfig("OPENAI_API_KEY environment variable not set".into())
            })?;
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Ok(Self {
            base_url: std::env::var("OPENAI_BASE_URL").ok().filter(|url| !url.is_empty()),
            ..Self::new(api_key, model)
        })
    }

    /// Set the organization id sent with each request.
    pub fn with_organization(mut self, organization_id: impl Into<String>) -> Self {
        self.organization_id = Some(organization_id.into());
        self
    }
}
