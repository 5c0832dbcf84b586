//! The text-generation seam used by the answer adapter.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Sampling parameters for one generation call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self { temperature: Some(0.3), top_p: Some(1.0), max_output_tokens: Some(2000) }
    }
}

/// A persona instruction plus a task prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// System-role instruction: persona, rules and response format.
    pub system: String,
    /// User-role prompt: context and the literal question.
    pub prompt: String,
    pub config: GenerationConfig,
}

impl GenerationRequest {
    pub fn new(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self { system: system.into(), prompt: prompt.into(), config: GenerationConfig::default() }
    }

    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }
}

/// Token counts reported by the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self { input_tokens, output_tokens }
    }
}

impl std::ops::Add for TokenUsage {
    type Output = TokenUsage;

    fn add(self, other: TokenUsage) -> TokenUsage {
        TokenUsage {
            input_tokens: self.input_tokens.saturating_add(other.input_tokens),
            output_tokens: self.output_tokens.saturating_add(other.output_tokens),
        }
    }
}

/// The text returned by one generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generation {
    pub text: String,
    /// Absent when the backend does not report usage.
    pub usage: Option<TokenUsage>,
}

/// A backend that turns a [`GenerationRequest`] into text.
///
/// Implementations own their transport and timeouts; callers do not retry
/// failed calls.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Model identifier, e.g. `gpt-4o-mini`.
    fn name(&self) -> &str;

    /// Run one completion.
    async fn generate(&self, request: GenerationRequest) -> Result<Generation>;
}
