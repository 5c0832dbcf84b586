//! Configuration for retrieval and context assembly.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Configuration parameters for matching and context assembly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Maximum number of documents handed to the context assembler.
    pub match_limit: usize,
    /// Number of leading corpus documents used when nothing matches.
    pub fallback_count: usize,
    /// Hard cap, in characters, on the serialized document section.
    pub context_char_budget: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self { match_limit: 5, fallback_count: 10, context_char_budget: 5000 }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the maximum number of matched documents.
    pub fn match_limit(mut self, limit: usize) -> Self {
        self.config.match_limit = limit;
        self
    }

    /// Set how many leading documents are used as a fallback.
    pub fn fallback_count(mut self, count: usize) -> Self {
        self.config.fallback_count = count;
        self
    }

    /// Set the character budget for the document section of the context.
    pub fn context_char_budget(mut self, budget: usize) -> Self {
        self.config.context_char_budget = budget;
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if:
    /// - `match_limit == 0`
    /// - `fallback_count == 0`
    /// - `context_char_budget == 0`
    pub fn build(self) -> Result<RagConfig> {
        if self.config.match_limit == 0 {
            return Err(RagError::ConfigError("match_limit must be greater than zero".to_string()));
        }
        if self.config.fallback_count == 0 {
            return Err(RagError::ConfigError(
                "fallback_count must be greater than zero".to_string(),
            ));
        }
        if self.config.context_char_budget == 0 {
            return Err(RagError::ConfigError(
                "context_char_budget must be greater than zero".to_string(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_chat_handler() {
        let config = RagConfig::default();
        assert_eq!(config.match_limit, 5);
        assert_eq!(config.fallback_count, 10);
        assert_eq!(config.context_char_budget, 5000);
    }

    #[test]
    fn builder_rejects_zero_limit() {
        let err = RagConfig::builder().match_limit(0).build().unwrap_err();
        assert!(matches!(err, RagError::ConfigError(_)));
    }

    #[test]
    fn builder_rejects_zero_budget() {
        assert!(RagConfig::builder().context_char_budget(0).build().is_err());
    }

    #[test]
    fn builder_keeps_overrides() {
        let config =
            RagConfig::builder().match_limit(3).fallback_count(4).context_char_budget(100).build();
        assert_eq!(
            config.unwrap(),
            RagConfig { match_limit: 3, fallback_count: 4, context_char_budget: 100 }
        );
    }
}
