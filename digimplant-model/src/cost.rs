//! Approximate request cost, for logging only.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::generator::TokenUsage;

/// USD price per 1000 tokens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    pub input_per_1k: f64,
    pub output_per_1k: f64,
}

/// Models with a known price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelTier {
    #[serde(rename = "gpt-3.5-turbo")]
    Gpt35Turbo,
    #[serde(rename = "gpt-4o-mini")]
    Gpt4oMini,
    #[serde(rename = "gpt-4o")]
    Gpt4o,
    #[serde(rename = "gpt-4-turbo")]
    Gpt4Turbo,
}

impl ModelTier {
    /// All tiers, most specific name first.
    pub const ALL: [ModelTier; 4] =
        [ModelTier::Gpt4oMini, ModelTier::Gpt4o, ModelTier::Gpt4Turbo, ModelTier::Gpt35Turbo];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelTier::Gpt35Turbo => "gpt-3.5-turbo",
            ModelTier::Gpt4oMini => "gpt-4o-mini",
            ModelTier::Gpt4o => "gpt-4o",
            ModelTier::Gpt4Turbo => "gpt-4-turbo",
        }
    }

    pub fn pricing(&self) -> Pricing {
        match self {
            ModelTier::Gpt35Turbo | ModelTier::Gpt4oMini => {
                Pricing { input_per_1k: 0.0005, output_per_1k: 0.0015 }
            }
            ModelTier::Gpt4o => Pricing { input_per_1k: 0.005, output_per_1k: 0.015 },
            ModelTier::Gpt4Turbo => Pricing { input_per_1k: 0.01, output_per_1k: 0.03 },
        }
    }

    /// Tier for a model name as reported by the API, tolerating dated
    /// snapshots such as `gpt-4o-mini-2024-07-18`.
    pub fn from_model_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|tier| match name.strip_prefix(tier.as_str()) {
            Some("") => true,
            Some(rest) => rest
                .strip_prefix('-')
                .is_some_and(|date| date.starts_with(|c: char| c.is_ascii_digit())),
            None => false,
        })
    }
}

impl fmt::Display for ModelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelTier {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_model_name(s)
            .ok_or_else(|| ModelError::InvalidConfig(format!("no pricing for model '{s}'")))
    }
}

/// Estimated USD cost of a call, rounded to six decimal places.
pub fn estimate_cost(input_tokens: u32, output_tokens: u32, tier: ModelTier) -> f64 {
    let pricing = tier.pricing();
    let cost = (f64::from(input_tokens) / 1000.0) * pricing.input_per_1k
        + (f64::from(output_tokens) / 1000.0) * pricing.output_per_1k;
    (cost * 1_000_000.0).round() / 1_000_000.0
}

impl TokenUsage {
    /// Estimated USD cost of this usage on `tier`.
    pub fn cost(&self, tier: ModelTier) -> f64 {
        estimate_cost(self.input_tokens, self.output_tokens, tier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gpt_4o_mini_cost() {
        // 1200 * 0.0005 / 1000 + 300 * 0.0015 / 1000
        assert_eq!(estimate_cost(1200, 300, ModelTier::Gpt4oMini), 0.00105);
    }

    #[test]
    fn gpt_4_turbo_cost() {
        assert_eq!(estimate_cost(1000, 1000, ModelTier::Gpt4Turbo), 0.04);
    }

    #[test]
    fn zero_tokens_cost_nothing() {
        assert_eq!(estimate_cost(0, 0, ModelTier::Gpt4o), 0.0);
    }

    #[test]
    fn rounds_to_six_places() {
        assert_eq!(estimate_cost(2, 0, ModelTier::Gpt4oMini), 0.000001);
        assert_eq!(estimate_cost(1, 1, ModelTier::Gpt4oMini), 0.000002);
    }

    #[test]
    fn parses_model_names() {
        assert_eq!(ModelTier::from_model_name("gpt-4o"), Some(ModelTier::Gpt4o));
        assert_eq!(ModelTier::from_model_name("GPT-4o-mini"), Some(ModelTier::Gpt4oMini));
        assert_eq!(
            ModelTier::from_model_name("gpt-4o-mini-2024-07-18"),
            Some(ModelTier::Gpt4oMini)
        );
        assert_eq!(ModelTier::from_model_name("gpt-4o-2024-08-06"), Some(ModelTier::Gpt4o));
        assert_eq!(ModelTier::from_model_name("llama3"), None);
        assert!("claude".parse::<ModelTier>().is_err());
    }

    #[test]
    fn usage_cost_matches_estimate() {
        let usage = TokenUsage::new(500, 200);
        assert_eq!(usage.cost(ModelTier::Gpt4o), estimate_cost(500, 200, ModelTier::Gpt4o));
    }
}
