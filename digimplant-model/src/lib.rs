//! # digimplant-model
//!
//! Text-generation backends for the Digimplant clinical chat.
//!
//! - [`TextGenerator`] - the seam the answer adapter calls
//! - [`OpenAIClient`](openai::OpenAIClient) - OpenAI chat completions (feature `openai`,
//!   on by default)
//! - [`MockGenerator`] - scripted replies for tests
//! - [`estimate_cost`] - per-request USD estimate from token usage
//!
//! ## Priced models
//!
//! | Model | Input / 1K | Output / 1K |
//! |-------|-----------:|------------:|
//! | `gpt-4o-mini` | 0.0005 | 0.0015 |
//! | `gpt-3.5-turbo` | 0.0005 | 0.0015 |
//! | `gpt-4o` | 0.005 | 0.015 |
//! | `gpt-4-turbo` | 0.01 | 0.03 |

pub mod cost;
pub mod error;
pub mod generator;
pub mod mock;
#[cfg(feature = "openai")]
pub mod openai;

pub use cost::{ModelTier, Pricing, estimate_cost};
pub use error::{ModelError, Result};
pub use generator::{Generation, GenerationConfig, GenerationRequest, TextGenerator, TokenUsage};
pub use mock::MockGenerator;
#[cfg(feature = "openai")]
pub use openai::OpenAIClient;
