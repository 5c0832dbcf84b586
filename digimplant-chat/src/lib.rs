//! # digimplant-chat
//!
//! Answers clinician questions about dental implant surgery from the
//! Digimplant document corpus.
//!
//! A question is classified into a [`ResponseMode`]: complication reports
//! that do not say where or when the problem occurred get a single
//! clarifying question back, everything else gets a full answer with
//! `Source:` and `Warning:` sections. Replies that decline to answer are
//! retried once with a simplified instruction.

pub mod adapter;
pub mod error;
pub mod pipeline;
pub mod prompt;
pub mod protocol;
pub mod refusal;

pub use adapter::{Answer, AnswerConfig, AnswerConfigBuilder, AnswerGenerator};
pub use error::{ChatError, Result};
pub use pipeline::{ChatOutcome, ChatPipeline, ChatPipelineBuilder};
pub use protocol::ResponseMode;
pub use refusal::is_refusal;
