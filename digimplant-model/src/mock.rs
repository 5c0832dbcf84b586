//! Scripted generator for tests and offline runs.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{ModelError, Result};
use crate::generator::{Generation, GenerationRequest, TextGenerator, TokenUsage};

/// One scripted reply.
#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Failure(String),
}

/// A [`TextGenerator`] that replays scripted replies in order.
///
/// Once the script is exhausted every call returns the fallback text.
/// Each request is recorded so tests can inspect the instructions sent.
#[derive(Debug)]
pub struct MockGenerator {
    name: String,
    fallback: String,
    usage: TokenUsage,
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new("mock-model")
    }
}

impl MockGenerator {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fallback: "Mock answer.".to_string(),
            usage: TokenUsage::new(100, 20),
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful reply.
    pub fn with_reply(mut self, text: impl Into<String>) -> Self {
        self.replies.get_mut().push_back(Reply::Text(text.into()));
        self
    }

    /// Queue a failing call.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.replies.get_mut().push_back(Reply::Failure(message.into()));
        self
    }

    /// Text returned once the script is exhausted.
    pub fn with_fallback(mut self, text: impl Into<String>) -> Self {
        self.fallback = text.into();
        self
    }

    /// Usage reported with every successful reply.
    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = usage;
        self
    }

    /// Requests received so far, oldest first.
    pub async fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().await.clone()
    }

    /// Number of calls received so far.
    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, request: GenerationRequest) -> Result<Generation> {
        self.requests.lock().await.push(request);

        match self.replies.lock().await.pop_front() {
            Some(Reply::Failure(message)) => {
                Err(ModelError::Api { provider: "mock".to_string(), message })
            }
            Some(Reply::Text(text)) => Ok(Generation { text, usage: Some(self.usage) }),
            None => Ok(Generation { text: self.fallback.clone(), usage: Some(self.usage) }),
        }
    }
}
