//! OpenAI chat-completions client.

use async_openai::{
    Client,
    config::OpenAIConfig as AsyncOpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
};
use async_trait::async_trait;
use tracing::{debug, error};

use super::config::OpenAIConfig;
use crate::error::{ModelError, Result};
use crate::generator::{Generation, GenerationRequest, TextGenerator, TokenUsage};

const PROVIDER: &str = "OpenAI";

/// [`TextGenerator`] backed by the OpenAI chat-completions API.
pub struct OpenAIClient {
    client: Client<AsyncOpenAIConfig>,
    model: String,
}

impl OpenAIClient {
    /// Create a new OpenAI client.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidConfig`] if the API key is empty.
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ModelError::InvalidConfig("API key must not be empty".into()));
        }

        let mut openai_config = AsyncOpenAIConfig::new().with_api_key(&config.api_key);

        if let Some(org_id) = &config.organization_id {
            openai_config = openai_config.with_org_id(org_id);
        }

        if let Some(base_url) = &config.base_url {
            openai_config = openai_config.with_api_base(base_url);
        }

        Ok(Self { client: Client::with_config(openai_config), model: config.model })
    }

    /// Create a client for an OpenAI-compatible API.
    pub fn compatible(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self> {
        Self::new(OpenAIConfig::compatible(api_key, base_url, model))
    }

    fn messages(request: &GenerationRequest) -> Result<Vec<ChatCompletionRequestMessage>> {
        let system = ChatCompletionRequestSystemMessageArgs::default()
            .content(request.system.as_str())
            .build()
            .map_err(request_error)?;
        let user = ChatCompletionRequestUserMessageArgs::default()
            .content(request.prompt.as_str())
            .build()
            .map_err(request_error)?;
        Ok(vec![system.into(), user.into()])
    }
}

fn request_error(e: impl std::fmt::Display) -> ModelError {
    ModelError::Request { provider: PROVIDER.into(), message: e.to_string() }
}

#[async_trait]
impl TextGenerator for OpenAIClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: GenerationRequest) -> Result<Generation> {
        let mut builder = CreateChatCompletionRequestArgs::default();
        builder.model(&self.model).messages(Self::messages(&request)?);

        if let Some(temperature) = request.config.temperature {
            builder.temperature(temperature);
        }
        if let Some(top_p) = request.config.top_p {
            builder.top_p(top_p);
        }
        if let Some(max_tokens) = request.config.max_output_tokens {
            builder.max_tokens(max_tokens);
        }

        let openai_request = builder.build().map_err(request_error)?;

        debug!(
            provider = PROVIDER,
            model = %self.model,
            system_chars = request.system.len(),
            prompt_chars = request.prompt.len(),
            "sending chat completion"
        );

        let response = self.client.chat().create(openai_request).await.map_err(|e| {
            error!(provider = PROVIDER, model = %self.model, error = %e, "chat completion failed");
            ModelError::Api { provider: PROVIDER.into(), message: e.to_string() }
        })?;

        let usage = response
            .usage
            .as_ref()
            .map(|usage| TokenUsage::new(usage.prompt_tokens, usage.completion_tokens));

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| ModelError::EmptyResponse { provider: PROVIDER.into() })?;

        Ok(Generation { text, usage })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_api_key() {
        let result = OpenAIClient::new(OpenAIConfig::new("  ", "gpt-4o-mini"));
        assert!(matches!(result, Err(ModelError::InvalidConfig(_))));
    }

    #[test]
    fn reports_model_name() {
        let client = OpenAIClient::new(OpenAIConfig::new("sk-test", "gpt-4o-mini")).unwrap();
        assert_eq!(client.name(), "gpt-4o-mini");
    }

    #[test]
    fn builds_system_and_user_messages() {
        let request = GenerationRequest::new("persona", "question");
        let messages = OpenAIClient::messages(&request).unwrap();
        assert_eq!(messages.len(), 2);
        assert!(matches!(messages[0], ChatCompletionRequestMessage::System(_)));
        assert!(matches!(messages[1], ChatCompletionRequestMessage::User(_)));
    }
}
