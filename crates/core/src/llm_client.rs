use async_openai::{
    Client,
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
    },
};
use async_trait::async_trait;
use tracing::debug;

/// Sampling parameters attached to every completion request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOptions {
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            max_tokens: 500,
            temperature: 0.7,
        }
    }
}

/// Every way a single completion call can fail.
///
/// Callers are expected to treat all variants the same way; the kinds exist
/// for logging.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("completion service is not configured")]
    MissingConfiguration,
    #[error("could not build completion request: {0}")]
    InvalidRequest(String),
    #[error("completion request failed: {0}")]
    Request(#[from] OpenAIError),
    #[error("completion response had no text content")]
    EmptyResponse,
}

/// A client for a single-turn chat completion service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends `[system_prompt, user_prompt]` and returns the generated text.
    async fn complete(
        &self,
        system_prompt: String,
        user_prompt: String,
        options: CompletionOptions,
    ) -> Result<String, CompletionError>;
}

/// An implementation of `CompletionClient` for any OpenAI-compatible API.
pub struct OpenAICompatibleClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAICompatibleClient {
    /// Creates a new client for an OpenAI-compatible service.
    ///
    /// # Arguments
    ///
    /// * `config` - API key and base URL of the service.
    /// * `model` - The model identifier to request (e.g., "gpt-4o").
    pub fn new(config: OpenAIConfig, model: String) -> Self {
        Self {
            client: Client::with_config(config),
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionClient for OpenAICompatibleClient {
    async fn complete(
        &self,
        system_prompt: String,
        user_prompt: String,
        options: CompletionOptions,
    ) -> Result<String, CompletionError> {
        let invalid = |e: OpenAIError| CompletionError::InvalidRequest(e.to_string());

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system_prompt)
                    .build()
                    .map_err(invalid)?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user_prompt)
                    .build()
                    .map_err(invalid)?
                    .into(),
            ])
            .max_completion_tokens(options.max_tokens)
            .temperature(options.temperature)
            .build()
            .map_err(invalid)?;

        debug!(model = %self.model, max_tokens = options.max_tokens, "Sending completion request");
        let response: CreateChatCompletionResponse = self.client.chat().create(request).await?;

        first_choice_text(&response).ok_or(CompletionError::EmptyResponse)
    }
}

/// Extracts the text of the first choice, ignoring blank content.
fn first_choice_text(response: &CreateChatCompletionResponse) -> Option<String> {
    response
        .choices
        .first()?
        .message
        .content
        .as_ref()
        .filter(|text| !text.trim().is_empty())
        .cloned()
}
