//! OpenAI chat completions backend.
//!
//! Works with the OpenAI API and any compatible endpoint set through `api_base`.
//! Requests use temperature 0 and a single user message.

use std::time::Instant;

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
    },
    Client,
};
use async_trait::async_trait;
use entailbench_core::BenchError;
use tracing::info;

use crate::LlmBackend;

/// Converts any error into a BenchError::LlmError.
fn llm_err(e: impl ToString) -> BenchError {
    BenchError::LlmError(e.to_string())
}

/// Extracts the first choice's text from a completion response.
fn extract_content(response: CreateChatCompletionResponse, elapsed_ms: u64) -> Result<String, BenchError> {
    let (input_tokens, output_tokens) = response
        .usage
        .as_ref()
        .map(|u| (u.prompt_tokens, u.completion_tokens))
        .unwrap_or((0, 0));

    info!(
        "OpenAI: {}ms, tokens: {}/{} (in/out)",
        elapsed_ms, input_tokens, output_tokens
    );

    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| BenchError::LlmError("No response content".into()))
}

/// Backend for OpenAI-compatible chat completion APIs.
pub struct OpenAiBackend {
    client: Client<OpenAIConfig>,
}

impl OpenAiBackend {
    /// Creates a backend with an explicit API key and optional alternative endpoint.
    pub fn new(api_key: Option<&str>, api_base: Option<&str>) -> Self {
        let mut config = OpenAIConfig::new();
        if let Some(key) = api_key {
            config = config.with_api_key(key);
        }
        if let Some(base) = api_base {
            config = config.with_api_base(base);
        }

        Self { client: Client::with_config(config) }
    }
}

#[async_trait]
impl LlmBackend for OpenAiBackend {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, model: &str, prompt: &str) -> Result<String, BenchError> {
        let start = Instant::now();

        let message = ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(llm_err)?,
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(vec![message])
            .temperature(0.0_f32)
            .build()
            .map_err(llm_err)?;

        let response = self.client.chat().create(request).await.map_err(llm_err)?;
        extract_content(response, start.elapsed().as_millis() as u64)
    }
}
