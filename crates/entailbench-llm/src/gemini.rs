//! Google Gemini `generateContent` backend.

use async_trait::async_trait;
use entailbench_core::BenchError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::LlmBackend;

/// Answer recorded when Gemini returns no text (e.g. a safety block).
pub const EMPTY_GEMINI_RESPONSE: &str = "Error: Empty Gemini response";

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, or `None` when there is none.
    fn text(self) -> Option<String> {
        let text: String = self
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();

        match text.trim().is_empty() {
            true => None,
            false => Some(text),
        }
    }
}

/// Client for Google's Generative Language API.
pub struct GeminiBackend {
    client: Client,
    api_base: String,
    api_key: String,
}

impl GeminiBackend {
    /// Creates a new Gemini backend.
    pub fn new(api_key: Option<&str>, api_base: &str) -> Self {
        let api_key = api_key.unwrap_or_default().to_string();
        debug!("GeminiBackend: api_base={}", api_base);
        Self {
            client: Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl LlmBackend for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, model: &str, prompt: &str) -> Result<String, BenchError> {
        let url = format!("{}/models/{}:generateContent", self.api_base, model);

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| BenchError::LlmError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(BenchError::BackendStatus { backend: "Gemini", status, body });
        }

        let resp: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| BenchError::LlmError(e.to_string()))?;

        match resp.text() {
            Some(text) => Ok(text),
            None => {
                warn!("Gemini returned no text for {}", model);
                Ok(EMPTY_GEMINI_RESPONSE.to_string())
            }
        }
    }
}
