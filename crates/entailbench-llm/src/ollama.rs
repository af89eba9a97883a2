//! Native Ollama API backend and local model discovery.
//!
//! Uses Ollama's `/api/generate` endpoint with streaming disabled, which also
//! reports timing metrics like tokens/sec, eval time, and load duration.

use async_trait::async_trait;
use entailbench_core::BenchError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::LlmBackend;

/// Response from Ollama's /api/tags endpoint.
#[derive(Debug, Deserialize)]
struct OllamaTagsResponse {
    models: Vec<OllamaModelInfo>,
}

#[derive(Debug, Deserialize)]
struct OllamaModelInfo {
    name: String,
}

/// Lists the models installed on an Ollama instance.
pub async fn list_local_models(ollama_host: &str) -> Result<Vec<String>, BenchError> {
    let client = Client::new();
    let url = format!("{}/api/tags", ollama_host.trim_end_matches('/'));

    let response = client
        .get(&url)
        .timeout(std::time::Duration::from_secs(5))
        .send()
        .await
        .map_err(|e| BenchError::LlmError(format!("Ollama discovery failed: {}", e)))?;

    let tags: OllamaTagsResponse = response
        .json()
        .await
        .map_err(|e| BenchError::LlmError(format!("Failed to parse Ollama response: {}", e)))?;

    let models: Vec<String> = tags.models.into_iter().map(|m| m.name).collect();
    info!("Discovered {} Ollama models", models.len());
    Ok(models)
}

/// Performance metrics from Ollama's native API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OllamaMetrics {
    #[serde(default)]
    pub total_duration: u64,
    #[serde(default)]
    pub load_duration: u64,
    #[serde(default)]
    pub prompt_eval_count: u32,
    #[serde(default)]
    pub eval_count: u32,
    #[serde(default)]
    pub eval_duration: u64,
}

impl OllamaMetrics {
    /// Calculates tokens generated per second.
    pub fn tokens_per_sec(&self) -> f64 {
        if self.eval_duration == 0 {
            return 0.0;
        }
        (self.eval_count as f64) / (self.eval_duration as f64 / 1_000_000_000.0)
    }

    /// Total request duration in milliseconds.
    pub fn total_duration_ms(&self) -> u64 {
        self.total_duration / 1_000_000
    }

    /// Model load time in milliseconds.
    pub fn load_duration_ms(&self) -> u64 {
        self.load_duration / 1_000_000
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(flatten)]
    metrics: OllamaMetrics,
}

/// Backend for a local Ollama server.
pub struct OllamaBackend {
    client: Client,
    host: String,
}

impl OllamaBackend {
    /// Creates a backend for the Ollama server at `host` (e.g. `http://localhost:11434`).
    pub fn new(host: &str) -> Self {
        Self {
            client: Client::new(),
            host: host.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl LlmBackend for OllamaBackend {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, model: &str, prompt: &str) -> Result<String, BenchError> {
        let url = format!("{}/api/generate", self.host);

        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| BenchError::LlmError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(BenchError::BackendStatus { backend: "Ollama", status, body });
        }

        let resp: GenerateResponse = response
            .json()
            .await
            .map_err(|e| BenchError::LlmError(e.to_string()))?;

        info!(
            "Ollama: {}ms total ({}ms load), {:.1} tok/s, {} eval tokens",
            resp.metrics.total_duration_ms(),
            resp.metrics.load_duration_ms(),
            resp.metrics.tokens_per_sec(),
            resp.metrics.eval_count
        );

        Ok(resp.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn request_disables_streaming() {
        let request = GenerateRequest { model: "qwen:7b", prompt: "Is C ⊑ D?", stream: false };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, serde_json::json!({"model": "qwen:7b", "prompt": "Is C ⊑ D?", "stream": false}));
    }

    #[test]
    fn parses_response_and_metrics() {
        let resp: GenerateResponse = serde_json::from_str(
            r#"{
                "model": "qwen:7b",
                "response": " Yes\n",
                "done": true,
                "total_duration": 2500000000,
                "load_duration": 500000000,
                "prompt_eval_count": 120,
                "eval_count": 2,
                "eval_duration": 500000000
            }"#,
        )
        .unwrap();

        assert_eq!(resp.response, " Yes\n");
        assert_eq!(resp.metrics.total_duration_ms(), 2500);
        assert_eq!(resp.metrics.load_duration_ms(), 500);
        assert!((resp.metrics.tokens_per_sec() - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn metrics_default_when_absent() {
        let resp: GenerateResponse = serde_json::from_str(r#"{"response": "No"}"#).unwrap();
        assert_eq!(resp.metrics.eval_count, 0);
        assert_eq!(resp.metrics.tokens_per_sec(), 0.0);
    }

    #[test]
    fn host_trailing_slash_is_trimmed() {
        assert_eq!(OllamaBackend::new("http://localhost:11434/").host, "http://localhost:11434");
    }

    #[tokio::test]
    async fn posts_non_streaming_generate_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_json(serde_json::json!({"model": "qwen:7b", "prompt": "Is C ⊑ D?", "stream": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "qwen:7b",
                "response": "Yes",
                "done": true,
                "eval_count": 1,
                "eval_duration": 100000000
            })))
            .expect(1)
            .mount(&server)
            .await;

        let answer = OllamaBackend::new(&server.uri()).complete("qwen:7b", "Is C ⊑ D?").await.unwrap();
        assert_eq!(answer, "Yes");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
            .mount(&server)
            .await;

        let err = OllamaBackend::new(&server.uri()).complete("qwen:7b", "prompt").await.unwrap_err();
        match err {
            BenchError::BackendStatus { backend, status, body } => {
                assert_eq!(backend, "Ollama");
                assert_eq!(status, 500);
                assert_eq!(body, "model not loaded");
            }
            other => panic!("expected a status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn lists_installed_models() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "models": [{"name": "qwen:7b", "size": 1}, {"name": "llama3:latest"}]
            })))
            .mount(&server)
            .await;

        let models = list_local_models(&format!("{}/", server.uri())).await.unwrap();
        assert_eq!(models, vec!["qwen:7b", "llama3:latest"]);
    }
}
