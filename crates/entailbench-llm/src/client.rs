//! The backend abstraction every model family implements.

use async_trait::async_trait;
use entailbench_core::BenchError;

/// A family of LLM endpoints that can answer a single prompt.
///
/// Implementations make exactly one request per call and report failures as errors;
/// retrying is the caller's job.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Short backend name used in log lines.
    fn name(&self) -> &str;

    /// Sends `prompt` to `model` and returns the reply text.
    async fn complete(&self, model: &str, prompt: &str) -> Result<String, BenchError>;
}
