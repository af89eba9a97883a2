//! Shared test fixtures.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use entailbench_core::BenchError;
use entailbench_llm::{BackendRegistry, Dispatcher, LlmBackend, ModelMatcher, RetryPolicy};

/// Backend that gives the same answer to every prompt.
pub struct Constant(pub String);

#[async_trait]
impl LlmBackend for Constant {
    fn name(&self) -> &str {
        "constant"
    }

    async fn complete(&self, _model: &str, _prompt: &str) -> Result<String, BenchError> {
        Ok(self.0.clone())
    }
}

/// Dispatcher routing `qwen:7b` to a [`Constant`] backend, without retry delays.
pub fn answering(answer: &str) -> Dispatcher {
    let mut registry = BackendRegistry::new();
    registry.register([ModelMatcher::exact("qwen:7b")], Constant(answer.to_string()));
    Dispatcher::new(registry, RetryPolicy::new(3, Duration::ZERO))
}

pub fn write_json(dir: &Path, name: &str, json: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, json).unwrap();
    path
}
