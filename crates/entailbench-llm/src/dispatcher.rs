//! Routes prompts to backends and absorbs every failure into a sentinel answer.

use entailbench_config::{Credentials, RunConfig};
use entailbench_core::BenchError;
use tracing::{debug, error};

use crate::{retry, BackendRegistry, RetryPolicy};

/// Answer recorded when every attempt failed.
pub const CALL_FAILED: &str = "Error: LLM call failed after retries";

/// Sends prompts to the backend registered for a model, retrying with backoff.
pub struct Dispatcher {
    registry: BackendRegistry,
    policy: RetryPolicy,
}

impl Dispatcher {
    pub fn new(registry: BackendRegistry, policy: RetryPolicy) -> Self {
        Self { registry, policy }
    }

    /// Builds the standard registry and retry policy for a run.
    pub fn from_config(config: &RunConfig, credentials: &Credentials) -> Self {
        Self::new(
            BackendRegistry::from_config(&config.backends, credentials),
            RetryPolicy::from(&config.retry),
        )
    }

    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Asks `model` to answer `prompt`.
    ///
    /// Returns the trimmed reply, or [`CALL_FAILED`] once the retry budget is spent.
    /// An unknown model counts as a failed attempt like any other.
    pub async fn ask(&self, model: &str, prompt: &str) -> String {
        let registry = &self.registry;
        let result = retry(&self.policy, model, move || async move {
            let backend = registry
                .resolve(model)
                .ok_or_else(|| BenchError::UnknownModel(model.to_string()))?;
            backend.complete(model, prompt).await
        })
        .await;

        match result {
            Ok(answer) => {
                let answer = answer.trim().to_string();
                debug!("{} answered: {}", model, answer);
                answer
            }
            Err(e) => {
                error!("Giving up on {} after {} attempts: {}", model, self.policy.attempts, e);
                CALL_FAILED.to_string()
            }
        }
    }
}
