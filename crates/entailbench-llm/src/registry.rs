//! Model identifier to backend routing.

use std::sync::Arc;

use entailbench_config::{BackendsConfig, Credentials};
use tracing::debug;

use crate::{GeminiBackend, LlmBackend, OllamaBackend, OpenAiBackend};

/// Rule deciding whether a model identifier belongs to a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelMatcher {
    /// Identifier starts with the given prefix, e.g. `gpt`.
    Prefix(String),
    /// Identifier equals the given name, e.g. `qwen:7b`.
    Exact(String),
}

impl ModelMatcher {
    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self::Prefix(prefix.into())
    }

    pub fn exact(name: impl Into<String>) -> Self {
        Self::Exact(name.into())
    }

    pub fn matches(&self, model: &str) -> bool {
        match self {
            Self::Prefix(p) => model.starts_with(p.as_str()),
            Self::Exact(name) => model == name,
        }
    }
}

struct Route {
    matchers: Vec<ModelMatcher>,
    backend: Arc<dyn LlmBackend>,
}

/// Ordered registry of backends. The first route with a matching rule wins.
#[derive(Default)]
pub struct BackendRegistry {
    routes: Vec<Route>,
}

impl BackendRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the standard registry: OpenAI prefixes, then Gemini prefixes, then
    /// the Ollama allow-list.
    pub fn from_config(backends: &BackendsConfig, credentials: &Credentials) -> Self {
        let mut registry = Self::new();

        registry.register(
            backends.openai.prefixes.iter().map(ModelMatcher::prefix),
            OpenAiBackend::new(
                credentials.openai_api_key.as_deref(),
                backends.openai.api_base.as_deref(),
            ),
        );
        registry.register(
            backends.gemini.prefixes.iter().map(ModelMatcher::prefix),
            GeminiBackend::new(credentials.gemini_api_key.as_deref(), &backends.gemini.api_base),
        );
        registry.register(
            backends.ollama.models.iter().map(ModelMatcher::exact),
            OllamaBackend::new(&backends.ollama.host),
        );

        registry
    }

    /// Adds a backend after all existing routes.
    pub fn register<I, B>(&mut self, matchers: I, backend: B)
    where
        I: IntoIterator<Item = ModelMatcher>,
        B: LlmBackend + 'static,
    {
        self.routes.push(Route {
            matchers: matchers.into_iter().collect(),
            backend: Arc::new(backend),
        });
    }

    /// Finds the backend for a model identifier.
    pub fn resolve(&self, model: &str) -> Option<Arc<dyn LlmBackend>> {
        let route = self
            .routes
            .iter()
            .find(|r| r.matchers.iter().any(|m| m.matches(model)))?;
        debug!("Routing {} to {}", model, route.backend.name());
        Some(route.backend.clone())
    }

    /// Returns true if some backend accepts this model identifier.
    pub fn has(&self, model: &str) -> bool {
        self.routes.iter().any(|r| r.matchers.iter().any(|m| m.matches(model)))
    }

    /// Returns the names of all registered backends, in routing order.
    pub fn backend_names(&self) -> Vec<&str> {
        self.routes.iter().map(|r| r.backend.name()).collect()
    }
}
