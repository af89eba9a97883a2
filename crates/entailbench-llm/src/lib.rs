//! LLM backends and the retrying dispatcher used by entailbench.
//!
//! This crate turns a prompt and a model identifier into an answer string:
//!
//! - [`LlmBackend`] — One backend family (hosted chat, hosted generative, local server)
//! - [`OpenAiBackend`], [`GeminiBackend`], [`OllamaBackend`] — The built-in families
//! - [`BackendRegistry`] — Maps model identifiers to backends via [`ModelMatcher`]s
//! - [`retry`] and [`RetryPolicy`] — Exponential backoff around any fallible call
//! - [`Dispatcher`] — Registry + retry; always yields an answer, never an error
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use entailbench_config::{Credentials, RunConfig};
//! use entailbench_llm::Dispatcher;
//!
//! let config = RunConfig::default();
//! let dispatcher = Dispatcher::from_config(&config, &Credentials::from_env());
//!
//! // "Yes", "No", or a sentinel such as CALL_FAILED
//! let answer = dispatcher.ask("qwen:7b", "Is C ⊑ D entailed? ...").await;
//! ```
//!
//! # Custom Backends
//!
//! ```rust,ignore
//! use entailbench_llm::{BackendRegistry, LlmBackend, ModelMatcher};
//!
//! let mut registry = BackendRegistry::from_config(&config.backends, &credentials);
//! registry.register([ModelMatcher::prefix("claude-")], MyAnthropicBackend::new(key));
//! ```

mod client;
mod dispatcher;
mod gemini;
mod ollama;
mod openai;
mod registry;
mod retry;

pub use client::LlmBackend;
pub use dispatcher::{Dispatcher, CALL_FAILED};
pub use entailbench_core::BenchError;
pub use gemini::{GeminiBackend, EMPTY_GEMINI_RESPONSE};
pub use ollama::{list_local_models, OllamaBackend, OllamaMetrics};
pub use openai::OpenAiBackend;
pub use registry::{BackendRegistry, ModelMatcher};
pub use retry::{retry, RetryPolicy};
