//! Run configuration and backend credentials for entailbench.
//!
//! - [`RunConfig`] — Models to evaluate, benchmark profiles, retry policy, backend routing
//! - [`RunConfigBuilder`] — Fluent API for building a configuration programmatically
//! - [`ProfileRun`] — One benchmark file and where its results go
//! - [`BackendsConfig`] — Which model identifiers route to which backend
//! - [`Credentials`] — API keys for the hosted backends
//!
//! # Loading from JSON
//!
//! ```rust,ignore
//! use entailbench_config::RunConfig;
//!
//! let config = RunConfig::from_file("entailbench.json")?;
//! ```
//!
//! Every field has a default, so a file may contain only what it overrides:
//!
//! ```rust
//! use entailbench_config::RunConfig;
//!
//! let config = RunConfig::from_json(r#"{ "models": ["gpt-4o", "llama3:latest"] }"#).unwrap();
//! assert_eq!(config.models.len(), 2);
//! assert_eq!(config.profiles.len(), 2);
//! assert_eq!(config.retry.attempts, 3);
//! ```
//!
//! # Builder API
//!
//! ```rust
//! use entailbench_config::RunConfig;
//!
//! let config = RunConfig::builder()
//!     .model("gemini-2.5-pro")
//!     .profile("EL", "bench/el.json", "out/results_{model}_el.json", true)
//!     .attempts(5)
//!     .build();
//!
//! assert_eq!(config.profiles[0].output_path("gemini-2.5-pro").to_str(), Some("out/results_gemini-2.5-pro_el.json"));
//! ```

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Placeholder in output templates replaced by the sanitized model name.
pub const MODEL_PLACEHOLDER: &str = "{model}";

/// Errors that can occur when loading or validating a configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse JSON configuration.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Configuration is structurally valid JSON but unusable.
    #[error("Invalid config: {0}")]
    Validation(String),
}

impl ConfigError {
    /// Creates an IO error with path context.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

/// Makes a model identifier safe to embed in a file name (`qwen:7b` -> `qwen_7b`).
pub fn sanitize_model_name(model: &str) -> String {
    model.replace(':', "_")
}

// ============================================================================
// Profiles and retry
// ============================================================================

/// One benchmark profile to evaluate for every model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRun {
    /// Profile label used in log lines, e.g. `"EL"`.
    pub label: String,
    /// Benchmark input file.
    pub input: PathBuf,
    /// Output path template; `{model}` is replaced by the sanitized model name.
    pub output: String,
    /// When false, a missing input file skips this profile instead of failing the run.
    #[serde(default = "default_true")]
    pub required: bool,
}

impl ProfileRun {
    /// Resolves the output file for `model`.
    pub fn output_path(&self, model: &str) -> PathBuf {
        PathBuf::from(self.output.replace(MODEL_PLACEHOLDER, &sanitize_model_name(model)))
    }
}

fn default_true() -> bool {
    true
}

fn default_profiles() -> Vec<ProfileRun> {
    vec![
        ProfileRun {
            label: "EL".into(),
            input: PathBuf::from("output_StructuralReasoner/benchmark_output.json"),
            output: "results_{model}_el.json".into(),
            required: true,
        },
        ProfileRun {
            label: "ELH".into(),
            input: PathBuf::from("output_StructuralReasoner/benchmark_output_with_elh.json"),
            output: "results_{model}_elh.json".into(),
            required: false,
        },
    ]
}

/// Attempt budget and backoff base for backend calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub attempts: u32,
    /// Delay before the second attempt; doubles for each later one.
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { attempts: 3, base_delay_ms: 1000 }
    }
}

impl RetryConfig {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

// ============================================================================
// Backends
// ============================================================================

/// OpenAI chat completions routing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiSettings {
    /// Model identifiers starting with any of these go to OpenAI.
    pub prefixes: Vec<String>,
    /// Alternative OpenAI-compatible endpoint.
    pub api_base: Option<String>,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self { prefixes: vec!["gpt".into()], api_base: None }
    }
}

/// Gemini generateContent routing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiSettings {
    pub prefixes: Vec<String>,
    pub api_base: String,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            prefixes: vec!["gemini".into()],
            api_base: "https://generativelanguage.googleapis.com/v1beta".into(),
        }
    }
}

/// Local Ollama server routing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaSettings {
    pub host: String,
    /// Exact model names served locally.
    pub models: Vec<String>,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            host: "http://localhost:11434".into(),
            models: vec![
                "llama3:latest".into(),
                "gemma3:latest".into(),
                "deepseek-coder:6.7b-instruct".into(),
                "qwen:7b".into(),
                "mistral:latest".into(),
            ],
        }
    }
}

/// Routing and endpoints for every backend family.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendsConfig {
    pub openai: OpenAiSettings,
    pub gemini: GeminiSettings,
    pub ollama: OllamaSettings,
}

/// API keys for the hosted backends.
#[derive(Clone, Default)]
pub struct Credentials {
    pub openai_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
}

impl Credentials {
    /// Reads `OPENAI_API_KEY` and `GEMINI_API_KEY` from the environment.
    pub fn from_env() -> Self {
        Self {
            openai_api_key: std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            gemini_api_key: std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "<set>"))
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "<set>"))
            .finish()
    }
}

// ============================================================================
// Run configuration
// ============================================================================

/// Complete configuration of a benchmark run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Model identifiers, evaluated in order.
    pub models: Vec<String>,
    /// Benchmark profiles, evaluated in order for every model.
    pub profiles: Vec<ProfileRun>,
    pub retry: RetryConfig,
    pub backends: BackendsConfig,
}

impl Default for RunConfig {
    // Other configured backends: "gpt-4o", "gemini-2.5-pro", "llama3:latest", "gemma3:latest",
    // "deepseek-coder:6.7b-instruct", "mistral:latest".
    fn default() -> Self {
        Self {
            models: vec!["qwen:7b".into()],
            profiles: default_profiles(),
            retry: RetryConfig::default(),
            backends: BackendsConfig::default(),
        }
    }
}

impl RunConfig {
    /// Creates a builder starting from an empty model and profile list.
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::new()
    }

    /// Loads a run configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::io(path.display().to_string(), e))?;
        Self::from_json(&content)
    }

    /// Parses a run configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes this configuration to a JSON string.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks that the configuration can drive a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.models.is_empty() {
            return Err(ConfigError::Validation("no models configured".into()));
        }
        if self.retry.attempts == 0 {
            return Err(ConfigError::Validation("retry.attempts must be at least 1".into()));
        }

        let mut seen = HashSet::new();
        for profile in &self.profiles {
            if profile.label.trim().is_empty() {
                return Err(ConfigError::Validation("profile label must not be empty".into()));
            }
            if !seen.insert(profile.label.as_str()) {
                return Err(ConfigError::Validation(format!("duplicate profile '{}'", profile.label)));
            }
        }
        Ok(())
    }
}

/// Builder for [`RunConfig`].
///
/// Starts with no models and no profiles; retry and backend settings keep their defaults.
#[derive(Debug)]
pub struct RunConfigBuilder {
    config: RunConfig,
}

impl RunConfigBuilder {
    fn new() -> Self {
        Self {
            config: RunConfig {
                models: Vec::new(),
                profiles: Vec::new(),
                ..RunConfig::default()
            },
        }
    }

    /// Adds a model to evaluate.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.models.push(model.into());
        self
    }

    /// Adds a benchmark profile.
    pub fn profile(
        mut self,
        label: impl Into<String>,
        input: impl Into<PathBuf>,
        output: impl Into<String>,
        required: bool,
    ) -> Self {
        self.config.profiles.push(ProfileRun {
            label: label.into(),
            input: input.into(),
            output: output.into(),
            required,
        });
        self
    }

    pub fn attempts(mut self, attempts: u32) -> Self {
        self.config.retry.attempts = attempts;
        self
    }

    pub fn base_delay_ms(mut self, base_delay_ms: u64) -> Self {
        self.config.retry.base_delay_ms = base_delay_ms;
        self
    }

    pub fn backends(mut self, backends: BackendsConfig) -> Self {
        self.config.backends = backends;
        self
    }

    pub fn build(self) -> RunConfig {
        self.config
    }
}
