//! Backend selection and construction

use crate::chat::PromptedBackend;
use crate::ollama::{self, OllamaModel};
use crate::openai::{self, OpenAiModel};
use crate::{Backend, DummyBackend, LlmError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

/// Environment variable consulted when no API key is configured
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Which annotation backend to run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Offline keyword rules
    #[default]
    Dummy,
    /// Local Ollama instance
    Ollama,
    /// OpenAI-compatible API
    #[serde(rename = "openai")]
    OpenAi,
}

impl BackendKind {
    /// Parse a provider name, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "dummy" => Some(BackendKind::Dummy),
            "ollama" => Some(BackendKind::Ollama),
            "openai" => Some(BackendKind::OpenAi),
            _ => None,
        }
    }

    /// Provider name
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Dummy => "dummy",
            BackendKind::Ollama => "ollama",
            BackendKind::OpenAi => "openai",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend configuration, usually the `[llm]` table of a config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Backend to run
    pub provider: BackendKind,

    /// Use one structured JSON call per clause instead of three plain calls
    pub structured_output: bool,

    /// Ollama API endpoint
    pub ollama_endpoint: String,

    /// Ollama model name
    pub ollama_model: String,

    /// OpenAI-compatible API base URL
    pub openai_base_url: String,

    /// OpenAI model name
    pub openai_model: String,

    /// OpenAI API key; `OPENAI_API_KEY` is used when absent
    pub openai_api_key: Option<String>,

    /// Per-request HTTP timeout (seconds)
    pub request_timeout_secs: u64,

    /// Attempts per request for retryable failures
    pub max_retries: u32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            provider: BackendKind::Dummy,
            structured_output: true,
            ollama_endpoint: ollama::DEFAULT_ENDPOINT.to_string(),
            ollama_model: "llama3".to_string(),
            openai_base_url: openai::DEFAULT_BASE_URL.to_string(),
            openai_model: openai::DEFAULT_MODEL.to_string(),
            openai_api_key: None,
            request_timeout_secs: ollama::DEFAULT_TIMEOUT_SECS,
            max_retries: ollama::DEFAULT_MAX_RETRIES,
        }
    }
}

impl BackendConfig {
    /// Configuration for the given provider with default settings
    pub fn for_provider(provider: BackendKind) -> Self {
        Self {
            provider,
            ..Default::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        if self.max_retries == 0 {
            return Err("max_retries must be greater than 0".to_string());
        }
        match self.provider {
            BackendKind::Ollama if self.ollama_model.trim().is_empty() => {
                Err("ollama_model must not be empty".to_string())
            }
            BackendKind::OpenAi if self.openai_model.trim().is_empty() => {
                Err("openai_model must not be empty".to_string())
            }
            _ => Ok(()),
        }
    }

    /// Worst-case wall time of one backend call including retries
    ///
    /// Every attempt may run the full request timeout, and the backoff
    /// between attempts doubles from one second. `None` for the dummy
    /// backend, which never waits.
    pub fn retry_budget(&self) -> Option<Duration> {
        if self.provider == BackendKind::Dummy {
            return None;
        }
        let attempts = u64::from(self.max_retries.max(1));
        let requests = self.request_timeout_secs.saturating_mul(attempts);
        let backoff = 1u64
            .checked_shl(self.max_retries.max(1) - 1)
            .map_or(u64::MAX, |total| total - 1);
        Some(Duration::from_secs(requests.saturating_add(backoff)))
    }

    /// API key from the config, falling back to the environment
    pub fn resolved_api_key(&self) -> Option<String> {
        self.openai_api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(OPENAI_API_KEY_ENV).ok())
            .filter(|k| !k.trim().is_empty())
    }
}

/// Build the configured backend
///
/// # Errors
///
/// Returns `LlmError::Config` for an invalid configuration or a missing
/// OpenAI API key.
///
/// # Examples
///
/// ```
/// use guardian_llm::{build_backend, BackendConfig};
///
/// let backend = build_backend(&BackendConfig::default()).unwrap();
/// assert_eq!(backend.name(), "dummy");
/// ```
pub fn build_backend(config: &BackendConfig) -> Result<Backend, LlmError> {
    config.validate().map_err(LlmError::Config)?;

    let backend = match config.provider {
        BackendKind::Dummy => Backend::structured(DummyBackend::new()),
        BackendKind::Ollama => {
            let model = OllamaModel::new(
                &config.ollama_endpoint,
                &config.ollama_model,
                config.request_timeout_secs,
            )?
            .with_max_retries(config.max_retries);
            wrap(PromptedBackend::new(model), config.structured_output)
        }
        BackendKind::OpenAi => {
            let api_key = config.resolved_api_key().ok_or_else(|| {
                LlmError::Config(format!("{} is not set", OPENAI_API_KEY_ENV))
            })?;
            let model = OpenAiModel::new(
                &config.openai_base_url,
                &config.openai_model,
                api_key,
                config.request_timeout_secs,
            )?
            .with_max_retries(config.max_retries);
            wrap(PromptedBackend::new(model), config.structured_output)
        }
    };

    info!("Using {:?} annotation backend", backend);
    Ok(backend)
}

fn wrap<M: crate::ChatModel + 'static>(backend: PromptedBackend<M>, structured: bool) -> Backend {
    if structured {
        Backend::structured(backend)
    } else {
        Backend::triad(backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = BackendConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.provider, BackendKind::Dummy);
    }

    #[test]
    fn test_invalid_timeout() {
        let mut config = BackendConfig::default();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_retry_budget_covers_every_attempt() {
        let config = BackendConfig::for_provider(BackendKind::Ollama);
        // 3 attempts of 30s plus 1s and 2s of backoff
        assert_eq!(config.retry_budget(), Some(Duration::from_secs(93)));

        let mut single = config.clone();
        single.max_retries = 1;
        assert_eq!(single.retry_budget(), Some(Duration::from_secs(30)));

        assert_eq!(BackendConfig::default().retry_budget(), None);
    }

    #[test]
    fn test_backend_kind_parse() {
        assert_eq!(BackendKind::parse(" OpenAI "), Some(BackendKind::OpenAi));
        assert_eq!(BackendKind::parse("ollama"), Some(BackendKind::Ollama));
        assert_eq!(BackendKind::parse("hf"), None);
        assert_eq!(BackendKind::OpenAi.to_string(), "openai");
    }

    #[test]
    fn test_parse_toml_table() {
        let config: BackendConfig = toml::from_str(
            r#"
            provider = "ollama"
            ollama_model = "qwen2"
            structured_output = false
            "#,
        )
        .unwrap();

        assert_eq!(config.provider, BackendKind::Ollama);
        assert_eq!(config.ollama_model, "qwen2");
        assert!(!config.structured_output);
        assert_eq!(config.ollama_endpoint, ollama::DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_build_ollama_respects_structured_flag() {
        let mut config = BackendConfig::for_provider(BackendKind::Ollama);
        assert!(build_backend(&config).unwrap().is_structured());

        config.structured_output = false;
        let backend = build_backend(&config).unwrap();
        assert!(!backend.is_structured());
        assert_eq!(backend.name(), "ollama");
    }

    #[test]
    fn test_build_openai_with_explicit_key() {
        let mut config = BackendConfig::for_provider(BackendKind::OpenAi);
        config.openai_api_key = Some("sk-test".to_string());
        let backend = build_backend(&config).unwrap();
        assert_eq!(backend.name(), "openai");
    }
}
