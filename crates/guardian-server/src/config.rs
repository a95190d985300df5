//! Configuration file parsing for the server.
//!
//! Loads settings from TOML files including bind address, storage paths,
//! the annotation backend (`[llm]`) and analysis tuning (`[analysis]`).

use guardian_analysis::AnalysisConfig;
use guardian_llm::{BackendConfig, BackendKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable overriding `[llm].provider`
pub const PROVIDER_ENV: &str = "GUARDIAN_LLM_PROVIDER";

/// Environment variable overriding `[llm].openai_api_key`
pub const API_KEY_ENV: &str = guardian_llm::config::OPENAI_API_KEY_ENV;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// A value is out of range or unknown
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (e.g., 8000)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// Directory receiving uploaded files
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,

    /// SQLite database file; documents are kept in memory when absent
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Language hint passed to text extraction (e.g., "kor+eng")
    #[serde(default = "default_ocr_language")]
    pub ocr_language: String,

    /// Annotation backend
    #[serde(default)]
    pub llm: BackendConfig,

    /// Analysis tuning
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_bind_port() -> u16 {
    8000
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("data/documents")
}

fn default_ocr_language() -> String {
    guardian_store::DEFAULT_LANGUAGE.to_string()
}

impl ServerConfig {
    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML without consulting the environment
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(contents)?;
        if config.storage_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingField("storage_path".to_string()));
        }
        Ok(config)
    }

    /// Apply `GUARDIAN_LLM_PROVIDER` and `OPENAI_API_KEY`
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(
            std::env::var(PROVIDER_ENV).ok(),
            std::env::var(API_KEY_ENV).ok(),
        )
    }

    /// Override the provider and API key; empty values are ignored
    pub fn apply_overrides(
        &mut self,
        provider: Option<String>,
        api_key: Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(name) = provider.filter(|p| !p.trim().is_empty()) {
            self.llm.provider = BackendKind::parse(&name)
                .ok_or_else(|| ConfigError::Invalid(format!("unknown provider '{}'", name)))?;
        }
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.llm.openai_api_key = Some(key);
        }
        Ok(())
    }

    /// Validate the nested sections
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.llm.validate().map_err(ConfigError::Invalid)?;
        self.analysis.validate().map_err(ConfigError::Invalid)?;
        Ok(())
    }

    /// Create a default configuration for testing
    pub fn default_test_config() -> Self {
        ServerConfig {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            storage_path: default_storage_path(),
            database_path: None,
            ocr_language: default_ocr_language(),
            llm: BackendConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default_test_config();
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.bind_port, 8000);
        assert_eq!(config.llm.provider, BackendKind::Dummy);
        assert!(config.database_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bind_addr() {
        let config = ServerConfig::default_test_config();
        assert_eq!(config.bind_addr(), "127.0.0.1:8000");
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            bind_address = "0.0.0.0"
            bind_port = 9000
            storage_path = "/var/lib/guardian/documents"
            database_path = "/var/lib/guardian/guardian.db"

            [llm]
            provider = "ollama"
            ollama_model = "qwen2"
            structured_output = false

            [analysis]
            max_concurrent_annotations = 2
        "#;

        let config = ServerConfig::parse(toml).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:9000");
        assert_eq!(config.storage_path, PathBuf::from("/var/lib/guardian/documents"));
        assert!(config.database_path.is_some());
        assert_eq!(config.ocr_language, "kor+eng");
        assert_eq!(config.llm.provider, BackendKind::Ollama);
        assert_eq!(config.llm.ollama_model, "qwen2");
        assert!(!config.llm.structured_output);
        assert_eq!(config.analysis.max_concurrent_annotations, 2);
        assert_eq!(config.analysis.annotation_timeout_secs, 60);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = ServerConfig::parse("").unwrap();
        assert_eq!(config.bind_port, 8000);
        assert_eq!(config.storage_path, PathBuf::from("data/documents"));
    }

    #[test]
    fn test_overrides() {
        let mut config = ServerConfig::default_test_config();
        config
            .apply_overrides(Some("OpenAI".to_string()), Some("sk-test".to_string()))
            .unwrap();
        assert_eq!(config.llm.provider, BackendKind::OpenAi);
        assert_eq!(config.llm.openai_api_key.as_deref(), Some("sk-test"));

        config.apply_overrides(Some(" ".to_string()), None).unwrap();
        assert_eq!(config.llm.provider, BackendKind::OpenAi);

        let err = config.apply_overrides(Some("claude".to_string()), None).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_invalid_analysis_section() {
        let config = ServerConfig::parse("[analysis]\nmax_concurrent_annotations = 0").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
