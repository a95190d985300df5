//! Configuration for the analysis pipeline

use guardian_llm::BackendConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

/// Default article heading marker (`제 N 조`)
pub const DEFAULT_HEADING_PATTERN: &str = r"제\s*\d+\s*조";

/// Configuration for clause segmentation and annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Maximum backend calls in flight for one document
    pub max_concurrent_annotations: usize,

    /// Maximum time for a single backend call (seconds)
    ///
    /// Network backends retry inside one call, so this should not be shorter
    /// than [`BackendConfig::retry_budget`]; see [`Self::covering_backend`].
    pub annotation_timeout_secs: u64,

    /// Regex marking the start of a numbered article
    pub heading_pattern: String,

    /// Ask the backend for the contract type after annotation
    pub infer_contract_type: bool,
}

impl AnalysisConfig {
    /// Get the annotation timeout as a Duration
    pub fn annotation_timeout(&self) -> Duration {
        Duration::from_secs(self.annotation_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_concurrent_annotations == 0 {
            return Err("max_concurrent_annotations must be greater than 0".to_string());
        }
        if self.annotation_timeout_secs == 0 {
            return Err("annotation_timeout_secs must be greater than 0".to_string());
        }
        if self.heading_pattern.trim().is_empty() {
            return Err("heading_pattern must not be empty".to_string());
        }
        regex::Regex::new(&self.heading_pattern)
            .map_err(|e| format!("heading_pattern is not a valid regex: {}", e))?;
        Ok(())
    }
}

impl Default for AnalysisConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            max_concurrent_annotations: 4,
            annotation_timeout_secs: 60,
            heading_pattern: DEFAULT_HEADING_PATTERN.to_string(),
            infer_contract_type: true,
        }
    }
}

impl AnalysisConfig {
    /// Aggressive preset: more parallel calls, shorter timeouts
    pub fn aggressive() -> Self {
        Self {
            max_concurrent_annotations: 8,
            annotation_timeout_secs: 20,
            heading_pattern: DEFAULT_HEADING_PATTERN.to_string(),
            infer_contract_type: false,
        }
    }

    /// Lenient preset: sequential calls with long timeouts, for slow local models
    pub fn lenient() -> Self {
        Self {
            max_concurrent_annotations: 1,
            annotation_timeout_secs: 180,
            heading_pattern: DEFAULT_HEADING_PATTERN.to_string(),
            infer_contract_type: true,
        }
    }

    /// Raise the call timeout to the backend's retry budget when it is shorter
    pub fn covering_backend(mut self, backend: &BackendConfig) -> Self {
        if let Some(budget) = backend.retry_budget() {
            let secs = budget.as_secs();
            if secs > self.annotation_timeout_secs {
                info!(
                    "Raising annotation timeout from {}s to {}s to cover {} retries",
                    self.annotation_timeout_secs, secs, backend.provider
                );
                self.annotation_timeout_secs = secs;
            }
        }
        self
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guardian_llm::BackendKind;

    #[test]
    fn test_timeout_covers_network_retries() {
        let ollama = BackendConfig::for_provider(BackendKind::Ollama);
        let config = AnalysisConfig::default().covering_backend(&ollama);
        assert_eq!(config.annotation_timeout_secs, 93);

        // Longer timeouts are kept
        let config = AnalysisConfig::lenient().covering_backend(&ollama);
        assert_eq!(config.annotation_timeout_secs, 180);

        // The dummy backend never waits
        let config = AnalysisConfig::default().covering_backend(&BackendConfig::default());
        assert_eq!(config.annotation_timeout_secs, 60);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(AnalysisConfig::aggressive().validate().is_ok());
        assert!(AnalysisConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_zero_concurrency_is_invalid() {
        let mut config = AnalysisConfig::default();
        config.max_concurrent_annotations = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_heading_pattern_is_invalid() {
        let mut config = AnalysisConfig::default();
        config.heading_pattern = "제(".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_annotation_timeout_conversion() {
        let config = AnalysisConfig::default();
        assert_eq!(config.annotation_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = AnalysisConfig::aggressive();
        let toml_str = config.to_toml().unwrap();
        let parsed = AnalysisConfig::from_toml(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = AnalysisConfig::from_toml("max_concurrent_annotations = 2").unwrap();
        assert_eq!(parsed.max_concurrent_annotations, 2);
        assert_eq!(parsed.heading_pattern, DEFAULT_HEADING_PATTERN);
    }
}
