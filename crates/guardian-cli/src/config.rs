//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use guardian_analysis::AnalysisConfig;
use guardian_llm::BackendConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// CLI configuration.
///
/// Same `[llm]` and `[analysis]` tables as the server config, so one file
/// can drive both.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Annotation backend
    #[serde(default)]
    pub llm: BackendConfig,

    /// Analysis tuning
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl Config {
    /// Load configuration from a file, or defaults when no path is given.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Load and validate a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate both sections.
    pub fn validate(&self) -> Result<()> {
        self.llm.validate().map_err(CliError::Config)?;
        self.analysis.validate().map_err(CliError::Config)?;
        Ok(())
    }
}
