//! Contract Guardian Annotation Backends
//!
//! Pluggable language-analysis backends that annotate contract clauses.
//!
//! # Architecture
//!
//! Every backend implements [`ClauseBackend`], the three-call surface
//! (summarize, classify, analyze risk). Backends that can answer all three in
//! one round trip also implement [`StructuredBackend`]. The capability is
//! fixed once, when the backend is wrapped in a [`Backend`]:
//!
//! ```text
//! Backend::Structured(..)  -> analyze_clause, one call per clause
//! Backend::Triad(..)       -> summarize + classify + analyze_risk
//! ```
//!
//! # Providers
//!
//! - `DummyBackend`: deterministic keyword rules, no network
//! - `MockBackend`: scripted responses and failures for tests
//! - `OllamaModel`: local Ollama API
//! - `OpenAiModel`: OpenAI-compatible chat completions API
//!
//! # Examples
//!
//! ```
//! use guardian_llm::{Backend, DummyBackend};
//!
//! let backend = Backend::structured(DummyBackend::new());
//! assert!(backend.is_structured());
//! assert_eq!(backend.name(), "dummy");
//! ```

#![warn(missing_docs)]

pub mod backend;
pub mod chat;
pub mod config;
pub mod dummy;
pub mod mock;
pub mod ollama;
pub mod openai;
pub mod parser;
pub mod prompt;

use thiserror::Error;

pub use backend::{Backend, ClauseBackend, StructuredBackend, Suggestion};
pub use chat::{ChatModel, PromptedBackend};
pub use config::{build_backend, BackendConfig, BackendKind};
pub use dummy::DummyBackend;
pub use mock::MockBackend;
pub use ollama::OllamaModel;
pub use openai::OpenAiModel;

/// Errors that can occur during backend operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid or malformed response from the model
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// The call did not finish in time
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// The backend does not offer this capability
    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),

    /// Backend configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl LlmError {
    /// Whether retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LlmError::Communication(_) | LlmError::RateLimitExceeded | LlmError::Timeout(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(LlmError::Communication("reset".to_string()).is_retryable());
        assert!(LlmError::RateLimitExceeded.is_retryable());
        assert!(!LlmError::InvalidResponse("{".to_string()).is_retryable());
        assert!(!LlmError::ModelNotAvailable("x".to_string()).is_retryable());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(LlmError::Timeout(30).to_string(), "Request timed out after 30s");
        assert_eq!(
            LlmError::Unsupported("infer_contract_type").to_string(),
            "Unsupported operation: infer_contract_type"
        );
    }
}
