//! Annotation backend contract
//!
//! The capability of a backend (one structured call vs. three plain calls) is
//! decided when it is wrapped in a [`Backend`], not probed per call.

use crate::LlmError;
use async_trait::async_trait;
use guardian_domain::{Clause, ClauseAnnotation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Suggested rewrite of a clause, as returned by a backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Proposed clause text
    pub suggestion: String,

    /// Why the rewrite is fairer
    pub rationale: String,

    /// Expected score change (negative lowers the risk)
    pub risk_delta: i32,
}

/// Base capability every backend offers
#[async_trait]
pub trait ClauseBackend: Send + Sync {
    /// Short provider name for logs
    fn name(&self) -> &str;

    /// Summarize a clause in one sentence
    async fn summarize_clause(&self, text: &str) -> Result<String, LlmError>;

    /// Classify a clause into a category label
    async fn classify_clause(&self, text: &str) -> Result<String, LlmError>;

    /// Describe the risk of a clause in free text
    async fn analyze_risk(&self, text: &str) -> Result<String, LlmError>;

    /// Classify the whole document into a contract type
    async fn infer_contract_type(&self, _clauses: &[Clause]) -> Result<Option<String>, LlmError> {
        Err(LlmError::Unsupported("infer_contract_type"))
    }

    /// Propose a fairer rewrite of a clause
    async fn suggest_improvement(&self, _text: &str) -> Result<Suggestion, LlmError> {
        Err(LlmError::Unsupported("suggest_improvement"))
    }
}

/// Backends that annotate a clause in a single round trip
#[async_trait]
pub trait StructuredBackend: ClauseBackend {
    /// Summary, category and risk signal in one call
    async fn analyze_clause(&self, text: &str) -> Result<ClauseAnnotation, LlmError>;
}

/// A backend with its capability fixed at construction
#[derive(Clone)]
pub enum Backend {
    /// Annotates with one `analyze_clause` call per clause
    Structured(Arc<dyn StructuredBackend>),

    /// Annotates with summarize, classify and analyze-risk calls
    Triad(Arc<dyn ClauseBackend>),
}

impl Backend {
    /// Wrap a backend that supports structured analysis
    pub fn structured<B: StructuredBackend + 'static>(backend: B) -> Self {
        Backend::Structured(Arc::new(backend))
    }

    /// Wrap a backend that only supports the three-call surface
    pub fn triad<B: ClauseBackend + 'static>(backend: B) -> Self {
        Backend::Triad(Arc::new(backend))
    }

    /// Provider name
    pub fn name(&self) -> &str {
        match self {
            Backend::Structured(b) => b.name(),
            Backend::Triad(b) => b.name(),
        }
    }

    /// Whether clauses are annotated in a single call
    pub fn is_structured(&self) -> bool {
        matches!(self, Backend::Structured(_))
    }

    /// Classify the whole document into a contract type
    pub async fn infer_contract_type(&self, clauses: &[Clause]) -> Result<Option<String>, LlmError> {
        match self {
            Backend::Structured(b) => b.infer_contract_type(clauses).await,
            Backend::Triad(b) => b.infer_contract_type(clauses).await,
        }
    }

    /// Propose a fairer rewrite of a clause
    pub async fn suggest_improvement(&self, text: &str) -> Result<Suggestion, LlmError> {
        match self {
            Backend::Structured(b) => b.suggest_improvement(text).await,
            Backend::Triad(b) => b.suggest_improvement(text).await,
        }
    }
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = if self.is_structured() { "Structured" } else { "Triad" };
        write!(f, "Backend::{}({})", kind, self.name())
    }
}
