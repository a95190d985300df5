//! Scripted backend for deterministic testing

use crate::backend::{ClauseBackend, StructuredBackend, Suggestion};
use crate::LlmError;
use async_trait::async_trait;
use guardian_domain::{Clause, ClauseAnnotation};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Mock backend for deterministic testing
///
/// Returns pre-configured annotations keyed by exact clause text and never
/// touches the network. Clones share the same call counter.
///
/// # Examples
///
/// ```
/// use guardian_llm::MockBackend;
/// use guardian_domain::ClauseAnnotation;
///
/// let mut backend = MockBackend::default();
/// backend.add_response("제1조 (목적)", ClauseAnnotation {
///     summary: Some("purpose".to_string()),
///     ..Default::default()
/// });
/// backend.add_error("제2조 (해지)");
/// assert_eq!(backend.call_count(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    default_annotation: ClauseAnnotation,
    responses: HashMap<String, ClauseAnnotation>,
    errors: HashSet<String>,
    delays: HashMap<String, Duration>,
    inferred_type: Option<String>,
    call_count: Arc<AtomicUsize>,
}

impl MockBackend {
    /// Create a mock that answers every clause with the same annotation
    pub fn new(default_annotation: ClauseAnnotation) -> Self {
        Self {
            default_annotation,
            ..Default::default()
        }
    }

    /// Answer a specific clause text with the given annotation
    pub fn add_response(&mut self, text: impl Into<String>, annotation: ClauseAnnotation) {
        self.responses.insert(text.into(), annotation);
    }

    /// Fail every call for a specific clause text
    pub fn add_error(&mut self, text: impl Into<String>) {
        self.errors.insert(text.into());
    }

    /// Delay calls for a specific clause text
    pub fn add_delay(&mut self, text: impl Into<String>, delay: Duration) {
        self.delays.insert(text.into(), delay);
    }

    /// Answer `infer_contract_type` with this type
    pub fn with_contract_type(mut self, contract_type: impl Into<String>) -> Self {
        self.inferred_type = Some(contract_type.into());
        self
    }

    /// Number of backend calls made so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        self.call_count.store(0, Ordering::SeqCst);
    }

    async fn lookup(&self, text: &str) -> Result<ClauseAnnotation, LlmError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(text) {
            tokio::time::sleep(*delay).await;
        }
        if self.errors.contains(text) {
            return Err(LlmError::Other("Mock error".to_string()));
        }

        Ok(self
            .responses
            .get(text)
            .cloned()
            .unwrap_or_else(|| self.default_annotation.clone()))
    }
}

#[async_trait]
impl ClauseBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn summarize_clause(&self, text: &str) -> Result<String, LlmError> {
        Ok(self.lookup(text).await?.summary.unwrap_or_default())
    }

    async fn classify_clause(&self, text: &str) -> Result<String, LlmError> {
        Ok(self.lookup(text).await?.category.unwrap_or_default())
    }

    async fn analyze_risk(&self, text: &str) -> Result<String, LlmError> {
        Ok(self.lookup(text).await?.risk_reason.unwrap_or_default())
    }

    async fn infer_contract_type(&self, _clauses: &[Clause]) -> Result<Option<String>, LlmError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        match &self.inferred_type {
            Some(t) => Ok(Some(t.clone())),
            None => Err(LlmError::Unsupported("infer_contract_type")),
        }
    }

    async fn suggest_improvement(&self, text: &str) -> Result<Suggestion, LlmError> {
        self.lookup(text).await?;
        Ok(Suggestion {
            suggestion: format!("{} (수정안)", text),
            rationale: "mock rationale".to_string(),
            risk_delta: -10,
        })
    }
}

#[async_trait]
impl StructuredBackend for MockBackend {
    async fn analyze_clause(&self, text: &str) -> Result<ClauseAnnotation, LlmError> {
        self.lookup(text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotation(summary: &str) -> ClauseAnnotation {
        ClauseAnnotation {
            summary: Some(summary.to_string()),
            category: Some("general".to_string()),
            risk_reason: Some("Low risk".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_mock_default_response() {
        let backend = MockBackend::new(annotation("default"));
        let result = backend.analyze_clause("anything").await.unwrap();
        assert_eq!(result.summary.as_deref(), Some("default"));
    }

    #[tokio::test]
    async fn test_mock_specific_responses() {
        let mut backend = MockBackend::new(annotation("default"));
        backend.add_response("a", annotation("first"));

        assert_eq!(backend.summarize_clause("a").await.unwrap(), "first");
        assert_eq!(backend.summarize_clause("b").await.unwrap(), "default");
        assert_eq!(backend.classify_clause("a").await.unwrap(), "general");
    }

    #[tokio::test]
    async fn test_mock_error() {
        let mut backend = MockBackend::default();
        backend.add_error("bad clause");

        let result = backend.analyze_clause("bad clause").await;
        assert!(matches!(result, Err(LlmError::Other(_))));
    }

    #[tokio::test]
    async fn test_mock_call_count_shared_by_clones() {
        let backend = MockBackend::default();
        let clone = backend.clone();

        backend.analyze_risk("x").await.unwrap();
        clone.analyze_risk("y").await.unwrap();
        assert_eq!(backend.call_count(), 2);
        assert_eq!(clone.call_count(), 2);

        backend.reset_call_count();
        assert_eq!(clone.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_contract_type() {
        let plain = MockBackend::default();
        assert!(plain.infer_contract_type(&[]).await.is_err());

        let typed = MockBackend::default().with_contract_type("lease");
        assert_eq!(typed.infer_contract_type(&[]).await.unwrap().as_deref(), Some("lease"));
    }
}
