//! Annotation orchestration over all clauses of a document
//!
//! Drives the configured [`Backend`] clause by clause. A backend failure for
//! one clause degrades that clause only; the rest of the document is still
//! annotated.

use crate::config::AnalysisConfig;
use futures::stream::{self, StreamExt};
use guardian_domain::{AnnotationHint, Clause, ClauseAnnotation};
use guardian_llm::{Backend, ClauseBackend, LlmError, StructuredBackend};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Summary given to a clause the backend could not annotate
pub const UNAVAILABLE_SUMMARY: &str = "[LLM error] 요약 불가";

/// Prefix of the risk reason of a degraded clause
pub const UNAVAILABLE_REASON: &str = "LLM unavailable";

/// Category used when the backend gave none
pub const DEFAULT_CATEGORY: &str = "general";

const EMPLOYMENT_CATEGORIES: &[&str] = &["employment", "labor", "salary", "wage"];
const SALARY_TOKENS: &[&str] = &["급여", "임금", "연봉", "salary", "wage"];
const LEASE_CATEGORIES: &[&str] = &["lease"];
const DEPOSIT_TOKENS: &[&str] = &["보증금", "deposit"];

/// Result of annotating one clause
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationOutcome {
    /// The backend answered
    Annotated {
        /// Clause with summary, category and reasoning set
        clause: Clause,
        /// Scoring signal from the backend
        hint: AnnotationHint,
    },

    /// The backend failed; fail-soft defaults were applied
    Degraded {
        /// Clause with earlier values kept and gaps filled by placeholders
        clause: Clause,
        /// Human-readable failure reason
        reason: String,
    },
}

impl AnnotationOutcome {
    /// Whether the backend failed for this clause
    pub fn is_degraded(&self) -> bool {
        matches!(self, AnnotationOutcome::Degraded { .. })
    }

    /// The annotated clause
    pub fn clause(&self) -> &Clause {
        match self {
            AnnotationOutcome::Annotated { clause, .. } | AnnotationOutcome::Degraded { clause, .. } => {
                clause
            }
        }
    }

    /// Split into the clause and the hint handed to the risk policies
    ///
    /// A degraded clause carries its failure reason and no score or level,
    /// so scoring falls back to the hint text.
    pub fn into_parts(self) -> (Clause, AnnotationHint) {
        match self {
            AnnotationOutcome::Annotated { clause, hint } => (clause, hint),
            AnnotationOutcome::Degraded { clause, reason } => (clause, AnnotationHint::from_reason(reason)),
        }
    }
}

/// Drives a backend over the clauses of a document
pub struct AnnotationOrchestrator {
    backend: Backend,
    max_concurrent: usize,
    call_timeout: Duration,
    infer_contract_type: bool,
}

impl AnnotationOrchestrator {
    /// Create an orchestrator for a backend
    pub fn new(backend: Backend, config: &AnalysisConfig) -> Self {
        Self {
            backend,
            max_concurrent: config.max_concurrent_annotations.max(1),
            call_timeout: config.annotation_timeout(),
            infer_contract_type: config.infer_contract_type,
        }
    }

    /// The backend in use
    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    /// Annotate every clause, returning one hint per clause in the same order
    pub async fn annotate(&self, clauses: Vec<Clause>) -> (Vec<Clause>, Vec<AnnotationHint>) {
        self.annotate_outcomes(clauses)
            .await
            .into_iter()
            .map(AnnotationOutcome::into_parts)
            .unzip()
    }

    /// Annotate every clause, keeping the per-clause outcome
    ///
    /// Up to `max_concurrent_annotations` clauses are in flight at once;
    /// outcomes come back in document order regardless of completion order.
    pub async fn annotate_outcomes(&self, clauses: Vec<Clause>) -> Vec<AnnotationOutcome> {
        let total = clauses.len();
        info!(
            "Annotating {} clauses with {:?} (concurrency {})",
            total, self.backend, self.max_concurrent
        );

        let outcomes: Vec<AnnotationOutcome> = stream::iter(clauses)
            .map(|clause| self.annotate_clause(clause))
            .buffered(self.max_concurrent)
            .collect()
            .await;

        let degraded = outcomes.iter().filter(|o| o.is_degraded()).count();
        if degraded > 0 {
            warn!("{} of {} clauses degraded", degraded, total);
        }
        outcomes
    }

    /// Annotate a single clause
    pub async fn annotate_clause(&self, clause: Clause) -> AnnotationOutcome {
        match &self.backend {
            Backend::Structured(backend) => {
                match self.with_timeout(backend.analyze_clause(&clause.raw_text)).await {
                    Ok(annotation) => apply_annotation(clause, annotation),
                    Err(e) => degrade(clause, &e),
                }
            }
            Backend::Triad(backend) => {
                let mut clause = clause;
                match self.annotate_triad(backend.as_ref(), &mut clause).await {
                    Ok(hint) => {
                        if clause.category.is_none() {
                            clause.category = Some(DEFAULT_CATEGORY.to_string());
                        }
                        AnnotationOutcome::Annotated { clause, hint }
                    }
                    Err(e) => degrade(clause, &e),
                }
            }
        }
    }

    /// Summary, category and risk reason in sequence; values set before a
    /// failure stay on the clause
    async fn annotate_triad(
        &self,
        backend: &dyn ClauseBackend,
        clause: &mut Clause,
    ) -> Result<AnnotationHint, LlmError> {
        let summary = self.with_timeout(backend.summarize_clause(&clause.raw_text)).await?;
        clause.summary = non_empty(summary).or(clause.summary.take());

        let category = self.with_timeout(backend.classify_clause(&clause.raw_text)).await?;
        clause.category = non_empty(category).or(clause.category.take());

        let reason = self.with_timeout(backend.analyze_risk(&clause.raw_text)).await?;
        debug!("{} annotated via triad", clause.id);
        Ok(AnnotationHint::from_reason(reason))
    }

    /// Document-level contract type, best effort
    ///
    /// Asks the backend when enabled, then falls back to
    /// [`heuristic_contract_type`]. Never fails.
    pub async fn infer_contract_type(&self, clauses: &[Clause]) -> Option<String> {
        if self.infer_contract_type {
            match self.with_timeout(self.backend.infer_contract_type(clauses)).await {
                Ok(Some(inferred)) => {
                    let inferred = inferred.trim().to_lowercase();
                    if !inferred.is_empty() {
                        debug!("Backend inferred contract type '{}'", inferred);
                        return Some(inferred);
                    }
                }
                Ok(None) => debug!("Backend could not infer a contract type"),
                Err(e) => debug!("Contract type inference unavailable: {}", e),
            }
        }

        heuristic_contract_type(clauses).map(str::to_string)
    }

    async fn with_timeout<T, F>(&self, call: F) -> Result<T, LlmError>
    where
        F: Future<Output = Result<T, LlmError>>,
    {
        match tokio::time::timeout(self.call_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(LlmError::Timeout(self.call_timeout.as_secs())),
        }
    }
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn apply_annotation(mut clause: Clause, annotation: ClauseAnnotation) -> AnnotationOutcome {
    let hint = annotation.hint();
    clause.summary = annotation.summary.or(clause.summary);
    clause.category = annotation
        .category
        .or(clause.category)
        .or_else(|| Some(DEFAULT_CATEGORY.to_string()));
    clause.reasoning = annotation.reasoning.or(clause.reasoning);
    debug!("{} annotated", clause.id);
    AnnotationOutcome::Annotated { clause, hint }
}

fn degrade(mut clause: Clause, error: &LlmError) -> AnnotationOutcome {
    warn!("LLM provider failed for {}, using fallback summary: {}", clause.id, error);
    if clause.summary.is_none() {
        clause.summary = Some(UNAVAILABLE_SUMMARY.to_string());
    }
    if clause.category.is_none() {
        clause.category = Some(DEFAULT_CATEGORY.to_string());
    }
    let reason = format!("{}: {}", UNAVAILABLE_REASON, error);
    if clause.reasoning.is_none() {
        clause.reasoning = Some(reason.clone());
    }
    AnnotationOutcome::Degraded { clause, reason }
}

/// Guess the contract type from clause categories and text
///
/// Employment wins over lease when both signals are present.
pub fn heuristic_contract_type(clauses: &[Clause]) -> Option<&'static str> {
    let has_category = |wanted: &[&str]| -> bool {
        clauses.iter().any(|c| {
            c.category
                .as_deref()
                .map(|cat| wanted.contains(&cat.trim().to_lowercase().as_str()))
                .unwrap_or(false)
        })
    };
    let text = clauses
        .iter()
        .map(|c| c.raw_text.to_lowercase())
        .collect::<Vec<_>>()
        .join("\n");
    let has_token = |tokens: &[&str]| -> bool { tokens.iter().any(|t| text.contains(t)) };

    if has_category(EMPLOYMENT_CATEGORIES) || has_token(SALARY_TOKENS) {
        Some("employment")
    } else if has_category(LEASE_CATEGORIES) || has_token(DEPOSIT_TOKENS) {
        Some("lease")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guardian_llm::{DummyBackend, MockBackend};

    fn annotation(summary: &str, category: &str, reason: &str) -> ClauseAnnotation {
        ClauseAnnotation {
            summary: Some(summary.to_string()),
            category: Some(category.to_string()),
            risk_reason: Some(reason.to_string()),
            ..Default::default()
        }
    }

    fn clauses(texts: &[&str]) -> Vec<Clause> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Clause::new(i + 1, *t))
            .collect()
    }

    fn orchestrator(backend: Backend) -> AnnotationOrchestrator {
        AnnotationOrchestrator::new(backend, &AnalysisConfig::default())
    }

    #[tokio::test]
    async fn test_structured_annotation() {
        let mut mock = MockBackend::default();
        mock.add_response(
            "제1조",
            ClauseAnnotation {
                risk_score: Some(80),
                risk_level: Some("high".to_string()),
                reasoning: Some("위약금".to_string()),
                ..annotation("요약", "penalty", "High risk")
            },
        );
        let orch = orchestrator(Backend::structured(mock));

        let (annotated, hints) = orch.annotate(clauses(&["제1조"])).await;
        assert_eq!(annotated[0].summary.as_deref(), Some("요약"));
        assert_eq!(annotated[0].category.as_deref(), Some("penalty"));
        assert_eq!(annotated[0].reasoning.as_deref(), Some("위약금"));
        assert_eq!(hints[0].risk_score, Some(80));
        assert_eq!(hints[0].risk_level.as_deref(), Some("high"));
    }

    #[tokio::test]
    async fn test_missing_category_defaults_to_general() {
        let orch = orchestrator(Backend::structured(MockBackend::default()));
        let (annotated, hints) = orch.annotate(clauses(&["x"])).await;
        assert_eq!(annotated[0].category.as_deref(), Some(DEFAULT_CATEGORY));
        assert_eq!(hints[0], AnnotationHint::default());
    }

    #[tokio::test]
    async fn test_triad_annotation() {
        let mock = MockBackend::new(annotation("요약", "termination", "Medium risk: 해지"));
        let counter = mock.clone();
        let orch = orchestrator(Backend::triad(mock));

        let (annotated, hints) = orch.annotate(clauses(&["제3조 (해지)"])).await;
        assert_eq!(annotated[0].summary.as_deref(), Some("요약"));
        assert_eq!(annotated[0].category.as_deref(), Some("termination"));
        assert_eq!(hints[0].risk_reason, "Medium risk: 해지");
        assert_eq!(hints[0].risk_score, None);
        assert_eq!(counter.call_count(), 3);
    }

    #[tokio::test]
    async fn test_failure_is_isolated_per_clause() {
        let mut mock = MockBackend::new(annotation("ok", "payment", "Low risk"));
        mock.add_error("bad");
        let orch = orchestrator(Backend::structured(mock));

        let outcomes = orch.annotate_outcomes(clauses(&["before", "bad", "after"])).await;
        assert!(!outcomes[0].is_degraded());
        assert!(outcomes[1].is_degraded());
        assert!(!outcomes[2].is_degraded());

        let (annotated, hints): (Vec<_>, Vec<_>) =
            outcomes.into_iter().map(AnnotationOutcome::into_parts).unzip();
        assert_eq!(annotated[0].summary.as_deref(), Some("ok"));
        assert_eq!(annotated[2].category.as_deref(), Some("payment"));
        assert_eq!(annotated[1].summary.as_deref(), Some(UNAVAILABLE_SUMMARY));
        assert_eq!(annotated[1].category.as_deref(), Some(DEFAULT_CATEGORY));
        assert_eq!(annotated[1].reasoning.as_deref(), Some(hints[1].risk_reason.as_str()));
        assert_eq!(annotated[0].reasoning, None);
        assert!(hints[1].risk_reason.starts_with(UNAVAILABLE_REASON));
        assert!(hints[1].risk_reason.contains("Mock error"));
        assert_eq!(hints[1].risk_score, None);
        assert_eq!(hints[1].risk_level, None);
    }

    #[tokio::test]
    async fn test_degraded_clause_keeps_earlier_values() {
        let mut mock = MockBackend::default();
        mock.add_error("bad");
        let orch = orchestrator(Backend::structured(mock));

        let mut clause = Clause::new(1, "bad");
        clause.summary = Some("earlier".to_string());
        clause.reasoning = Some("earlier reasoning".to_string());

        let (clause, _) = orch.annotate_clause(clause).await.into_parts();
        assert_eq!(clause.summary.as_deref(), Some("earlier"));
        assert_eq!(clause.reasoning.as_deref(), Some("earlier reasoning"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_degrades_clause() {
        let mut mock = MockBackend::default();
        mock.add_delay("slow", Duration::from_secs(600));
        let orch = orchestrator(Backend::structured(mock));

        let outcomes = orch.annotate_outcomes(clauses(&["slow", "fast"])).await;
        assert!(outcomes[0].is_degraded());
        assert!(!outcomes[1].is_degraded());
        let (_, hint) = outcomes[0].clone().into_parts();
        assert!(hint.risk_reason.contains("timed out after 60s"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_output_order_matches_document_order() {
        let mut mock = MockBackend::default();
        mock.add_response("first", annotation("1", "general", "low"));
        mock.add_response("second", annotation("2", "general", "low"));
        mock.add_response("third", annotation("3", "general", "low"));
        mock.add_delay("first", Duration::from_secs(5));
        mock.add_delay("second", Duration::from_secs(1));
        let orch = orchestrator(Backend::structured(mock));

        let (annotated, _) = orch.annotate(clauses(&["first", "second", "third"])).await;
        let summaries: Vec<_> = annotated.iter().filter_map(|c| c.summary.as_deref()).collect();
        assert_eq!(summaries, vec!["1", "2", "3"]);
        let ids: Vec<_> = annotated.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["clause-1", "clause-2", "clause-3"]);
    }

    #[tokio::test]
    async fn test_empty_document() {
        let orch = orchestrator(Backend::structured(DummyBackend::new()));
        let (annotated, hints) = orch.annotate(Vec::new()).await;
        assert!(annotated.is_empty());
        assert!(hints.is_empty());
    }

    #[tokio::test]
    async fn test_infer_prefers_backend_answer() {
        let orch = orchestrator(Backend::structured(MockBackend::default().with_contract_type(" Lease ")));
        let inferred = orch.infer_contract_type(&clauses(&["급여는 매월 지급"])).await;
        assert_eq!(inferred.as_deref(), Some("lease"));
    }

    #[tokio::test]
    async fn test_infer_falls_back_to_heuristic() {
        let orch = orchestrator(Backend::structured(MockBackend::default()));
        let inferred = orch.infer_contract_type(&clauses(&["급여는 매월 25일 지급한다."])).await;
        assert_eq!(inferred.as_deref(), Some("employment"));
    }

    #[tokio::test]
    async fn test_infer_disabled_skips_backend() {
        let backend = MockBackend::default().with_contract_type("lease");
        let counter = backend.clone();
        let mut config = AnalysisConfig::default();
        config.infer_contract_type = false;
        let orch = AnnotationOrchestrator::new(Backend::structured(backend), &config);

        assert_eq!(orch.infer_contract_type(&clauses(&["plain"])).await, None);
        assert_eq!(counter.call_count(), 0);
    }

    #[test]
    fn test_heuristic_contract_type() {
        let mut by_category = clauses(&["제1조"]);
        by_category[0].category = Some("Labor".to_string());
        assert_eq!(heuristic_contract_type(&by_category), Some("employment"));

        assert_eq!(heuristic_contract_type(&clauses(&["임대 보증금은 1억 원"])), Some("lease"));
        assert_eq!(heuristic_contract_type(&clauses(&["The Deposit is due"])), Some("lease"));

        let mut lease = clauses(&["제1조"]);
        lease[0].category = Some("lease".to_string());
        assert_eq!(heuristic_contract_type(&lease), Some("lease"));

        assert_eq!(heuristic_contract_type(&clauses(&["연봉 및 보증금"])), Some("employment"));
        assert_eq!(heuristic_contract_type(&clauses(&["목적"])), None);
        assert_eq!(heuristic_contract_type(&[]), None);
    }
}
