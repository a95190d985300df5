//! Analysis result - the artifact handed to reports and API callers

use crate::clause::Clause;
use crate::contract_type::ContractType;
use crate::document::DocumentId;
use crate::risk::RiskLevel;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Outcome of one analysis run over a document
///
/// Built once by the pipeline and never patched; re-analysing a document
/// produces a fresh result. `overall_risk_level` is derived from
/// `overall_risk_score` at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Analysed document
    pub document_id: DocumentId,

    /// Scored clauses in document order
    pub clauses: Vec<Clause>,

    /// Arithmetic mean of clause scores (0 with no clauses)
    pub overall_risk_score: f64,

    /// Level derived from `overall_risk_score`
    pub overall_risk_level: RiskLevel,

    /// Type the scoring policy was chosen under
    pub contract_type: ContractType,

    /// Type inferred from the annotated clauses, if any
    pub auto_contract_type: Option<String>,

    /// Creation time (Unix seconds)
    pub created_at: u64,
}

impl AnalysisResult {
    /// Aggregate scored clauses into a result
    ///
    /// # Examples
    ///
    /// ```
    /// use guardian_domain::{AnalysisResult, ContractType, DocumentId, RiskLevel};
    ///
    /// let result = AnalysisResult::new(DocumentId::new(), Vec::new(), ContractType::General);
    /// assert_eq!(result.overall_risk_score, 0.0);
    /// assert_eq!(result.overall_risk_level, RiskLevel::Low);
    /// ```
    pub fn new(document_id: DocumentId, clauses: Vec<Clause>, contract_type: ContractType) -> Self {
        let overall_risk_score = mean_score(&clauses);

        Self {
            document_id,
            clauses,
            overall_risk_score,
            overall_risk_level: RiskLevel::from_mean(overall_risk_score),
            contract_type,
            auto_contract_type: None,
            created_at: current_timestamp(),
        }
    }

    /// Record the backend-inferred contract type
    pub fn with_auto_contract_type(mut self, auto_contract_type: Option<String>) -> Self {
        self.auto_contract_type = auto_contract_type;
        self
    }

    /// Look up a clause by id
    pub fn clause(&self, clause_id: &str) -> Option<&Clause> {
        self.clauses.iter().find(|c| c.id == clause_id)
    }
}

/// Unweighted mean of clause scores
fn mean_score(clauses: &[Clause]) -> f64 {
    if clauses.is_empty() {
        return 0.0;
    }
    let total: u64 = clauses.iter().map(|c| c.score() as u64).sum();
    total as f64 / clauses.len() as f64
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
