//! Contract-type-aware risk scoring
//!
//! Every contract type maps to a [`RiskPolicy`]. The general policy turns an
//! annotation hint into a score; domain policies add keyword bonuses on top.
//!
//! # Scoring
//!
//! ```text
//! backend score present  -> score = clamp(backend score)
//! otherwise              -> "high" 85 | "medium" 60 | "low" 25 | 40
//! level                  -> >=75 high, >=50 medium, else low
//!                           (a backend level wins only when no score was given)
//! domain bonus > 0       -> score = min(score + bonus, 100), level recomputed
//! ```

use crate::error::AnalysisError;
use guardian_domain::{
    clamp_score, AnalysisResult, AnnotationHint, Clause, ClauseRisk, ContractType, DocumentId,
    RiskLevel,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Hint keywords checked in priority order, with the score they imply
const HINT_SCORES: &[(&[&str], i64)] = &[
    (&["high", "높음"], 85),
    (&["medium", "보통"], 60),
    (&["low", "낮음"], 25),
];

/// Score for a hint with no recognizable signal
pub const NO_SIGNAL_SCORE: i64 = 40;

/// A contract-type-specific scoring strategy
pub trait RiskPolicy: Send + Sync {
    /// Contract type this policy scores
    fn contract_type(&self) -> ContractType;

    /// Score one clause from its annotation hint
    fn score(&self, clause: &Clause, hint: &AnnotationHint) -> ClauseRisk;
}

/// Policy for contracts without a dedicated policy
#[derive(Debug, Clone, Copy, Default)]
pub struct BasePolicy;

impl BasePolicy {
    /// Score implied by the hint text alone
    ///
    /// ```
    /// use guardian_analysis::BasePolicy;
    ///
    /// assert_eq!(BasePolicy::score_from_hint("High risk: 위약금"), 85);
    /// assert_eq!(BasePolicy::score_from_hint("LOW risk"), 25);
    /// assert_eq!(BasePolicy::score_from_hint("unclear"), 40);
    /// ```
    pub fn score_from_hint(hint: &str) -> i64 {
        let lowered = hint.to_lowercase();
        HINT_SCORES
            .iter()
            .find(|(tokens, _)| tokens.iter().any(|t| lowered.contains(t)))
            .map(|(_, score)| *score)
            .unwrap_or(NO_SIGNAL_SCORE)
    }
}

impl RiskPolicy for BasePolicy {
    fn contract_type(&self) -> ContractType {
        ContractType::General
    }

    fn score(&self, _clause: &Clause, hint: &AnnotationHint) -> ClauseRisk {
        let score = clamp_score(
            hint.risk_score
                .unwrap_or_else(|| Self::score_from_hint(&hint.risk_reason)),
        );

        let mut level = RiskLevel::from_score(score as i64);
        if hint.risk_score.is_none() {
            if let Some(asserted) = hint.risk_level.as_deref().and_then(RiskLevel::parse) {
                level = asserted;
            }
        }

        ClauseRisk::with_level(score, level, hint.risk_reason.clone())
    }
}

/// A bonus applied when a clause matches a category or mentions a keyword
#[derive(Debug, Clone, Copy)]
struct Adjustment {
    bonus: i64,
    categories: &'static [&'static str],
    keywords: &'static [&'static str],
}

impl Adjustment {
    fn applies(&self, category: &str, text: &str) -> bool {
        self.categories.contains(&category) || self.keywords.iter().any(|k| text.contains(k))
    }
}

const EMPLOYMENT_ADJUSTMENTS: &[Adjustment] = &[
    Adjustment {
        bonus: 10,
        categories: &["termination", "penalty", "responsibility"],
        keywords: &[
            "해지", "해고", "위약금", "손해배상", "배상", "책임",
            "termination", "penalty", "liability",
        ],
    },
    Adjustment {
        bonus: 5,
        categories: &[],
        keywords: &["근로시간", "연장근로", "야근", "초과근무", "overtime", "working hours"],
    },
];

const LEASE_ADJUSTMENTS: &[Adjustment] = &[
    Adjustment {
        bonus: 10,
        categories: &["payment", "penalty"],
        keywords: &["보증금", "담보", "deposit", "collateral"],
    },
    Adjustment {
        bonus: 8,
        categories: &[],
        keywords: &[
            "수선", "원상복구", "원상회복", "유지보수",
            "repair", "restoration", "maintenance",
        ],
    },
];

/// Base score plus the matching bonuses, level recomputed when any applied
fn adjusted(clause: &Clause, hint: &AnnotationHint, adjustments: &[Adjustment]) -> ClauseRisk {
    let base = BasePolicy.score(clause, hint);

    let category = clause.category_or_default().trim().to_lowercase();
    let text = clause.raw_text.to_lowercase();
    let bonus: i64 = adjustments
        .iter()
        .filter(|a| a.applies(&category, &text))
        .map(|a| a.bonus)
        .sum();

    if bonus == 0 {
        return base;
    }
    debug!("{}: +{} domain adjustment", clause.id, bonus);
    ClauseRisk::from_score(base.score as i64 + bonus, base.explanation)
}

/// Employment contracts: termination, liability and overtime weigh more
#[derive(Debug, Clone, Copy, Default)]
pub struct EmploymentPolicy;

impl RiskPolicy for EmploymentPolicy {
    fn contract_type(&self) -> ContractType {
        ContractType::Employment
    }

    fn score(&self, clause: &Clause, hint: &AnnotationHint) -> ClauseRisk {
        adjusted(clause, hint, EMPLOYMENT_ADJUSTMENTS)
    }
}

/// Lease contracts: deposits, payment and repair duties weigh more
#[derive(Debug, Clone, Copy, Default)]
pub struct LeasePolicy;

impl RiskPolicy for LeasePolicy {
    fn contract_type(&self) -> ContractType {
        ContractType::Lease
    }

    fn score(&self, clause: &Clause, hint: &AnnotationHint) -> ClauseRisk {
        adjusted(clause, hint, LEASE_ADJUSTMENTS)
    }
}

/// Policies keyed by contract type
///
/// Choosing a type without a registered policy yields the general policy.
#[derive(Clone)]
pub struct PolicyRegistry {
    policies: HashMap<ContractType, Arc<dyn RiskPolicy>>,
}

impl PolicyRegistry {
    /// Registry with only the general policy
    pub fn new() -> Self {
        let mut registry = Self {
            policies: HashMap::new(),
        };
        registry.register(BasePolicy);
        registry
    }

    /// Register a policy, replacing any earlier one for the same type
    pub fn register<P: RiskPolicy + 'static>(&mut self, policy: P) {
        self.policies.insert(policy.contract_type(), Arc::new(policy));
    }

    /// Policy for a contract type
    pub fn get(&self, contract_type: ContractType) -> Arc<dyn RiskPolicy> {
        self.policies
            .get(&contract_type)
            .or_else(|| self.policies.get(&ContractType::General))
            .cloned()
            .unwrap_or_else(|| Arc::new(BasePolicy))
    }

    /// Policy for a contract type name; unknown names get the general policy
    pub fn choose(&self, contract_type: &str) -> Arc<dyn RiskPolicy> {
        self.get(ContractType::resolve(contract_type))
    }
}

impl Default for PolicyRegistry {
    /// General, employment and lease policies
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(EmploymentPolicy);
        registry.register(LeasePolicy);
        registry
    }
}

impl std::fmt::Debug for PolicyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut types: Vec<&str> = self.policies.keys().map(|t| t.as_str()).collect();
        types.sort_unstable();
        f.debug_struct("PolicyRegistry").field("policies", &types).finish()
    }
}

/// Scores clauses and aggregates them into an [`AnalysisResult`]
#[derive(Debug, Clone, Default)]
pub struct RiskEngine {
    registry: PolicyRegistry,
}

impl RiskEngine {
    /// Create an engine over a registry
    pub fn new(registry: PolicyRegistry) -> Self {
        Self { registry }
    }

    /// The policy registry
    pub fn registry(&self) -> &PolicyRegistry {
        &self.registry
    }

    /// Score every clause under the policy for `contract_type`
    ///
    /// Clauses and hints are paired by position.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::HintMismatch`] when the two sequences differ
    /// in length.
    pub fn analyze(
        &self,
        document_id: DocumentId,
        clauses: Vec<Clause>,
        hints: &[AnnotationHint],
        contract_type: ContractType,
    ) -> Result<AnalysisResult, AnalysisError> {
        if clauses.len() != hints.len() {
            return Err(AnalysisError::HintMismatch {
                clauses: clauses.len(),
                hints: hints.len(),
            });
        }

        let policy = self.registry.get(contract_type);
        let scored: Vec<Clause> = clauses
            .into_iter()
            .zip(hints)
            .map(|(mut clause, hint)| {
                clause.risk = Some(policy.score(&clause, hint));
                clause
            })
            .collect();

        let result = AnalysisResult::new(document_id, scored, contract_type);
        info!(
            "Scored {} clauses under '{}' policy: overall {:.1} ({})",
            result.clauses.len(),
            contract_type,
            result.overall_risk_score,
            result.overall_risk_level
        );
        Ok(result)
    }
}
