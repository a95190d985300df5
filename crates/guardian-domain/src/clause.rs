//! Clause records and their scored risk

use crate::risk::{clamp_score, RiskLevel};
use serde::{Deserialize, Serialize};

/// Explanation used when scoring had no hint text to show
pub const GENERIC_EXPLANATION: &str = "No specific risk signal was reported for this clause.";

/// Normalized risk for one clause
///
/// Created exactly once per clause by a risk policy. `score` is always
/// within 0..=100 and `explanation` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClauseRisk {
    /// Risk score (0-100)
    pub score: u8,

    /// Badge level, consistent with `score` unless a backend level overrode it
    pub level: RiskLevel,

    /// Human-readable reason
    pub explanation: String,
}

impl ClauseRisk {
    /// Build a risk record whose level is derived from the score
    ///
    /// # Examples
    ///
    /// ```
    /// use guardian_domain::{ClauseRisk, RiskLevel};
    ///
    /// let risk = ClauseRisk::from_score(130, "penalty clause");
    /// assert_eq!(risk.score, 100);
    /// assert_eq!(risk.level, RiskLevel::High);
    /// ```
    pub fn from_score(score: i64, explanation: impl Into<String>) -> Self {
        let score = clamp_score(score);
        Self::with_level(score, RiskLevel::from_score(score as i64), explanation)
    }

    /// Build a risk record with an explicit level
    ///
    /// The score is already clamped; an empty explanation is replaced by
    /// [`GENERIC_EXPLANATION`].
    pub fn with_level(score: u8, level: RiskLevel, explanation: impl Into<String>) -> Self {
        let explanation = explanation.into();
        let explanation = if explanation.trim().is_empty() {
            GENERIC_EXPLANATION.to_string()
        } else {
            explanation
        };

        Self {
            score: score.min(crate::risk::MAX_SCORE),
            level,
            explanation,
        }
    }
}

/// One structurally-delimited unit of contract text
///
/// Created by the segmenter in document order, then annotated and finally
/// scored. `raw_text` never changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    /// Sequential identifier (`clause-1`, `clause-2`, ...)
    pub id: String,

    /// Clause text as segmented
    pub raw_text: String,

    /// Backend-supplied summary
    pub summary: Option<String>,

    /// Backend-supplied category label
    pub category: Option<String>,

    /// Scored risk, absent until the policy engine runs
    pub risk: Option<ClauseRisk>,

    /// Free-text reasoning from the backend
    pub reasoning: Option<String>,
}

impl Clause {
    /// Create an unannotated clause at the given 1-based position
    pub fn new(position: usize, raw_text: impl Into<String>) -> Self {
        Self {
            id: format!("clause-{}", position),
            raw_text: raw_text.into(),
            summary: None,
            category: None,
            risk: None,
            reasoning: None,
        }
    }

    /// Category label, defaulting to "general"
    pub fn category_or_default(&self) -> &str {
        self.category.as_deref().unwrap_or("general")
    }

    /// Score of this clause, 0 when unscored
    pub fn score(&self) -> u8 {
        self.risk.as_ref().map(|r| r.score).unwrap_or(0)
    }
}
