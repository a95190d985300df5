//! Backend annotations and the hints handed to the risk policies

use serde::{Deserialize, Serialize};

/// Structured annotation returned by a backend for one clause
///
/// Every field is optional: backends may answer partially.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClauseAnnotation {
    /// One-sentence summary
    #[serde(default)]
    pub summary: Option<String>,

    /// Category label (payment, termination, responsibility, ...)
    #[serde(default)]
    pub category: Option<String>,

    /// Short explanation of the risk
    #[serde(default)]
    pub risk_reason: Option<String>,

    /// Backend-asserted score, not yet clamped
    #[serde(default)]
    pub risk_score: Option<i64>,

    /// Backend-asserted level string
    #[serde(default)]
    pub risk_level: Option<String>,

    /// Free-text reasoning
    #[serde(default)]
    pub reasoning: Option<String>,
}

impl ClauseAnnotation {
    /// The scoring signal carried by this annotation
    pub fn hint(&self) -> AnnotationHint {
        AnnotationHint {
            risk_reason: self.risk_reason.clone().unwrap_or_default(),
            risk_score: self.risk_score,
            risk_level: self.risk_level.clone(),
        }
    }
}

/// Raw per-clause risk signal consumed by the policy engine
///
/// Paired with clauses by position, never by identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationHint {
    /// Free-text reason, possibly empty
    pub risk_reason: String,

    /// Backend-supplied score
    pub risk_score: Option<i64>,

    /// Backend-supplied level string
    pub risk_level: Option<String>,
}

impl AnnotationHint {
    /// A hint carrying only text
    pub fn from_reason(reason: impl Into<String>) -> Self {
        Self {
            risk_reason: reason.into(),
            risk_score: None,
            risk_level: None,
        }
    }
}

/// Suggested rewrite of a clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClauseImprovement {
    /// Clause the suggestion applies to
    pub clause_id: String,

    /// Proposed clause text
    pub suggestion: String,

    /// Why the rewrite is fairer
    pub rationale: String,

    /// Expected score change (negative lowers the risk)
    pub risk_delta: i32,
}

impl ClauseImprovement {
    /// Suggestion that leaves the clause unchanged
    pub fn unchanged(clause_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            clause_id: clause_id.into(),
            suggestion: text.into(),
            rationale: String::new(),
            risk_delta: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_from_partial_annotation() {
        let annotation = ClauseAnnotation {
            risk_score: Some(70),
            ..Default::default()
        };
        let hint = annotation.hint();
        assert_eq!(hint.risk_reason, "");
        assert_eq!(hint.risk_score, Some(70));
        assert!(hint.risk_level.is_none());
    }

    #[test]
    fn test_annotation_deserializes_missing_fields() {
        let annotation: ClauseAnnotation =
            serde_json::from_str(r#"{"summary": "요약", "risk_level": "high"}"#).unwrap();
        assert_eq!(annotation.summary.as_deref(), Some("요약"));
        assert_eq!(annotation.risk_level.as_deref(), Some("high"));
        assert!(annotation.category.is_none());
    }

    #[test]
    fn test_unchanged_improvement() {
        let improvement = ClauseImprovement::unchanged("clause-2", "original");
        assert_eq!(improvement.suggestion, "original");
        assert_eq!(improvement.risk_delta, 0);
    }
}
