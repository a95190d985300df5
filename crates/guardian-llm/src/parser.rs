//! Parse chat-model output into annotations

use crate::backend::Suggestion;
use crate::LlmError;
use guardian_domain::ClauseAnnotation;
use serde_json::{Map, Value};

/// Extract the JSON object from a response
///
/// Models sometimes wrap JSON in markdown code blocks or add a sentence
/// around it; everything outside the outermost braces is dropped.
pub fn extract_json(response: &str) -> Result<&str, LlmError> {
    let trimmed = response.trim();
    let start = trimmed.find('{');
    let end = trimmed.rfind('}');

    match (start, end) {
        (Some(start), Some(end)) if start < end => Ok(&trimmed[start..=end]),
        _ => Err(LlmError::InvalidResponse(
            "No JSON object in response".to_string(),
        )),
    }
}

fn parse_object(response: &str) -> Result<Map<String, Value>, LlmError> {
    let json = extract_json(response)?;
    let value: Value = serde_json::from_str(json)
        .map_err(|e| LlmError::InvalidResponse(format!("JSON parse error: {}", e)))?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(LlmError::InvalidResponse("Expected JSON object".to_string())),
    }
}

/// Non-empty string field
fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Integer field that may arrive as an int, a float or a numeric string
fn integer_field(obj: &Map<String, Value>, key: &str) -> Result<Option<i64>, LlmError> {
    let invalid = || LlmError::InvalidResponse(format!("'{}' is not a number", key));

    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => Ok(Some(i)),
            None => n.as_f64().map(|f| Some(f.round() as i64)).ok_or_else(invalid),
        },
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f.round() as i64))
                .map(Some)
                .ok_or_else(invalid)
        }
        Some(_) => Err(invalid()),
    }
}

/// Reasoning may be a string or a list of bullet strings
fn reasoning_field(obj: &Map<String, Value>) -> Option<String> {
    match obj.get("reasoning") {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Array(items)) => {
            let lines: Vec<&str> = items.iter().filter_map(|v| v.as_str()).collect();
            if lines.is_empty() {
                None
            } else {
                Some(lines.join("\n"))
            }
        }
        _ => None,
    }
}

/// Parse a structured clause annotation
///
/// Missing fields stay `None`. A score that is present but not numeric makes
/// the whole response invalid.
pub fn parse_clause_annotation(response: &str) -> Result<ClauseAnnotation, LlmError> {
    let obj = parse_object(response)?;

    Ok(ClauseAnnotation {
        summary: string_field(&obj, "summary"),
        category: string_field(&obj, "category").map(|c| normalize_label(&c)),
        risk_reason: string_field(&obj, "risk_reason"),
        risk_score: integer_field(&obj, "risk_score")?,
        risk_level: string_field(&obj, "risk_level"),
        reasoning: reasoning_field(&obj),
    })
}

/// Parse a `{"type": "..."}` contract-type answer
pub fn parse_contract_type(response: &str) -> Result<Option<String>, LlmError> {
    let obj = parse_object(response)?;
    Ok(string_field(&obj, "type").map(|t| t.to_lowercase()))
}

/// Parse a rewrite suggestion
pub fn parse_suggestion(response: &str) -> Result<Suggestion, LlmError> {
    let obj = parse_object(response)?;

    let suggestion = string_field(&obj, "suggestion")
        .ok_or_else(|| LlmError::InvalidResponse("Missing 'suggestion'".to_string()))?;
    let risk_delta = integer_field(&obj, "risk_delta")?.unwrap_or(0);

    Ok(Suggestion {
        suggestion,
        rationale: string_field(&obj, "rationale").unwrap_or_default(),
        risk_delta: risk_delta.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
    })
}

/// Normalize a free-text label answer to a single lowercase token
///
/// ```
/// use guardian_llm::parser::normalize_label;
///
/// assert_eq!(normalize_label(" Termination.\n"), "termination");
/// assert_eq!(normalize_label("**penalty** clause"), "penalty");
/// ```
pub fn normalize_label(answer: &str) -> String {
    answer
        .split_whitespace()
        .map(|token| {
            token
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .find(|token| !token.is_empty())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_annotation() {
        let response = r#"{
            "summary": "근로계약 해지 조건",
            "category": "termination",
            "risk_score": 72,
            "risk_level": "medium",
            "risk_reason": "일방적 해지 가능",
            "reasoning": "사전 통지 기간 없음"
        }"#;

        let annotation = parse_clause_annotation(response).unwrap();
        assert_eq!(annotation.summary.as_deref(), Some("근로계약 해지 조건"));
        assert_eq!(annotation.category.as_deref(), Some("termination"));
        assert_eq!(annotation.risk_score, Some(72));
        assert_eq!(annotation.risk_level.as_deref(), Some("medium"));
        assert_eq!(annotation.reasoning.as_deref(), Some("사전 통지 기간 없음"));
    }

    #[test]
    fn test_parse_markdown_wrapped() {
        let response = "```json\n{\"summary\": \"s\", \"risk_score\": null}\n```";
        let annotation = parse_clause_annotation(response).unwrap();
        assert_eq!(annotation.summary.as_deref(), Some("s"));
        assert_eq!(annotation.risk_score, None);
    }

    #[test]
    fn test_parse_score_variants() {
        let float = parse_clause_annotation(r#"{"risk_score": 64.6}"#).unwrap();
        assert_eq!(float.risk_score, Some(65));

        let text = parse_clause_annotation(r#"{"risk_score": " 80 "}"#).unwrap();
        assert_eq!(text.risk_score, Some(80));

        let bad = parse_clause_annotation(r#"{"risk_score": "very high"}"#);
        assert!(matches!(bad, Err(LlmError::InvalidResponse(_))));
    }

    #[test]
    fn test_parse_reasoning_list() {
        let annotation = parse_clause_annotation(r#"{"reasoning": ["a", "b"]}"#).unwrap();
        assert_eq!(annotation.reasoning.as_deref(), Some("a\nb"));
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(parse_clause_annotation("This clause is risky.").is_err());
        assert!(parse_clause_annotation("{not json}").is_err());
    }

    #[test]
    fn test_parse_contract_type() {
        let parsed = parse_contract_type(r#"{"type": "Lease", "reason": "보증금"}"#).unwrap();
        assert_eq!(parsed.as_deref(), Some("lease"));

        let missing = parse_contract_type(r#"{"reason": "unclear"}"#).unwrap();
        assert_eq!(missing, None);
    }

    #[test]
    fn test_parse_suggestion() {
        let parsed = parse_suggestion(
            r#"{"suggestion": "30일 전 통지 후 해지", "rationale": "통지 기간 보장", "risk_delta": "-15"}"#,
        )
        .unwrap();
        assert_eq!(parsed.suggestion, "30일 전 통지 후 해지");
        assert_eq!(parsed.risk_delta, -15);

        assert!(parse_suggestion(r#"{"rationale": "x"}"#).is_err());
    }

    #[test]
    fn test_normalize_label_empty() {
        assert_eq!(normalize_label("  "), "");
        assert_eq!(normalize_label("General"), "general");
    }
}
