//! Deterministic keyword backend for development
//!
//! Produces stable annotations from keyword rules without any network call,
//! so the whole pipeline can run offline.

use crate::backend::{ClauseBackend, StructuredBackend};
use crate::LlmError;
use async_trait::async_trait;
use guardian_domain::{ClauseAnnotation, RiskLevel};

/// Keyword → category rules, checked in order
const KEYWORD_CATEGORIES: &[(&str, &str)] = &[
    ("해지", "termination"),
    ("penalty", "penalty"),
    ("손해배상", "penalty"),
    ("지급", "payment"),
    ("급여", "payment"),
    ("책임", "responsibility"),
    ("의무", "responsibility"),
];

const PENALTY_HITS: &[&str] = &["손해배상", "위약금", "penalty", "배상"];
const TERMINATION_HITS: &[&str] = &["해지", "termination", "해약", "수습", "연장"];
const OBLIGATION_HITS: &[&str] = &["의무", "책임", "must", "shall", "obligation", "responsibility"];
const PAYMENT_HITS: &[&str] = &["지급", "급여", "payment", "보수", "대가"];

/// Longest summary head, in characters
const SUMMARY_HEAD_CHARS: usize = 160;

/// Development backend that returns deterministic mock data
#[derive(Debug, Clone, Copy, Default)]
pub struct DummyBackend;

impl DummyBackend {
    /// Create a new dummy backend
    pub fn new() -> Self {
        Self
    }

    fn summary_for(text: &str) -> String {
        let first_line = text.trim().lines().next().unwrap_or("");
        let head: String = first_line.chars().take(SUMMARY_HEAD_CHARS).collect();
        if head.is_empty() {
            "요약: 내용 확인 필요".to_string()
        } else {
            format!("요약: {}", head)
        }
    }

    fn category_for(text: &str) -> &'static str {
        let lowered = text.to_lowercase();
        for (keyword, category) in KEYWORD_CATEGORIES {
            if lowered.contains(keyword) {
                return category;
            }
        }
        if lowered.contains("payment") {
            return "payment";
        }
        if lowered.contains("termination") {
            return "termination";
        }
        "general"
    }

    /// Risk label, score and reasons for a clause
    fn risk_for(text: &str) -> (&'static str, i64, Vec<&'static str>) {
        let lowered = text.to_lowercase();
        let hits = |words: &[&str]| words.iter().any(|w| lowered.contains(w));

        let mut label = "Low risk";
        let mut score = 25;
        let mut reasons = Vec::new();

        if hits(PENALTY_HITS) {
            label = "High risk";
            score = 90;
            reasons.push("벌칙/배상 조건이 포함되어 있습니다.");
        }
        if hits(TERMINATION_HITS) {
            if label == "Low risk" {
                label = "Medium risk";
            }
            score = score.max(70);
            reasons.push("해지/수습/연장 조건이 있으니 세부 조항을 검토하세요.");
        }
        if hits(OBLIGATION_HITS) {
            if label == "Low risk" {
                label = "Medium risk";
            }
            score = score.max(60);
            reasons.push("의무/책임 범위가 명시되어 있습니다.");
        }
        if hits(PAYMENT_HITS) {
            reasons.push("보수/지급 관련 조항입니다.");
        }
        if reasons.is_empty() {
            reasons.push("정보성 조항으로 보입니다.");
        }

        (label, score, reasons)
    }

    fn risk_text(text: &str) -> String {
        let (label, _, reasons) = Self::risk_for(text);
        format!("{}: {}", label, reasons.join(" "))
    }
}

#[async_trait]
impl ClauseBackend for DummyBackend {
    fn name(&self) -> &str {
        "dummy"
    }

    async fn summarize_clause(&self, text: &str) -> Result<String, LlmError> {
        Ok(Self::summary_for(text))
    }

    async fn classify_clause(&self, text: &str) -> Result<String, LlmError> {
        Ok(Self::category_for(text).to_string())
    }

    async fn analyze_risk(&self, text: &str) -> Result<String, LlmError> {
        Ok(Self::risk_text(text))
    }
}

#[async_trait]
impl StructuredBackend for DummyBackend {
    async fn analyze_clause(&self, text: &str) -> Result<ClauseAnnotation, LlmError> {
        let risk_text = Self::risk_text(text);
        let lowered = risk_text.to_lowercase();
        let score = if lowered.starts_with("high") {
            90
        } else if lowered.starts_with("medium") {
            65
        } else {
            25
        };

        Ok(ClauseAnnotation {
            summary: Some(Self::summary_for(text)),
            category: Some(Self::category_for(text).to_string()),
            risk_reason: Some(risk_text),
            risk_score: Some(score),
            risk_level: Some(RiskLevel::from_score(score).as_str().to_string()),
            reasoning: None,
        })
    }
}
