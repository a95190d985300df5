//! Prompt construction for chat-model backends

use guardian_domain::Clause;

/// Category labels a backend may assign to a clause
pub const CATEGORY_LABELS: &[&str] = &[
    "payment",
    "termination",
    "responsibility",
    "penalty",
    "confidentiality",
    "general",
];

/// Characters of joined clause text sent for contract-type inference
const MAX_INFERENCE_CHARS: usize = 6_000;

const SUMMARIZE_SYSTEM: &str = "You summarize Korean contract clauses concisely.";

const CLASSIFY_SYSTEM: &str = "You classify contract clauses into one label.";

const RISK_SYSTEM: &str =
    "You point out potential risks in contract clauses in Korean, concisely.";

const ANALYZE_SYSTEM: &str = "You are a Korean contract analysis agent. \
Use only the given clause text; do NOT invent amounts, dates, or names. \
If a field is missing, set it to null. Return JSON with fields: \
summary, category(one of payment, termination, responsibility, penalty, confidentiality, general), \
risk_score(0-100 integer), risk_level(low|medium|high), risk_reason(short Korean explanation), \
reasoning(short bullet style). Output JSON only.";

const CONTRACT_TYPE_SYSTEM: &str = "다음 계약 조항이 어떤 계약 유형에 속하는지 하나로 분류하세요. \
employment(근로/용역), lease(임대차), general 중 하나. \
JSON {\"type\": \"...\", \"reason\": \"...\"} 만 반환.";

const IMPROVE_SYSTEM: &str = "다음 계약 조항을 더 공정하고 균형 있게 수정한 제안을 JSON으로 반환하세요. \
필드: suggestion(수정안), rationale(이유), risk_delta(정수, 위험 감소는 음수). JSON만 반환.";

/// A single chat request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// System instruction
    pub system: &'static str,

    /// User message
    pub user: String,

    /// Response token budget
    pub max_tokens: u32,
}

/// One-sentence summary request
pub fn summarize(clause_text: &str) -> Prompt {
    Prompt {
        system: SUMMARIZE_SYSTEM,
        user: format!(
            "한글 계약 조항을 한 문장으로 요약하세요. 법률 자문 표현은 피하고 핵심만 적어주세요.\n\n조항:\n{}\n\n요약:",
            clause_text
        ),
        max_tokens: 96,
    }
}

/// Single-label classification request
pub fn classify(clause_text: &str) -> Prompt {
    Prompt {
        system: CLASSIFY_SYSTEM,
        user: format!(
            "계약 조항을 카테고리 하나로 반환하세요. 가능한 라벨: {}.\n\n조항:\n{}\n\n라벨:",
            CATEGORY_LABELS.join(", "),
            clause_text
        ),
        max_tokens: 8,
    }
}

/// Free-text risk description request
pub fn analyze_risk(clause_text: &str) -> Prompt {
    Prompt {
        system: RISK_SYSTEM,
        user: format!(
            "계약 조항의 잠재적 위험을 간단히 설명하세요. \
             법률 자문이 아님을 전제로, 한국어로 짧게 위험 신호만 적어주세요.\n\n조항:\n{}\n\n위험 설명:",
            clause_text
        ),
        max_tokens: 128,
    }
}

/// Structured JSON annotation request
pub fn analyze_clause(clause_text: &str) -> Prompt {
    Prompt {
        system: ANALYZE_SYSTEM,
        user: clause_text.to_string(),
        max_tokens: 196,
    }
}

/// Document-level contract type request
///
/// Clause texts are joined with blank lines and cut to a bounded length so
/// long contracts do not blow the context window.
pub fn infer_contract_type(clauses: &[Clause]) -> Prompt {
    let joined = clauses
        .iter()
        .map(|c| c.raw_text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    let user: String = joined.chars().take(MAX_INFERENCE_CHARS).collect();

    Prompt {
        system: CONTRACT_TYPE_SYSTEM,
        user,
        max_tokens: 64,
    }
}

/// Fairer-rewrite request
pub fn suggest_improvement(clause_text: &str) -> Prompt {
    Prompt {
        system: IMPROVE_SYSTEM,
        user: clause_text.to_string(),
        max_tokens: 196,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_lists_every_label() {
        let prompt = classify("제1조");
        for label in CATEGORY_LABELS {
            assert!(prompt.user.contains(label));
        }
        assert!(prompt.user.contains("제1조"));
    }

    #[test]
    fn test_analyze_clause_asks_for_json() {
        let prompt = analyze_clause("제2조 (해지)");
        assert!(prompt.system.contains("Output JSON only"));
        assert_eq!(prompt.user, "제2조 (해지)");
    }

    #[test]
    fn test_infer_contract_type_joins_and_truncates() {
        let clauses = vec![
            Clause::new(1, "가".repeat(MAX_INFERENCE_CHARS)),
            Clause::new(2, "제2조"),
        ];
        let prompt = infer_contract_type(&clauses);
        assert_eq!(prompt.user.chars().count(), MAX_INFERENCE_CHARS);

        let short = infer_contract_type(&[Clause::new(1, "a"), Clause::new(2, "b")]);
        assert_eq!(short.user, "a\n\nb");
    }
}
