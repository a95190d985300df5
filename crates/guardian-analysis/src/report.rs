//! Markdown and HTML rendering of analysis results

use guardian_domain::{AnalysisResult, Clause, RiskLevel};
use std::fmt::Write;

/// Output format of a rendered report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Markdown table
    #[default]
    Markdown,
    /// Standalone HTML page
    Html,
}

impl ReportFormat {
    /// Parse a format name ("md", "markdown", "html")
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "md" | "markdown" => Some(ReportFormat::Markdown),
            "html" | "htm" => Some(ReportFormat::Html),
            _ => None,
        }
    }

    /// MIME type of the rendered report
    pub fn content_type(&self) -> &'static str {
        match self {
            ReportFormat::Markdown => "text/markdown; charset=utf-8",
            ReportFormat::Html => "text/html; charset=utf-8",
        }
    }

    /// File extension for downloads
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Markdown => "md",
            ReportFormat::Html => "html",
        }
    }

    /// Render a result in this format
    pub fn render(&self, result: &AnalysisResult) -> String {
        match self {
            ReportFormat::Markdown => render_markdown(result),
            ReportFormat::Html => render_html(result),
        }
    }
}

/// Korean badge shown for a risk level
pub fn badge(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::High => "위험",
        RiskLevel::Medium => "주의",
        RiskLevel::Low => "낮음",
    }
}

fn created_at(result: &AnalysisResult) -> String {
    chrono::DateTime::from_timestamp(result.created_at as i64, 0)
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S").to_string())
        .unwrap_or_else(|| result.created_at.to_string())
}

/// One table row: badge, category, summary, score, explanation
struct Row<'a> {
    badge: &'static str,
    category: &'a str,
    summary: &'a str,
    score: u8,
    explanation: &'a str,
}

impl<'a> Row<'a> {
    fn of(clause: &'a Clause) -> Self {
        let risk = clause.risk.as_ref();
        Self {
            badge: badge(risk.map(|r| r.level).unwrap_or(RiskLevel::Low)),
            category: clause.category_or_default(),
            summary: clause.summary.as_deref().unwrap_or(""),
            score: clause.score(),
            explanation: risk.map(|r| r.explanation.as_str()).unwrap_or(""),
        }
    }
}

/// Markdown cells cannot hold newlines or bare pipes
fn md_cell(text: &str) -> String {
    text.replace('\n', " ").replace('|', "\\|")
}

/// Render a Markdown report
pub fn render_markdown(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Contract Guardian Report");
    let _ = writeln!(out);
    let _ = writeln!(out, "- 문서 ID: `{}`", result.document_id);
    let _ = writeln!(out, "- 계약 유형: `{}`", result.contract_type);
    if let Some(auto) = &result.auto_contract_type {
        let _ = writeln!(out, "- 추정 계약 유형: `{}`", auto);
    }
    let _ = writeln!(out, "- 생성 시각: {} UTC", created_at(result));
    let _ = writeln!(
        out,
        "- 전체 위험 점수: **{}** ({})",
        result.overall_risk_score.round(),
        badge(result.overall_risk_level)
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "## 조항별 요약");
    let _ = writeln!(out, "| 순번 | 위험 | 카테고리 | 요약 | 점수 | 설명 |");
    let _ = writeln!(out, "| --- | --- | --- | --- | --- | --- |");
    for (idx, clause) in result.clauses.iter().enumerate() {
        let row = Row::of(clause);
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} |",
            idx + 1,
            row.badge,
            md_cell(row.category),
            md_cell(row.summary),
            row.score,
            md_cell(row.explanation)
        );
    }
    out
}

/// Escape text for HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const HTML_STYLE: &str = "\
      body { font-family: 'Noto Sans KR', 'Inter', sans-serif; padding: 24px; color: #0f172a; }
      h1, h2 { margin-bottom: 8px; }
      table { width: 100%; border-collapse: collapse; margin-top: 12px; }
      th, td { border: 1px solid #e2e8f0; padding: 8px; font-size: 13px; }
      th { background: #f8fafc; text-align: left; }
      .meta { margin: 0 0 4px 0; color: #475569; }
      .score { font-weight: 700; }
      .high { color: #b91c1c; }
      .medium { color: #b45309; }
      .low { color: #15803d; }";

/// Render a standalone HTML report
pub fn render_html(result: &AnalysisResult) -> String {
    let mut rows = String::new();
    for (idx, clause) in result.clauses.iter().enumerate() {
        let row = Row::of(clause);
        let level = clause.risk.as_ref().map(|r| r.level).unwrap_or(RiskLevel::Low);
        let _ = writeln!(
            rows,
            "        <tr><td>{}</td><td class=\"{}\">{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            idx + 1,
            level.as_str(),
            row.badge,
            escape_html(row.category),
            escape_html(row.summary),
            row.score,
            escape_html(row.explanation)
        );
    }

    let auto = result
        .auto_contract_type
        .as_deref()
        .map(|t| format!("\n    <p class=\"meta\">추정 계약 유형: <code>{}</code></p>", escape_html(t)))
        .unwrap_or_default();

    format!(
        r#"<!doctype html>
<html lang="ko">
  <head>
    <meta charset="UTF-8" />
    <title>Contract Guardian Report</title>
    <style>
{style}
    </style>
  </head>
  <body>
    <h1>Contract Guardian Report</h1>
    <p class="meta">문서 ID: <code>{id}</code></p>
    <p class="meta">계약 유형: <code>{contract_type}</code></p>{auto}
    <p class="meta">생성 시각: {created} UTC</p>
    <p class="meta score {level}">전체 위험 점수: {score} ({badge})</p>
    <h2>조항별 요약</h2>
    <table>
      <thead>
        <tr><th>순번</th><th>위험</th><th>카테고리</th><th>요약</th><th>점수</th><th>설명</th></tr>
      </thead>
      <tbody>
{rows}      </tbody>
    </table>
  </body>
</html>
"#,
        style = HTML_STYLE,
        id = result.document_id,
        contract_type = result.contract_type,
        auto = auto,
        created = created_at(result),
        level = result.overall_risk_level.as_str(),
        score = result.overall_risk_score.round(),
        badge = badge(result.overall_risk_level),
        rows = rows,
    )
}
