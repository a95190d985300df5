//! Output formatting for the CLI.

use crate::error::Result;
use colored::*;
use guardian_analysis::report::{self, badge};
use guardian_domain::{AnalysisResult, Clause, RiskLevel};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Longest summary or clause excerpt shown in a table cell, in characters
const CELL_CHARS: usize = 60;

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// Markdown report
    Markdown,
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// The selected format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format an analysis result.
    pub fn format_result(&self, result: &AnalysisResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
            OutputFormat::Markdown => Ok(report::render_markdown(result)),
            OutputFormat::Table => Ok(self.format_result_table(result)),
        }
    }

    /// Format a result as a header line plus a clause table.
    fn format_result_table(&self, result: &AnalysisResult) -> String {
        let mut header = format!("Contract type: {}", result.contract_type);
        if let Some(auto) = &result.auto_contract_type {
            header.push_str(&format!(" (inferred: {})", auto));
        }
        header.push_str(&format!(
            "\nOverall risk: {} {}",
            result.overall_risk_score.round(),
            self.level(result.overall_risk_level)
        ));

        if result.clauses.is_empty() {
            return format!("{}\n{}", header, self.warning("No clauses found."));
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "Risk", "Score", "Category", "Summary"]);

        for (idx, clause) in result.clauses.iter().enumerate() {
            let level = clause.risk.as_ref().map(|r| r.level).unwrap_or(RiskLevel::Low);
            builder.push_record([
                (idx + 1).to_string(),
                self.level(level),
                clause.score().to_string(),
                clause.category_or_default().to_string(),
                truncate(clause.summary.as_deref().unwrap_or(""), CELL_CHARS),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        format!("{}\n{}", header, table)
    }

    /// Format segmented clauses.
    pub fn format_clauses(&self, clauses: &[Clause]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(clauses)?),
            OutputFormat::Markdown => Ok(clauses
                .iter()
                .map(|c| format!("- **{}**: {}", c.id, c.raw_text.replace('\n', " ")))
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if clauses.is_empty() {
                    return Ok(self.colorize("No clauses found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["ID", "Text"]);
                for clause in clauses {
                    builder.push_record([clause.id.clone(), truncate(&clause.raw_text, CELL_CHARS)]);
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
        }
    }

    /// Risk badge colored by level.
    pub fn level(&self, level: RiskLevel) -> String {
        let text = format!("{} {}", badge(level), level.as_str());
        match level {
            RiskLevel::High => self.colorize(&text, "red"),
            RiskLevel::Medium => self.colorize(&text, "yellow"),
            RiskLevel::Low => self.colorize(&text, "green"),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Cut text to `max` characters on a char boundary, single line.
fn truncate(text: &str, max: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= max {
        flat
    } else {
        let head: String = flat.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}
