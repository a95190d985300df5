//! Heuristic clause segmentation

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use guardian_domain::Clause;
use regex::Regex;

/// Splits contract text into clauses
///
/// When the text contains article headings, every clause starts at a heading
/// and runs up to the next one; text before the first heading is dropped.
/// Without headings, blank lines separate clauses.
#[derive(Debug, Clone)]
pub struct ClauseSegmenter {
    heading: Regex,
    paragraph_break: Regex,
    whitespace_run: Regex,
}

impl ClauseSegmenter {
    /// Create a segmenter for the given heading regex
    pub fn new(heading_pattern: &str) -> Result<Self, AnalysisError> {
        Ok(Self {
            heading: Regex::new(heading_pattern)?,
            paragraph_break: Regex::new(r"\n\s*\n")?,
            whitespace_run: Regex::new(r"\s{2,}")?,
        })
    }

    /// Create a segmenter from the analysis configuration
    pub fn from_config(config: &AnalysisConfig) -> Result<Self, AnalysisError> {
        Self::new(&config.heading_pattern)
    }

    /// Split text into normalized clause strings, in document order
    pub fn segment(&self, text: &str) -> Vec<String> {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

        let starts: Vec<usize> = self.heading.find_iter(&normalized).map(|m| m.start()).collect();

        let candidates: Vec<&str> = if starts.is_empty() {
            self.paragraph_break.split(&normalized).collect()
        } else {
            starts
                .iter()
                .enumerate()
                .map(|(i, &start)| {
                    let end = starts.get(i + 1).copied().unwrap_or(normalized.len());
                    &normalized[start..end]
                })
                .collect()
        };

        candidates
            .into_iter()
            .map(|candidate| self.whitespace_run.replace_all(candidate, " ").trim().to_string())
            .filter(|clause| !clause.is_empty())
            .collect()
    }

    /// Segment text and wrap each piece in a [`Clause`] with a 1-based id
    pub fn build_clauses(&self, text: &str) -> Vec<Clause> {
        self.segment(text)
            .into_iter()
            .enumerate()
            .map(|(i, raw)| Clause::new(i + 1, raw))
            .collect()
    }
}
