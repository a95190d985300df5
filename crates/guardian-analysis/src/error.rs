//! Error types for the analysis pipeline

use guardian_domain::DocumentId;
use thiserror::Error;

/// Fatal errors that stop the analysis of a document
///
/// Backend failures never show up here; they are absorbed per clause.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// No document with this id
    #[error("Document not found: {0}")]
    DocumentNotFound(DocumentId),

    /// The document has no stored file to read
    #[error("Document file missing on disk: {0}")]
    MissingFile(DocumentId),

    /// The document has not been analysed yet
    #[error("No analysis result for document: {0}")]
    ResultNotFound(DocumentId),

    /// No clause with this id in the latest result
    #[error("Clause not found: {0}")]
    ClauseNotFound(String),

    /// Text extraction failed
    #[error("Text extraction failed: {0}")]
    Extraction(String),

    /// Repository error
    #[error("Repository error: {0}")]
    Repository(String),

    /// Clauses and hints could not be paired by position
    #[error("Clause/hint count mismatch: {clauses} clauses, {hints} hints")]
    HintMismatch {
        /// Number of clauses
        clauses: usize,
        /// Number of hints
        hints: usize,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<regex::Error> for AnalysisError {
    fn from(e: regex::Error) -> Self {
        AnalysisError::Config(format!("Invalid heading pattern: {}", e))
    }
}
