//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the analysis core and its
//! collaborators. Implementations live in other crates.

use crate::{AnalysisResult, Document, DocumentId, DocumentStatus};
use async_trait::async_trait;
use std::path::Path;

/// Trait for storing documents and analysis results
///
/// Implemented by the infrastructure layer (guardian-store). Methods take
/// `&self` because one repository is shared by concurrent requests.
pub trait DocumentRepository: Send + Sync {
    /// Error type for repository operations
    type Error: std::fmt::Display;

    /// Get a document by ID
    fn get_document(&self, id: DocumentId) -> Result<Option<Document>, Self::Error>;

    /// Cache the extracted text of a document
    fn save_document_text(&self, id: DocumentId, text: &str) -> Result<(), Self::Error>;

    /// Store the latest analysis result, replacing any earlier one
    fn save_analysis_result(&self, result: &AnalysisResult) -> Result<(), Self::Error>;

    /// Get the latest analysis result of a document
    fn get_analysis_result(&self, id: DocumentId) -> Result<Option<AnalysisResult>, Self::Error>;
}

/// Trait for turning a stored file into plain text
///
/// How the text is produced (OCR, PDF text layer, plain read) is up to the
/// implementation.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Error type for extraction
    type Error: std::fmt::Display + Send;

    /// Extract the plain text of a stored file
    async fn extract_text(
        &self,
        path: &Path,
        content_type: Option<&str>,
    ) -> Result<String, Self::Error>;
}

/// Trait for receiving progress updates
pub trait StatusSink: Send + Sync {
    /// Record the current stage of a document
    fn report(&self, status: DocumentStatus);
}

/// Status sink that discards every update
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStatusSink;

impl StatusSink for NullStatusSink {
    fn report(&self, _status: DocumentStatus) {}
}
