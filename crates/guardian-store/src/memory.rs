//! Process-local repository

use crate::error::StoreError;
use guardian_domain::traits::DocumentRepository;
use guardian_domain::{AnalysisResult, Document, DocumentId};
use std::collections::HashMap;
use std::sync::RwLock;

/// Repository that keeps documents and results in memory
///
/// Contents are lost on restart. Safe to share between request handlers.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    documents: RwLock<HashMap<DocumentId, Document>>,
    results: RwLock<HashMap<DocumentId, AnalysisResult>>,
}

impl InMemoryRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document, replacing any with the same id
    pub fn insert_document(&self, document: Document) -> Result<(), StoreError> {
        self.documents
            .write()
            .map_err(|_| StoreError::Poisoned)?
            .insert(document.id, document);
        Ok(())
    }

    /// Number of registered documents
    pub fn document_count(&self) -> usize {
        self.documents.read().map(|d| d.len()).unwrap_or(0)
    }
}

impl DocumentRepository for InMemoryRepository {
    type Error = StoreError;

    fn get_document(&self, id: DocumentId) -> Result<Option<Document>, Self::Error> {
        let documents = self.documents.read().map_err(|_| StoreError::Poisoned)?;
        Ok(documents.get(&id).cloned())
    }

    fn save_document_text(&self, id: DocumentId, text: &str) -> Result<(), Self::Error> {
        let mut documents = self.documents.write().map_err(|_| StoreError::Poisoned)?;
        if let Some(document) = documents.get_mut(&id) {
            document.text = Some(text.to_string());
        }
        Ok(())
    }

    fn save_analysis_result(&self, result: &AnalysisResult) -> Result<(), Self::Error> {
        self.results
            .write()
            .map_err(|_| StoreError::Poisoned)?
            .insert(result.document_id, result.clone());
        Ok(())
    }

    fn get_analysis_result(&self, id: DocumentId) -> Result<Option<AnalysisResult>, Self::Error> {
        let results = self.results.read().map_err(|_| StoreError::Poisoned)?;
        Ok(results.get(&id).cloned())
    }
}
