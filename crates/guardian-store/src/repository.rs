//! Repository backend selected at startup

use crate::error::StoreError;
use crate::memory::InMemoryRepository;
use crate::sqlite::SqliteRepository;
use guardian_domain::traits::DocumentRepository;
use guardian_domain::{AnalysisResult, Document, DocumentId};
use std::path::Path;
use tracing::info;

/// Either an in-memory or a SQLite repository
pub enum Repository {
    /// Lost on restart
    Memory(InMemoryRepository),
    /// Persistent
    Sqlite(SqliteRepository),
}

impl Repository {
    /// Empty in-memory repository
    pub fn memory() -> Self {
        Repository::Memory(InMemoryRepository::new())
    }

    /// SQLite repository at `path`
    pub fn sqlite<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        info!("Opening SQLite repository at {}", path.as_ref().display());
        Ok(Repository::Sqlite(SqliteRepository::new(path)?))
    }

    /// SQLite when a database path is given, memory otherwise
    pub fn open(database: Option<&Path>) -> Result<Self, StoreError> {
        match database {
            Some(path) => Self::sqlite(path),
            None => Ok(Self::memory()),
        }
    }

    /// Register a document, replacing any with the same id
    pub fn insert_document(&self, document: Document) -> Result<(), StoreError> {
        match self {
            Repository::Memory(repo) => repo.insert_document(document),
            Repository::Sqlite(repo) => repo.insert_document(document),
        }
    }
}

impl DocumentRepository for Repository {
    type Error = StoreError;

    fn get_document(&self, id: DocumentId) -> Result<Option<Document>, Self::Error> {
        match self {
            Repository::Memory(repo) => repo.get_document(id),
            Repository::Sqlite(repo) => repo.get_document(id),
        }
    }

    fn save_document_text(&self, id: DocumentId, text: &str) -> Result<(), Self::Error> {
        match self {
            Repository::Memory(repo) => repo.save_document_text(id, text),
            Repository::Sqlite(repo) => repo.save_document_text(id, text),
        }
    }

    fn save_analysis_result(&self, result: &AnalysisResult) -> Result<(), Self::Error> {
        match self {
            Repository::Memory(repo) => repo.save_analysis_result(result),
            Repository::Sqlite(repo) => repo.save_analysis_result(result),
        }
    }

    fn get_analysis_result(&self, id: DocumentId) -> Result<Option<AnalysisResult>, Self::Error> {
        match self {
            Repository::Memory(repo) => repo.get_analysis_result(id),
            Repository::Sqlite(repo) => repo.get_analysis_result(id),
        }
    }
}
