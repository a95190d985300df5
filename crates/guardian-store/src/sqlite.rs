//! SQLite-backed repository

use crate::error::StoreError;
use guardian_domain::traits::DocumentRepository;
use guardian_domain::{AnalysisResult, Document, DocumentId};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// SQLite-based implementation of DocumentRepository
///
/// Documents are stored row by row; analysis results are stored as a JSON
/// body next to a few indexed columns.
///
/// # Thread Safety
///
/// The connection sits behind a mutex, so one repository can be shared by
/// concurrent request handlers.
pub struct SqliteRepository {
    conn: Mutex<Connection>,
}

impl SqliteRepository {
    /// Open (or create) a repository at the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use guardian_store::SqliteRepository;
    ///
    /// let repository = SqliteRepository::new("guardian.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Register a document, replacing any with the same id
    pub fn insert_document(&self, document: Document) -> Result<(), StoreError> {
        let stored_path = document
            .stored_path
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned());

        self.conn()?.execute(
            "INSERT INTO documents (id, filename, content_type, stored_path, text)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
             filename = excluded.filename, content_type = excluded.content_type,
             stored_path = excluded.stored_path, text = excluded.text",
            params![
                id_to_bytes(document.id),
                &document.filename,
                &document.content_type,
                stored_path,
                &document.text,
            ],
        )?;
        debug!("Stored document {}", document.id);
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

fn id_to_bytes(id: DocumentId) -> Vec<u8> {
    id.value().to_be_bytes().to_vec()
}

fn bytes_to_id(bytes: &[u8]) -> Result<DocumentId, StoreError> {
    let arr: [u8; 16] = bytes.try_into().map_err(|_| {
        StoreError::InvalidData(format!(
            "Expected 16 bytes for DocumentId, got {}",
            bytes.len()
        ))
    })?;
    Ok(DocumentId::from_value(u128::from_be_bytes(arr)))
}

impl DocumentRepository for SqliteRepository {
    type Error = StoreError;

    fn get_document(&self, id: DocumentId) -> Result<Option<Document>, Self::Error> {
        let row = self
            .conn()?
            .query_row(
                "SELECT id, filename, content_type, stored_path, text FROM documents WHERE id = ?1",
                params![id_to_bytes(id)],
                |row| {
                    Ok((
                        row.get::<_, Vec<u8>>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, Option<String>>(3)?,
                        row.get::<_, Option<String>>(4)?,
                    ))
                },
            )
            .optional()?;

        row.map(|(id_bytes, filename, content_type, stored_path, text)| -> Result<Document, StoreError> {
            Ok(Document {
                id: bytes_to_id(&id_bytes)?,
                filename,
                content_type,
                stored_path: stored_path.map(PathBuf::from),
                text,
            })
        })
        .transpose()
    }

    fn save_document_text(&self, id: DocumentId, text: &str) -> Result<(), Self::Error> {
        self.conn()?.execute(
            "UPDATE documents SET text = ?2 WHERE id = ?1",
            params![id_to_bytes(id), text],
        )?;
        Ok(())
    }

    fn save_analysis_result(&self, result: &AnalysisResult) -> Result<(), Self::Error> {
        let body = serde_json::to_string(result)?;
        self.conn()?.execute(
            "INSERT INTO analysis_results (document_id, contract_type, overall_risk_score, body, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(document_id) DO UPDATE SET
             contract_type = excluded.contract_type,
             overall_risk_score = excluded.overall_risk_score,
             body = excluded.body, created_at = excluded.created_at",
            params![
                id_to_bytes(result.document_id),
                result.contract_type.as_str(),
                result.overall_risk_score,
                body,
                result.created_at as i64,
            ],
        )?;
        Ok(())
    }

    fn get_analysis_result(&self, id: DocumentId) -> Result<Option<AnalysisResult>, Self::Error> {
        let body: Option<String> = self
            .conn()?
            .query_row(
                "SELECT body FROM analysis_results WHERE document_id = ?1",
                params![id_to_bytes(id)],
                |row| row.get(0),
            )
            .optional()?;

        Ok(body.map(|b| serde_json::from_str(&b)).transpose()?)
    }
}
