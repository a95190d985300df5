//! Contract Guardian Storage Layer
//!
//! Implements the `DocumentRepository`, `TextExtractor` and `StatusSink`
//! traits from `guardian-domain`.
//!
//! # Architecture
//!
//! - [`UploadDir`] writes uploaded files to `<storage>/<id>_<filename>`
//! - [`InMemoryRepository`] keeps documents and results in process memory
//! - [`SqliteRepository`] persists them in SQLite (results as JSON)
//! - [`PlainTextExtractor`] reads stored files as UTF-8 text
//! - [`StatusBoard`] keeps the latest pipeline status per document
//!
//! # Examples
//!
//! ```no_run
//! use guardian_store::{Repository, UploadDir};
//! use guardian_domain::{Document, DocumentId};
//!
//! # async fn example() -> Result<(), guardian_store::StoreError> {
//! let uploads = UploadDir::new("data/documents")?;
//! let repository = Repository::memory();
//!
//! let id = DocumentId::new();
//! let path = uploads.save(id, "lease.txt", "제1조 (목적)".as_bytes()).await?;
//! repository.insert_document(Document::new(id, "lease.txt", None).with_stored_path(path))?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod extractor;
mod memory;
mod repository;
mod sqlite;
mod status;
mod uploads;

pub use error::StoreError;
pub use extractor::{ExtractionError, PlainTextExtractor, DEFAULT_LANGUAGE};
pub use memory::InMemoryRepository;
pub use repository::Repository;
pub use sqlite::SqliteRepository;
pub use status::StatusBoard;
pub use uploads::{sanitize_filename, UploadDir};
