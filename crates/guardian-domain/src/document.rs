//! Uploaded contract documents

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Unique identifier for a document based on UUIDv7
///
/// UUIDv7 keeps uploads chronologically sortable without any coordination
/// between server instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(u128);

impl DocumentId {
    /// Generate a new UUIDv7-based DocumentId
    ///
    /// # Examples
    ///
    /// ```
    /// use guardian_domain::DocumentId;
    ///
    /// let id = DocumentId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a DocumentId from a raw u128 value
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse a DocumentId from its UUID string form
    ///
    /// # Examples
    ///
    /// ```
    /// use guardian_domain::DocumentId;
    ///
    /// let id = DocumentId::new();
    /// let parsed = DocumentId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid document id: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

impl TryFrom<String> for DocumentId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_string(&value)
    }
}

impl From<DocumentId> for String {
    fn from(id: DocumentId) -> Self {
        id.to_string()
    }
}

/// An uploaded contract document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier
    pub id: DocumentId,

    /// Original file name as uploaded
    pub filename: String,

    /// Declared MIME type, if the uploader sent one
    pub content_type: Option<String>,

    /// Where the uploaded bytes were written
    pub stored_path: Option<PathBuf>,

    /// Extracted plain text, cached after the first analysis
    pub text: Option<String>,
}

impl Document {
    /// Create a document record that has no stored file yet
    pub fn new(id: DocumentId, filename: impl Into<String>, content_type: Option<String>) -> Self {
        Self {
            id,
            filename: filename.into(),
            content_type,
            stored_path: None,
            text: None,
        }
    }

    /// Attach the on-disk location of the uploaded bytes
    pub fn with_stored_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.stored_path = Some(path.into());
        self
    }
}
