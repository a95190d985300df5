//! Upload directory for original contract files

use crate::error::StoreError;
use guardian_domain::DocumentId;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory holding uploaded files as `<id>_<sanitized filename>`
#[derive(Debug, Clone)]
pub struct UploadDir {
    root: PathBuf,
}

impl UploadDir {
    /// Open an upload directory, creating it if needed
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The directory path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Target path of an upload
    pub fn path_for(&self, id: DocumentId, filename: &str) -> PathBuf {
        self.root.join(format!("{}_{}", id, sanitize_filename(filename)))
    }

    /// Write an uploaded file and return where it landed
    pub async fn save(
        &self,
        id: DocumentId,
        filename: &str,
        bytes: &[u8],
    ) -> Result<PathBuf, StoreError> {
        let path = self.path_for(id, filename);
        tokio::fs::write(&path, bytes).await?;
        debug!("Stored {} bytes at {}", bytes.len(), path.display());
        Ok(path)
    }
}

/// Strip directory parts and unsafe characters from a client filename
///
/// ```
/// use guardian_store::sanitize_filename;
///
/// assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
/// assert_eq!(sanitize_filename("근로 계약서.pdf"), "근로_계약서.pdf");
/// assert_eq!(sanitize_filename(""), "upload");
/// ```
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("contract.txt"), "contract.txt");
        assert_eq!(sanitize_filename("C:\\Users\\kim\\lease.pdf"), "lease.pdf");
        assert_eq!(sanitize_filename("a b;c.txt"), "a_b_c.txt");
        assert_eq!(sanitize_filename(".hidden"), "hidden");
        assert_eq!(sanitize_filename("dir/"), "upload");
    }

    #[tokio::test]
    async fn test_save_writes_prefixed_file() {
        let temp = TempDir::new().unwrap();
        let uploads = UploadDir::new(temp.path().join("nested/documents")).unwrap();
        let id = DocumentId::from_value(7);

        let path = uploads.save(id, "../lease.txt", b"hello").await.unwrap();

        assert_eq!(path, uploads.root().join(format!("{}_lease.txt", id)));
        assert_eq!(std::fs::read(&path).unwrap(), b"hello");
    }
}
