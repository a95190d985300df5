//! Text extraction from stored uploads

use async_trait::async_trait;
use guardian_domain::traits::TextExtractor;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Default OCR language hint
pub const DEFAULT_LANGUAGE: &str = "kor+eng";

/// Errors from text extraction
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The stored file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File that failed
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The file holds no text layer this extractor can read
    #[error("Unsupported document ({0}); OCR is not available")]
    Unsupported(String),
}

/// Extractor for text-based uploads
///
/// Reads the stored file as UTF-8. Binary uploads (scans, PDFs without a
/// text layer) are rejected with [`ExtractionError::Unsupported`].
#[derive(Debug, Clone)]
pub struct PlainTextExtractor {
    language: String,
}

impl Default for PlainTextExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGE)
    }
}

impl PlainTextExtractor {
    /// Create an extractor with a language hint such as "kor+eng"
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }

    /// Individual languages of the hint
    pub fn languages(&self) -> Vec<&str> {
        self.language
            .split('+')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect()
    }
}

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    type Error = ExtractionError;

    async fn extract_text(
        &self,
        path: &Path,
        content_type: Option<&str>,
    ) -> Result<String, Self::Error> {
        let bytes = tokio::fs::read(path).await.map_err(|source| ExtractionError::Io {
            path: path.display().to_string(),
            source,
        })?;

        match String::from_utf8(bytes) {
            Ok(text) => {
                let text = text.strip_prefix('\u{feff}').unwrap_or(&text).to_string();
                debug!("Extracted {} chars from {}", text.chars().count(), path.display());
                Ok(text)
            }
            Err(_) => Err(ExtractionError::Unsupported(format!(
                "{}, languages {}",
                content_type.unwrap_or("binary"),
                self.languages().join(", ")
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_reads_utf8_text() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("contract.txt");
        std::fs::write(&path, "\u{feff}제1조 (목적)\n제2조 (해지)").unwrap();

        let text = PlainTextExtractor::default()
            .extract_text(&path, Some("text/plain"))
            .await
            .unwrap();
        assert_eq!(text, "제1조 (목적)\n제2조 (해지)");
    }

    #[tokio::test]
    async fn test_binary_is_unsupported() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("scan.png");
        std::fs::write(&path, [0x89, 0x50, 0x4e, 0x47, 0xff, 0xfe]).unwrap();

        let err = PlainTextExtractor::default()
            .extract_text(&path, Some("image/png"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::Unsupported(_)));
        assert!(err.to_string().contains("image/png"));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = PlainTextExtractor::default()
            .extract_text(Path::new("/nonexistent/contract.txt"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::Io { .. }));
    }

    #[test]
    fn test_language_hint() {
        assert_eq!(PlainTextExtractor::default().languages(), vec!["kor", "eng"]);
        assert_eq!(PlainTextExtractor::new(" kor + ").languages(), vec!["kor"]);
    }
}
