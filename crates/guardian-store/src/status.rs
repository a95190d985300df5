use guardian_domain::traits::StatusSink;
use guardian_domain::{DocumentId, DocumentStatus};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

/// Latest pipeline status per document
#[derive(Debug, Default)]
pub struct StatusBoard {
    statuses: RwLock<HashMap<DocumentId, DocumentStatus>>,
}

impl StatusBoard {
    /// Create an empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest status of a document
    pub fn get(&self, id: DocumentId) -> Option<DocumentStatus> {
        self.statuses.read().ok()?.get(&id).cloned()
    }
}

impl StatusSink for StatusBoard {
    fn report(&self, status: DocumentStatus) {
        debug!(
            "{}: {} ({}%)",
            status.document_id,
            status.stage.as_str(),
            status.progress
        );
        if let Ok(mut statuses) = self.statuses.write() {
            statuses.insert(status.document_id, status);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guardian_domain::StatusStage;

    #[test]
    fn test_latest_status_wins() {
        let board = StatusBoard::new();
        let id = DocumentId::new();
        assert!(board.get(id).is_none());

        board.report(DocumentStatus::new(id, StatusStage::Extract, "Extracting text"));
        board.report(DocumentStatus::new(id, StatusStage::Done, "Analysis complete"));

        let status = board.get(id).unwrap();
        assert_eq!(status.stage, StatusStage::Done);
        assert!(status.is_finished());
    }
}
