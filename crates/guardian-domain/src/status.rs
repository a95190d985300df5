//! Progress reporting for a running analysis

use crate::document::DocumentId;
use serde::{Deserialize, Serialize};

/// Fixed stages reported while a document is analysed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusStage {
    /// Text extraction from the stored file
    Extract,

    /// Clause segmentation
    Split,

    /// Backend annotation
    Llm,

    /// Policy scoring
    Risk,

    /// Analysis finished
    Done,

    /// Analysis aborted by a fatal error
    Failed,
}

impl StatusStage {
    /// Get the stage name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusStage::Extract => "extract",
            StatusStage::Split => "split",
            StatusStage::Llm => "llm",
            StatusStage::Risk => "risk",
            StatusStage::Done => "done",
            StatusStage::Failed => "failed",
        }
    }

    /// Progress percentage reported on entering this stage
    pub fn progress(&self) -> u8 {
        match self {
            StatusStage::Extract => 10,
            StatusStage::Split => 30,
            StatusStage::Llm => 50,
            StatusStage::Risk => 80,
            StatusStage::Done => 100,
            StatusStage::Failed => 100,
        }
    }
}

/// Latest known progress of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStatus {
    /// Document being analysed
    pub document_id: DocumentId,

    /// Current stage
    pub stage: StatusStage,

    /// Progress percentage (0-100)
    pub progress: u8,

    /// Human-readable detail
    pub message: String,
}

impl DocumentStatus {
    /// Status at a stage, with the stage's fixed progress
    pub fn new(document_id: DocumentId, stage: StatusStage, message: impl Into<String>) -> Self {
        Self {
            document_id,
            stage,
            progress: stage.progress(),
            message: message.into(),
        }
    }

    /// Whether the analysis has stopped, successfully or not
    pub fn is_finished(&self) -> bool {
        matches!(self.stage, StatusStage::Done | StatusStage::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_is_monotonic() {
        let stages = [
            StatusStage::Extract,
            StatusStage::Split,
            StatusStage::Llm,
            StatusStage::Risk,
            StatusStage::Done,
        ];
        for pair in stages.windows(2) {
            assert!(pair[0].progress() < pair[1].progress());
        }
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(StatusStage::Llm.as_str(), "llm");
        assert_eq!(serde_json::to_string(&StatusStage::Done).unwrap(), "\"done\"");
    }
}
