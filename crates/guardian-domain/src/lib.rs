//! Contract Guardian Domain Layer
//!
//! Core data model and collaborator traits for contract risk analysis.
//! Everything else in the workspace depends on this crate; it carries no
//! infrastructure code.
//!
//! ## Key Concepts
//!
//! - **Clause**: one structurally-delimited unit of contract text
//! - **Annotation**: backend-supplied summary, category and risk hint for a clause
//! - **ClauseRisk**: the normalized score/level/explanation triple
//! - **Contract type**: coarse document classification driving policy selection
//! - **AnalysisResult**: the immutable outcome of one analysis run
//!
//! ## Architecture
//!
//! - Pure data and scoring primitives only
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod annotation;
pub mod clause;
pub mod contract_type;
pub mod document;
pub mod risk;
pub mod status;
pub mod traits;

// Re-exports for convenience
pub use analysis::AnalysisResult;
pub use annotation::{AnnotationHint, ClauseAnnotation, ClauseImprovement};
pub use clause::{Clause, ClauseRisk, GENERIC_EXPLANATION};
pub use contract_type::ContractType;
pub use document::{Document, DocumentId};
pub use risk::{clamp_score, RiskLevel};
pub use status::{DocumentStatus, StatusStage};
