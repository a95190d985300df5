//! Contract Guardian Analysis
//!
//! Turns contract text into scored clauses.
//!
//! # Architecture
//!
//! ```text
//! Text → Segmenter → Orchestrator → Backend → Risk Engine → AnalysisResult
//! ```
//!
//! # Key Features
//!
//! - **Clause Segmentation**: article headings (`제 N 조`) or blank lines
//! - **Fail-soft Annotation**: a backend failure degrades one clause, never the document
//! - **Bounded Concurrency**: clauses are annotated in parallel, results stay in document order
//! - **Contract-type Policies**: general, employment and lease scoring strategies
//! - **Reports**: Markdown and HTML rendering of a result
//!
//! # Example Usage
//!
//! ```no_run
//! use guardian_analysis::{AnalysisConfig, AnnotationOrchestrator, ClauseSegmenter, RiskEngine};
//! use guardian_domain::{ContractType, DocumentId};
//! use guardian_llm::{Backend, DummyBackend};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AnalysisConfig::default();
//! let segmenter = ClauseSegmenter::from_config(&config)?;
//! let orchestrator = AnnotationOrchestrator::new(Backend::structured(DummyBackend::new()), &config);
//!
//! let clauses = segmenter.build_clauses("제1조 (목적) ...\n제2조 (해지) ...");
//! let (clauses, hints) = orchestrator.annotate(clauses).await;
//!
//! let result = RiskEngine::default().analyze(DocumentId::new(), clauses, &hints, ContractType::General)?;
//! println!("Overall risk: {:.1}", result.overall_risk_score);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod annotator;
mod config;
mod error;
mod pipeline;
mod policy;
mod segmenter;

pub mod report;

pub use annotator::{
    heuristic_contract_type, AnnotationOrchestrator, AnnotationOutcome, DEFAULT_CATEGORY,
    UNAVAILABLE_REASON, UNAVAILABLE_SUMMARY,
};
pub use config::{AnalysisConfig, DEFAULT_HEADING_PATTERN};
pub use error::AnalysisError;
pub use pipeline::{effective_contract_type, AnalysisPipeline};
pub use policy::{
    BasePolicy, EmploymentPolicy, LeasePolicy, PolicyRegistry, RiskEngine, RiskPolicy,
    NO_SIGNAL_SCORE,
};
pub use report::ReportFormat;
pub use segmenter::ClauseSegmenter;
