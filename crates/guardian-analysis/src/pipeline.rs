//! End-to-end analysis of a stored document

use crate::annotator::AnnotationOrchestrator;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::policy::{PolicyRegistry, RiskEngine};
use crate::segmenter::ClauseSegmenter;
use guardian_domain::traits::{DocumentRepository, StatusSink, TextExtractor};
use guardian_domain::{
    AnalysisResult, ClauseImprovement, ContractType, DocumentId, DocumentStatus, StatusStage,
};
use guardian_llm::Backend;
use std::sync::Arc;
use tracing::{info, warn};

/// Sequences extraction, segmentation, annotation and scoring
///
/// ```text
/// repository -> extractor -> segmenter -> orchestrator -> risk engine -> repository
///                  extract       split          llm            risk         done
/// ```
pub struct AnalysisPipeline<R, E, S>
where
    R: DocumentRepository,
    E: TextExtractor,
    S: StatusSink,
{
    repository: Arc<R>,
    extractor: Arc<E>,
    status: Arc<S>,
    segmenter: ClauseSegmenter,
    orchestrator: AnnotationOrchestrator,
    engine: RiskEngine,
}

impl<R, E, S> AnalysisPipeline<R, E, S>
where
    R: DocumentRepository,
    E: TextExtractor,
    S: StatusSink,
{
    /// Create a pipeline with the default policy registry
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Config`] for an invalid configuration.
    pub fn new(
        repository: Arc<R>,
        extractor: Arc<E>,
        status: Arc<S>,
        backend: Backend,
        config: &AnalysisConfig,
    ) -> Result<Self, AnalysisError> {
        config.validate().map_err(AnalysisError::Config)?;

        Ok(Self {
            repository,
            extractor,
            status,
            segmenter: ClauseSegmenter::from_config(config)?,
            orchestrator: AnnotationOrchestrator::new(backend, config),
            engine: RiskEngine::default(),
        })
    }

    /// Replace the policy registry
    pub fn with_registry(mut self, registry: PolicyRegistry) -> Self {
        self.engine = RiskEngine::new(registry);
        self
    }

    /// The document repository
    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// The annotation backend
    pub fn backend(&self) -> &Backend {
        self.orchestrator.backend()
    }

    /// Analyse a stored document and persist the result
    ///
    /// `contract_type` is the caller's choice; "general" (or an unknown
    /// name) lets the inferred type pick the policy.
    ///
    /// # Errors
    ///
    /// Fails when the document or its stored file is missing, when text
    /// extraction fails, or when the repository rejects a write. Backend
    /// failures never fail the analysis.
    pub async fn analyze(
        &self,
        document_id: DocumentId,
        contract_type: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        match self.run(document_id, contract_type).await {
            Ok(result) => Ok(result),
            Err(e) => {
                warn!("Analysis of {} failed: {}", document_id, e);
                self.report(document_id, StatusStage::Failed, e.to_string());
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        document_id: DocumentId,
        contract_type: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        let document = self
            .repository
            .get_document(document_id)
            .map_err(repository_error)?
            .ok_or(AnalysisError::DocumentNotFound(document_id))?;
        let path = document
            .stored_path
            .as_deref()
            .ok_or(AnalysisError::MissingFile(document_id))?;
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(AnalysisError::MissingFile(document_id));
        }

        info!("Analysing document {} ({})", document_id, document.filename);
        self.report(document_id, StatusStage::Extract, "Extracting text");
        let text = self
            .extractor
            .extract_text(path, document.content_type.as_deref())
            .await
            .map_err(|e| AnalysisError::Extraction(e.to_string()))?;
        self.repository
            .save_document_text(document_id, &text)
            .map_err(repository_error)?;

        let result = self.analyze_text(document_id, &text, contract_type).await?;

        self.repository
            .save_analysis_result(&result)
            .map_err(repository_error)?;
        self.report(document_id, StatusStage::Done, "Analysis complete");
        Ok(result)
    }

    /// Analyse already-extracted text without touching the repository
    ///
    /// Reports the split, llm and risk stages.
    pub async fn analyze_text(
        &self,
        document_id: DocumentId,
        text: &str,
        contract_type: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        let requested = ContractType::parse(contract_type).unwrap_or_else(|| {
            warn!("Unknown contract type '{}', using general", contract_type);
            ContractType::General
        });

        self.report(document_id, StatusStage::Split, "Splitting clauses");
        let clauses = self.segmenter.build_clauses(text);

        self.report(
            document_id,
            StatusStage::Llm,
            format!("Annotating {} clauses", clauses.len()),
        );
        let (clauses, hints) = self.orchestrator.annotate(clauses).await;
        let auto_contract_type = self.orchestrator.infer_contract_type(&clauses).await;

        let effective = effective_contract_type(requested, auto_contract_type.as_deref());
        self.report(
            document_id,
            StatusStage::Risk,
            format!("Scoring under {} policy", effective),
        );
        let result = self
            .engine
            .analyze(document_id, clauses, &hints, effective)?
            .with_auto_contract_type(auto_contract_type);
        Ok(result)
    }

    /// Latest analysis result of a document
    pub fn result(&self, document_id: DocumentId) -> Result<Option<AnalysisResult>, AnalysisError> {
        self.repository
            .get_analysis_result(document_id)
            .map_err(repository_error)
    }

    /// Ask the backend for a fairer version of one analysed clause
    ///
    /// When the backend cannot help, the clause text comes back unchanged
    /// with a zero risk delta.
    pub async fn suggest_improvement(
        &self,
        document_id: DocumentId,
        clause_id: &str,
    ) -> Result<ClauseImprovement, AnalysisError> {
        let result = self
            .result(document_id)?
            .ok_or(AnalysisError::ResultNotFound(document_id))?;
        let clause = result
            .clause(clause_id)
            .ok_or_else(|| AnalysisError::ClauseNotFound(clause_id.to_string()))?;

        match self.backend().suggest_improvement(&clause.raw_text).await {
            Ok(s) => Ok(ClauseImprovement {
                clause_id: clause.id.clone(),
                suggestion: s.suggestion,
                rationale: s.rationale,
                risk_delta: s.risk_delta,
            }),
            Err(e) => {
                warn!("No improvement for {}: {}", clause_id, e);
                Ok(ClauseImprovement::unchanged(&clause.id, &clause.raw_text))
            }
        }
    }

    fn report(&self, document_id: DocumentId, stage: StatusStage, message: impl Into<String>) {
        self.status.report(DocumentStatus::new(document_id, stage, message));
    }
}

/// The caller's type unless it is general, then the inferred type
pub fn effective_contract_type(requested: ContractType, inferred: Option<&str>) -> ContractType {
    if requested != ContractType::General {
        return requested;
    }
    inferred
        .and_then(ContractType::parse)
        .unwrap_or(ContractType::General)
}

fn repository_error<D: std::fmt::Display>(e: D) -> AnalysisError {
    AnalysisError::Repository(e.to_string())
}
