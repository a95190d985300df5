//! Analyze command implementation.

use crate::cli::{AnalysisArgs, AnalyzeArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::{Formatter, OutputFormat};
use guardian_analysis::AnalysisPipeline;
use guardian_domain::traits::StatusSink;
use guardian_domain::{AnalysisResult, Document, DocumentId, DocumentStatus};
use guardian_llm::build_backend;
use guardian_store::{InMemoryRepository, PlainTextExtractor};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Prints pipeline stages to stderr when enabled.
struct StderrProgress {
    enabled: bool,
}

impl StatusSink for StderrProgress {
    fn report(&self, status: DocumentStatus) {
        if self.enabled {
            eprintln!("[{:>3}%] {}", status.progress, status.message);
        }
    }
}

/// Run the full pipeline over one file.
pub(crate) async fn analyze_file(
    args: &AnalysisArgs,
    config: &Config,
    show_progress: bool,
) -> Result<AnalysisResult> {
    let path = Path::new(&args.file);
    if !path.is_file() {
        return Err(CliError::InvalidInput(format!("{} is not a file", args.file)));
    }

    let mut llm = config.llm.clone();
    if let Some(backend) = args.backend {
        llm.provider = backend.into();
    }
    let backend = build_backend(&llm)?;
    debug!("Analyzing {} with {} backend", args.file, llm.provider.as_str());

    let repository = Arc::new(InMemoryRepository::new());
    let id = DocumentId::new();
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.file.clone());
    repository.insert_document(Document::new(id, filename, None).with_stored_path(path))?;

    let pipeline = AnalysisPipeline::new(
        repository,
        Arc::new(PlainTextExtractor::default()),
        Arc::new(StderrProgress {
            enabled: show_progress,
        }),
        backend,
        &config.analysis.clone().covering_backend(&llm),
    )?;
    Ok(pipeline.analyze(id, &args.contract_type).await?)
}

/// Execute the analyze command.
pub async fn execute_analyze(args: AnalyzeArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let show_progress = formatter.format() == OutputFormat::Table;
    let result = analyze_file(&args.analysis, config, show_progress).await?;

    println!("{}", formatter.format_result(&result)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::BackendArg;
    use guardian_domain::ContractType;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn args(file: &NamedTempFile, contract_type: &str) -> AnalysisArgs {
        AnalysisArgs {
            file: file.path().to_string_lossy().into_owned(),
            contract_type: contract_type.to_string(),
            backend: Some(BackendArg::Dummy),
        }
    }

    #[tokio::test]
    async fn test_analyze_file_with_dummy_backend() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "제1조 (목적) 임대차 계약\n제2조 (보증금) 보증금은 1억 원").unwrap();

        let result = analyze_file(&args(&file, "general"), &Config::default(), false)
            .await
            .unwrap();
        assert_eq!(result.clauses.len(), 2);
        assert_eq!(result.auto_contract_type.as_deref(), Some("lease"));
        assert_eq!(result.contract_type, ContractType::Lease);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let file = NamedTempFile::new().unwrap();
        let mut missing = args(&file, "general");
        missing.file = "/nonexistent/contract.txt".to_string();

        let err = analyze_file(&missing, &Config::default(), false).await.unwrap_err();
        assert!(matches!(err, CliError::InvalidInput(_)));
    }
}
