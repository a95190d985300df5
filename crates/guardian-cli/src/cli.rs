//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use guardian_llm::BackendKind;

/// Contract Guardian CLI - Analyse contract clauses for risk.
#[derive(Debug, Parser)]
#[command(name = "guardian")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path ([llm] and [analysis] tables)
    #[arg(short, long, global = true, env = "GUARDIAN_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Markdown report
    Markdown,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyse a contract file and print scored clauses
    Analyze(AnalyzeArgs),

    /// Split a contract file into clauses without annotating them
    Segment(SegmentArgs),

    /// Analyse a contract file and write a Markdown or HTML report
    Report(ReportArgs),
}

/// Arguments shared by commands that run the full analysis.
#[derive(Debug, Clone, clap::Args)]
pub struct AnalysisArgs {
    /// Contract file (UTF-8 text)
    pub file: String,

    /// Contract type: general, employment or lease
    #[arg(short = 't', long, default_value = "general")]
    pub contract_type: String,

    /// Annotation backend (overrides the config file)
    #[arg(short, long, value_enum, env = "GUARDIAN_LLM_PROVIDER")]
    pub backend: Option<BackendArg>,
}

/// Arguments for the analyze command.
#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

/// Arguments for the segment command.
#[derive(Debug, Parser)]
pub struct SegmentArgs {
    /// Contract file (UTF-8 text)
    pub file: String,
}

/// Arguments for the report command.
#[derive(Debug, Parser)]
pub struct ReportArgs {
    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// Render HTML instead of Markdown
    #[arg(long)]
    pub html: bool,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Backend argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BackendArg {
    /// Offline keyword rules
    Dummy,
    /// Local Ollama instance
    Ollama,
    /// OpenAI-compatible API
    Openai,
}

impl From<CliFormat> for crate::output::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::output::OutputFormat::Table,
            CliFormat::Json => crate::output::OutputFormat::Json,
            CliFormat::Markdown => crate::output::OutputFormat::Markdown,
        }
    }
}

impl From<BackendArg> for BackendKind {
    fn from(backend: BackendArg) -> Self {
        match backend {
            BackendArg::Dummy => BackendKind::Dummy,
            BackendArg::Ollama => BackendKind::Ollama,
            BackendArg::Openai => BackendKind::OpenAi,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_command() {
        let cli = Cli::parse_from([
            "guardian",
            "analyze",
            "lease.txt",
            "--contract-type",
            "lease",
            "--backend",
            "dummy",
            "--format",
            "json",
        ]);
        assert_eq!(cli.format, Some(CliFormat::Json));
        match cli.command {
            Command::Analyze(args) => {
                assert_eq!(args.analysis.file, "lease.txt");
                assert_eq!(args.analysis.contract_type, "lease");
                assert_eq!(args.analysis.backend, Some(BackendArg::Dummy));
            }
            _ => panic!("Expected Analyze command"),
        }
    }

    #[test]
    fn test_analyze_defaults() {
        let cli = Cli::parse_from(["guardian", "analyze", "a.txt"]);
        match cli.command {
            Command::Analyze(args) => assert_eq!(args.analysis.contract_type, "general"),
            _ => panic!("Expected Analyze command"),
        }
        assert!(!cli.no_color);
    }

    #[test]
    fn test_report_command() {
        let cli = Cli::parse_from(["guardian", "report", "a.txt", "--html", "-o", "out.html"]);
        match cli.command {
            Command::Report(args) => {
                assert!(args.html);
                assert_eq!(args.output.as_deref(), Some("out.html"));
            }
            _ => panic!("Expected Report command"),
        }
    }

    #[test]
    fn test_backend_conversion() {
        let kind: BackendKind = BackendArg::Openai.into();
        assert_eq!(kind, BackendKind::OpenAi);
    }
}
