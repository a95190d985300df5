//! Report command implementation.

use crate::cli::ReportArgs;
use crate::commands::analyze::analyze_file;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use guardian_analysis::ReportFormat;
use std::fs;

/// Execute the report command.
pub async fn execute_report(args: ReportArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let format = if args.html {
        ReportFormat::Html
    } else {
        ReportFormat::Markdown
    };

    let result = analyze_file(&args.analysis, config, args.output.is_some()).await?;
    let rendered = format.render(&result);

    match args.output {
        Some(path) => {
            fs::write(&path, rendered)?;
            println!("{}", formatter.success(&format!("Report written to {}", path)));
        }
        None => print!("{}", rendered),
    }

    Ok(())
}
