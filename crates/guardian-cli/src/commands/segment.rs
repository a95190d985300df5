//! Segment command implementation.

use crate::cli::SegmentArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use guardian_analysis::ClauseSegmenter;
use std::fs;

/// Execute the segment command.
pub async fn execute_segment(args: SegmentArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let text = fs::read_to_string(&args.file)?;
    let segmenter = ClauseSegmenter::from_config(&config.analysis)?;
    let clauses = segmenter.build_clauses(&text);

    println!("{}", formatter.format_clauses(&clauses)?);

    Ok(())
}
