use std::{io::Write as _, path::PathBuf};

use anyhow::Context as _;
use clap::Args;
use m2048_analysis::progress::summarize_progress;

use crate::util::Output;

#[derive(Debug, Clone, Args)]
pub(crate) struct AverageProgressArg {
    /// Data directories containing after-state.txt
    #[arg(required = true)]
    dirs: Vec<PathBuf>,
    /// Number of groups to show, best first
    #[arg(long)]
    top: Option<usize>,
    /// Write the report to this file instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &AverageProgressArg) -> anyhow::Result<()> {
    let report = summarize_progress(&arg.dirs).context("Failed to read after-state logs")?;
    let mut output = Output::from_output_path(arg.output.clone())?;
    let top = arg.top.unwrap_or(report.summaries.len());

    writeln!(output, "Results by directory (grouped by base name):")?;
    writeln!(
        output,
        "{:<30} {:>10} {:>10} {:>10} {:>8}",
        "Player", "Average", "Median", "Std Dev", "Games"
    )?;
    writeln!(output, "{}", "-".repeat(72))?;
    for summary in report.summaries.iter().take(top) {
        let stats = &summary.stats;
        writeln!(
            output,
            "{:<30} {:>10.2} {:>10.2} {:>10.2} {:>8}",
            summary.name, stats.mean, stats.median, stats.std_dev, stats.count
        )?;
    }
    if !report.empty_dirs.is_empty() {
        writeln!(output)?;
        writeln!(output, "Directories with no valid progress data:")?;
        for dir in &report.empty_dirs {
            writeln!(output, "{}", dir.display())?;
        }
    }
    output
        .flush()
        .with_context(|| format!("Failed to flush output to {}", output.display_path()))?;
    Ok(())
}
