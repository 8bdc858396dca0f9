use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;
use m2048_analysis::training_log::{interval_averages, read_finished_games, write_interval_csv};

use crate::util;

#[derive(Debug, Clone, Args)]
pub(crate) struct ExportScoreAveragesArg {
    /// Training console log with `game <id> finished with score <score>` lines
    #[arg(long, short)]
    input: PathBuf,
    /// Output CSV path
    #[arg(long, short)]
    output: PathBuf,
    /// Number of game ids per interval
    #[arg(long, short, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    avescope: u64,
}

pub(crate) fn run(arg: &ExportScoreAveragesArg) -> anyhow::Result<()> {
    let scores = read_finished_games(&arg.input)
        .with_context(|| format!("Failed to read training log: {}", arg.input.display()))?;
    let rows = interval_averages(&scores, arg.avescope);
    if rows.is_empty() {
        log::warn!(
            "no complete interval of {} games in {}",
            arg.avescope,
            arg.input.display()
        );
    }
    if let Some(parent) = arg.output.parent()
        && !parent.as_os_str().is_empty()
    {
        util::create_dir(parent)?;
    }
    write_interval_csv(&rows, &arg.output)
        .with_context(|| format!("Failed to write {}", arg.output.display()))?;
    println!("wrote: {} ({} intervals)", arg.output.display(), rows.len());
    Ok(())
}
