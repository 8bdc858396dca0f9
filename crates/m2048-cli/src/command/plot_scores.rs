use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Args;
use m2048_analysis::{
    series::{Plot, Series},
    training_log::{interval_averages, interval_series, read_finished_games},
};

use crate::{plot, util};

#[derive(Debug, Clone, Args)]
pub(crate) struct PlotScoresArg {
    /// First training console log
    log_a: PathBuf,
    /// Second training console log
    log_b: PathBuf,
    /// Number of game ids per averaged interval
    #[arg(long, short, default_value_t = 10000, value_parser = clap::value_parser!(u64).range(1..))]
    avescope: u64,
    /// Output SVG path
    #[arg(long, short, default_value = "score_progression.svg")]
    output: PathBuf,
    /// Also write the averages as CSV
    #[arg(long)]
    csv: bool,
}

fn load(path: &Path, avescope: u64) -> anyhow::Result<Series> {
    let scores = read_finished_games(path)
        .with_context(|| format!("Failed to read training log: {}", path.display()))?;
    println!("{}: found {} games", path.display(), scores.len());
    let name = path.file_stem().unwrap_or_default().to_string_lossy();
    let series = interval_series(&name, &interval_averages(&scores, avescope));
    println!("Plotting {} points for {name}", series.len());
    Ok(series)
}

pub(crate) fn run(arg: &PlotScoresArg) -> anyhow::Result<()> {
    let mut plot = Plot::new(
        "game id",
        format!("average score (per {} games)", arg.avescope),
    );
    plot.push(load(&arg.log_a, arg.avescope)?);
    plot.push(load(&arg.log_b, arg.avescope)?);

    if let Some(parent) = arg.output.parent()
        && !parent.as_os_str().is_empty()
    {
        util::create_dir(parent)?;
    }
    plot::render_plot(&plot, None, &arg.output)?;
    if arg.csv {
        util::write_plot_csv(&plot, &arg.output.with_extension("csv"))?;
    }
    println!("Graph saved to: {}", arg.output.display());

    for series in &plot.series {
        let (min, max) = series
            .ys()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
                (lo.min(y), hi.max(y))
            });
        if let Some(last) = series.points.last() {
            println!(
                "{}: min={min:.1}, max={max:.1}, final={:.1}",
                series.name, last.y
            );
        }
    }
    Ok(())
}
