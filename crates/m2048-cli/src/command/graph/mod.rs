//! Comparison graphs of player runs against the perfect player.
//!
//! Every invocation refreshes `config.json` in the output directory, selects
//! the data directories, builds the requested plot and renders it as SVG.

mod kind;

use std::{
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use anyhow::{Context, bail};
use clap::Args;
use m2048_analysis::{
    aggregate::{AggregationConfig, AlignPolicy, FillPolicy},
    display::{CONFIG_FILE_NAME, DisplayConfig},
    graph::{self, CurveSource, PairOrder},
    player::{DirFilter, MetaFilter, PlayerData, discover_data_dirs},
    sample::Sampler,
    series::Plot,
};
use m2048_stats::survival::SurvivalCurve;

use self::kind::{GraphKind, LineSource};
use crate::{plot, util};

const EVALS_SAMPLE_SIZE: usize = 1000;
const SCATTER_SAMPLE_SIZE: usize = 1500;

#[derive(Debug, Clone, Args)]
pub(crate) struct GraphArg {
    /// Graph to draw
    #[arg(value_enum)]
    kind: GraphKind,
    /// Root directory holding one data directory per player run
    #[arg(long, default_value = "board_data")]
    board_dir: PathBuf,
    /// Directory for the rendered graphs and config.json
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,
    /// Output file name, relative to the output directory
    #[arg(long, short)]
    output: Option<PathBuf>,
    /// Use every directory containing eval.txt instead of the immediate subdirectories
    #[arg(long)]
    recursive: bool,
    /// Keep only directories whose relative path matches one of these regexes
    #[arg(long, num_args = 1.., conflicts_with = "exclude")]
    intersection: Vec<String>,
    /// Drop directories whose relative path matches one of these regexes
    #[arg(long, num_args = 1..)]
    exclude: Vec<String>,
    /// Keep only directories with one of these seeds in meta.json
    #[arg(long, num_args = 1..)]
    seed: Vec<u64>,
    /// Keep only directories with one of these stages in meta.json
    #[arg(long, num_args = 1..)]
    stage: Vec<u32>,
    /// Keep only directories with one of these tuple counts in meta.json
    #[arg(long, num_args = 1..)]
    tuple: Vec<u32>,
    /// Keep only directories with this symmetry in meta.json
    #[arg(long, value_parser = ["sym", "notsym"])]
    sym: Option<String>,
    /// Plot `sym - notsym` differences of the averaged curves (`*-mean` graphs only)
    #[arg(long)]
    symdiff: bool,
    /// Smoothing window, overriding the per-metric default
    #[arg(long)]
    window: Option<NonZeroUsize>,
    /// How averaged curves line up: positional, intersection or union
    #[arg(long, default_value = "intersection")]
    align: AlignPolicy,
    /// How differences treat one-sided x values: zero or skip
    #[arg(long, default_value = "zero")]
    fill: FillPolicy,
    /// Which directories acc-diff compares: input, sym-notsym or notsym-sym
    #[arg(long, default_value = "input")]
    acc_diff_order: PairOrder,
    /// Also write the plotted series as CSV next to each graph
    #[arg(long)]
    csv: bool,
    /// Records sampled per directory by evals and scatter
    #[arg(long)]
    sample_size: Option<usize>,
    /// Seed of the sampling generator
    #[arg(long)]
    rng_seed: Option<u64>,
}

impl GraphArg {
    fn dir_filter(&self) -> DirFilter {
        DirFilter {
            intersection: self.intersection.clone(),
            exclude: self.exclude.clone(),
            include_reference: self.kind.includes_reference(),
            meta: MetaFilter {
                seeds: self.seed.clone(),
                stages: self.stage.clone(),
                tuples: self.tuple.clone(),
                sym: self.sym.clone(),
            },
        }
    }

    fn aggregation_config(&self) -> AggregationConfig {
        AggregationConfig {
            window: self.window.map(NonZeroUsize::get),
            align: self.align,
            fill: self.fill,
            ..AggregationConfig::default()
        }
    }

    fn output_path(&self) -> PathBuf {
        let name = match &self.output {
            Some(output) => output.clone(),
            None => {
                let suffix = if self.symdiff { "_symdiff" } else { "" };
                PathBuf::from(format!("{}{suffix}.svg", self.kind.default_stem()))
            }
        };
        self.output_dir.join(name)
    }

    fn sampler(&self, default_size: usize) -> Sampler {
        Sampler::new(self.sample_size.unwrap_or(default_size), self.rng_seed)
    }
}

/// `<stem><suffix>.<ext>` next to `path`.
fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    let ext = path.extension().unwrap_or("svg".as_ref()).to_string_lossy();
    path.with_file_name(format!("{stem}{suffix}.{ext}"))
}

pub(crate) fn run(arg: &GraphArg) -> anyhow::Result<()> {
    if arg.symdiff && !arg.kind.is_mean() {
        bail!("--symdiff applies only to the *-mean graphs");
    }

    let players = discover_data_dirs(&arg.board_dir, arg.recursive)
        .with_context(|| format!("Failed to scan {}", arg.board_dir.display()))?
        .iter()
        .map(|dir| PlayerData::new(&arg.board_dir, dir))
        .collect::<Vec<_>>();
    util::create_dir(&arg.output_dir)?;
    let config_path = arg.output_dir.join(CONFIG_FILE_NAME);
    let display = DisplayConfig::load_and_update(&config_path, &players)
        .with_context(|| format!("Failed to update {}", config_path.display()))?;
    let players = arg.dir_filter().select(players, &display)?;

    let output = arg.output_path();
    if let Some(parent) = output.parent() {
        util::create_dir(parent)?;
    }
    match arg.kind {
        GraphKind::Hist => draw_histograms(arg, &players, &display, &output),
        GraphKind::Scatter => draw_scatter(arg, &players, &display, &output),
        GraphKind::Evals => {
            let plot = graph::chosen_evals_plot(&players, &mut arg.sampler(EVALS_SAMPLE_SIZE))?;
            finish(arg, &plot, &display, &output)
        }
        GraphKind::AccDiff => {
            let plot = graph::accuracy_diff_plot(
                &players,
                arg.acc_diff_order,
                &display,
                &arg.aggregation_config(),
            )?;
            finish(arg, &plot, &display, &output)
        }
        kind => {
            let source = kind
                .line_source()
                .with_context(|| format!("{kind:?} is not a line graph"))?;
            let plot = line_plot(arg, &players, source)?;
            finish(arg, &plot, &display, &output)
        }
    }
}

fn line_plot(arg: &GraphArg, players: &[PlayerData], source: LineSource) -> anyhow::Result<Plot> {
    let config = arg.aggregation_config();
    let reference: SurvivalCurve;
    let source = match source {
        LineSource::Metric(metric) => CurveSource::Metric(metric),
        LineSource::Survival => CurveSource::Survival,
        LineSource::SurvivalDiff => {
            reference = graph::reference_survival(&arg.board_dir, &config)
                .context("Failed to read the perfect player's survival data")?;
            CurveSource::SurvivalDiff {
                reference: &reference,
            }
        }
    };
    let plot = if arg.symdiff {
        graph::symdiff_plot(players, source, &config)?
    } else if arg.kind.is_mean() {
        graph::mean_plot(players, source, &config)?
    } else {
        graph::per_run_plot(players, source, &config)?
    };
    Ok(plot)
}

fn finish(arg: &GraphArg, plot: &Plot, display: &DisplayConfig, output: &Path) -> anyhow::Result<()> {
    if plot.is_empty() {
        log::warn!("no data to plot for {}", output.display());
    }
    plot::render_plot(plot, Some(display), output)?;
    if arg.csv {
        util::write_plot_csv(plot, &output.with_extension("csv"))?;
    }
    Ok(())
}

fn draw_histograms(
    arg: &GraphArg,
    players: &[PlayerData],
    display: &DisplayConfig,
    output: &Path,
) -> anyhow::Result<()> {
    let histograms = graph::score_histograms(players)?;
    if histograms.is_empty() {
        log::warn!("no score data found");
    }
    for (name, histogram) in &histograms {
        let path = sibling_path(output, &format!("-{name}"));
        plot::render_histogram(histogram, display.label_for(name), &path)?;
        if arg.csv {
            util::write_histogram_csv(histogram, &path.with_extension("csv"))?;
        }
    }
    Ok(())
}

fn draw_scatter(
    arg: &GraphArg,
    players: &[PlayerData],
    display: &DisplayConfig,
    output: &Path,
) -> anyhow::Result<()> {
    let panels = graph::after_state_scatter(players, &mut arg.sampler(SCATTER_SAMPLE_SIZE))?;
    if panels.is_empty() {
        log::warn!("no scatter data found");
    }
    for panel in &panels {
        for (name, fit) in &panel.fits {
            println!(
                "{}: {}: y = {:.4} x + {:.4}",
                panel.name,
                display.label_for(name),
                fit.slope,
                fit.intercept
            );
        }
        let path = sibling_path(output, &format!("_{}", panel.name));
        finish(arg, &panel.plot, display, &path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct Cli {
        #[command(flatten)]
        graph: GraphArg,
    }

    fn parse(args: &[&str]) -> GraphArg {
        Cli::parse_from(std::iter::once("graph").chain(args.iter().copied())).graph
    }

    #[test]
    fn test_defaults() {
        let arg = parse(&["acc-mean"]);
        assert_eq!(arg.kind, GraphKind::AccMean);
        assert_eq!(arg.align, AlignPolicy::Intersection);
        assert_eq!(arg.fill, FillPolicy::Zero);
        assert_eq!(arg.acc_diff_order, PairOrder::Input);
        assert_eq!(arg.output_path(), Path::new("output/accuracy_mean.svg"));
        assert!(!arg.dir_filter().include_reference);
    }

    #[test]
    fn test_options() {
        let arg = parse(&[
            "surv-mean",
            "--symdiff",
            "--align",
            "union",
            "--fill",
            "skip",
            "--acc-diff-order",
            "sym-notsym",
            "--seed",
            "1",
            "2",
            "--output-dir",
            "out",
        ]);
        assert_eq!(arg.align, AlignPolicy::Union);
        assert_eq!(arg.fill, FillPolicy::Skip);
        assert_eq!(arg.acc_diff_order, PairOrder::SymNotsym);
        assert_eq!(arg.dir_filter().meta.seeds, vec![1, 2]);
        assert_eq!(arg.output_path(), Path::new("out/survival_mean_symdiff.svg"));
    }

    #[test]
    fn test_window_must_be_positive() {
        let arg = parse(&["err-abs", "--window", "3"]);
        assert_eq!(arg.aggregation_config().window, Some(3));
        assert_eq!(parse(&["err-abs"]).aggregation_config().window, None);

        let args = ["graph", "err-abs", "--window", "0"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_sibling_path() {
        assert_eq!(
            sibling_path(Path::new("out/histogram.svg"), "-a__b"),
            Path::new("out/histogram-a__b.svg")
        );
        assert_eq!(
            sibling_path(Path::new("scatter"), "_run_s1_NT6"),
            Path::new("scatter_run_s1_NT6.svg")
        );
    }
}
