use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;
use m2048_analysis::{
    series::{Plot, Series},
    training_log::read_learning_curve,
};

use crate::{plot, util};

#[derive(Debug, Clone, Args)]
pub(crate) struct LearningCurveArg {
    /// Learning-rate logs as NAME=CSV, one curve each
    #[arg(required = true, value_parser = parse_named_path)]
    inputs: Vec<(String, PathBuf)>,
    /// Output SVG path
    #[arg(long, short, default_value = "learning_curves.svg")]
    output: PathBuf,
    /// Also write the curves as CSV
    #[arg(long)]
    csv: bool,
}

fn parse_named_path(s: &str) -> Result<(String, PathBuf), String> {
    match s.split_once('=') {
        Some((name, path)) if !name.is_empty() && !path.is_empty() => {
            Ok((name.to_owned(), PathBuf::from(path)))
        }
        _ => Err(format!("expected NAME=CSV, got '{s}'")),
    }
}

pub(crate) fn run(arg: &LearningCurveArg) -> anyhow::Result<()> {
    let mut plot = Plot::new("update count", "err / aerr");
    for (name, path) in &arg.inputs {
        let points = read_learning_curve(path)
            .with_context(|| format!("Failed to read learning-rate log: {}", path.display()))?;
        let series = Series::new(name.as_str(), points);
        print_summary(&series);
        plot.push(series);
    }

    if let Some(parent) = arg.output.parent()
        && !parent.as_os_str().is_empty()
    {
        util::create_dir(parent)?;
    }
    plot::render_plot(&plot, None, &arg.output)?;
    if arg.csv {
        util::write_plot_csv(&plot, &arg.output.with_extension("csv"))?;
    }
    Ok(())
}

fn print_summary(series: &Series) {
    let range = |values: &mut dyn Iterator<Item = f64>| {
        values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        })
    };
    println!("{}:", series.name);
    println!("  Data points: {}", series.len());
    if series.is_empty() {
        return;
    }
    let (x_min, x_max) = range(&mut series.xs());
    let (y_min, y_max) = range(&mut series.ys());
    println!("  Update count range: {x_min:.2} - {x_max:.2}");
    println!("  Ratio range: {y_min:.6} - {y_max:.6}");
}
