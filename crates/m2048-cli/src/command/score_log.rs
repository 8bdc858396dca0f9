use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::{Context as _, bail};
use clap::Args;
use m2048_analysis::training_log::{ScoreCurve, load_score_curves};

use crate::{plot, util};

#[derive(Debug, Clone, Args)]
pub(crate) struct ScoreLogArg {
    /// Run name under the n-tuple data root
    #[arg(long)]
    run_name: String,
    /// Root holding `<run>/seed*/NT*_*/log_score.csv`
    #[arg(long, default_value = "ntuple_dat")]
    dat_root: PathBuf,
    /// Output directory (default: output/<run-name>/score_log)
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Output file name prefix
    #[arg(long, default_value = "score_log_mean")]
    file_prefix: String,
    /// Draw one graph per tuple count instead of a single graph
    #[arg(long)]
    split_nt: bool,
    /// Also write the averaged curves as CSV
    #[arg(long)]
    csv: bool,
}

/// `NT<t>` part of an `NT<t>_<sym>` name.
fn nt_tag(name: &str) -> &str {
    name.split_once('_').map_or(name, |(tag, _)| tag)
}

pub(crate) fn run(arg: &ScoreLogArg) -> anyhow::Result<()> {
    let curves = load_score_curves(&arg.dat_root, &arg.run_name)
        .with_context(|| format!("Failed to load score logs of {}", arg.run_name))?;
    if curves.is_empty() {
        bail!(
            "no log_score.csv found under {}",
            arg.dat_root.join(&arg.run_name).display()
        );
    }

    for curve in &curves {
        let seeds = curve.points.iter().map(|(_, s)| s.count).max().unwrap_or(0);
        match curve.points.last() {
            Some((x, stats)) => println!(
                "{}: {} points, up to {} seeds, last traincount_total={x} avg_score={:.2} ± {:.2}",
                curve.name,
                curve.points.len(),
                seeds,
                stats.mean,
                stats.std_dev
            ),
            None => println!("{}: no rows", curve.name),
        }
    }

    let output_dir = arg.output_dir.clone().unwrap_or_else(|| {
        PathBuf::from("output")
            .join(&arg.run_name)
            .join("score_log")
    });
    util::create_dir(&output_dir)?;

    let mut groups = BTreeMap::<&str, Vec<&ScoreCurve>>::new();
    for curve in &curves {
        let key = if arg.split_nt { nt_tag(&curve.name) } else { "" };
        groups.entry(key).or_default().push(curve);
    }
    for (tag, group) in &groups {
        let stem = if tag.is_empty() {
            arg.file_prefix.clone()
        } else {
            format!("{}_{tag}", arg.file_prefix)
        };
        let path = output_dir.join(format!("{stem}.svg"));
        plot::render_score_curves(group, "traincount_total", "avg_score (seed mean ± SD)", &path)?;
        if arg.csv {
            write_curves_csv(group, &path.with_extension("csv"))?;
        }
    }
    Ok(())
}

fn write_curves_csv(curves: &[&ScoreCurve], path: &Path) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    writer.write_record(["name", "traincount_total", "mean", "sd", "count"])?;
    for curve in curves {
        for (x, stats) in &curve.points {
            writer.write_record([
                curve.name.clone(),
                x.to_string(),
                stats.mean.to_string(),
                stats.std_dev.to_string(),
                stats.count.to_string(),
            ])?;
        }
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nt_tag() {
        assert_eq!(nt_tag("NT6_sym"), "NT6");
        assert_eq!(nt_tag("NT4_notsym"), "NT4");
        assert_eq!(nt_tag("NT6"), "NT6");
    }
}
