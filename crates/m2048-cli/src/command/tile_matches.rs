use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Args;
use m2048_analysis::tiles::{
    FIXED_BOARD, TileCounts, TileState, format_state, parse_tile_state, shared_patterns,
};

#[derive(Debug, Clone, Args)]
pub(crate) struct TileMatchesArg {
    /// First board log (tile0..tile8 columns)
    csv_a: PathBuf,
    /// Second board log (tile0..tile8 columns)
    csv_b: PathBuf,
    /// Number of patterns to show
    #[arg(long, default_value_t = 10)]
    top: usize,
    /// Also count one board in both logs; without a value, 0,1,2,0,0,1,0,0,0
    #[arg(long, value_name = "T0,..,T8", num_args = 0..=1, value_parser = parse_tile_state)]
    pattern: Option<Option<TileState>>,
}

fn load(path: &Path) -> anyhow::Result<TileCounts> {
    let counts = TileCounts::read(path)
        .with_context(|| format!("Failed to read board log: {}", path.display()))?;
    println!(
        "Loaded {} unique patterns from {}",
        counts.counts.len(),
        path.display()
    );
    Ok(counts)
}

#[expect(clippy::cast_precision_loss)]
fn print_pattern_count(path: &Path, counts: &TileCounts, pattern: &TileState) {
    let matches = counts.count_of(pattern);
    println!("{}:", path.display());
    println!("  Total rows: {}", counts.rows);
    println!("  Matches: {matches}");
    if counts.rows > 0 {
        let rate = matches as f64 / counts.rows as f64 * 100.0;
        println!("  Occurrence rate: {rate:.6}%");
    }
}

pub(crate) fn run(arg: &TileMatchesArg) -> anyhow::Result<()> {
    let a = load(&arg.csv_a)?;
    let b = load(&arg.csv_b)?;

    let shared = shared_patterns(&a, &b, arg.top);
    if shared.is_empty() {
        println!("No matching patterns found.");
    } else {
        println!();
        println!("Top matching patterns (pattern -> shared count):");
        for (i, (state, count)) in shared.iter().enumerate() {
            println!("{:2}: [{}] -> {count}", i + 1, format_state(state));
        }
    }

    if let Some(pattern) = arg.pattern {
        let pattern = pattern.unwrap_or(FIXED_BOARD);
        println!();
        println!("Pattern [{}]", format_state(&pattern));
        print_pattern_count(&arg.csv_a, &a, &pattern);
        print_pattern_count(&arg.csv_b, &b, &pattern);
        let (ma, mb) = (a.count_of(&pattern), b.count_of(&pattern));
        if mb > 0 {
            #[expect(clippy::cast_precision_loss)]
            let ratio = ma as f64 / mb as f64;
            println!("  Matches ratio (a/b): {ratio:.4}");
        }
    }
    Ok(())
}
