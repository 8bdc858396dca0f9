use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Args;
use m2048_analysis::{
    series::Plot,
    tiles::{
        FIXED_BOARD, TileState, format_state, group_series, parse_tile_state, pattern_frequency,
    },
};

use crate::{plot, util};

#[derive(Debug, Clone, Args)]
pub(crate) struct PatternFrequencyArg {
    /// Board log of the symmetric run (game_id, tile0..tile8 columns)
    #[arg(long, default_value = "board_log.csv")]
    sym: PathBuf,
    /// Board log of the non-symmetric run
    #[arg(long, default_value = "board_log_notsym.csv")]
    notsym: PathBuf,
    /// Board to track; defaults to 0,1,2,0,0,1,0,0,0
    #[arg(long, short, value_name = "T0,..,T8", value_parser = parse_tile_state)]
    pattern: Option<TileState>,
    /// Number of consecutive game ids per group
    #[arg(long, short, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    group_size: u64,
    /// Output SVG path
    #[arg(long, short, default_value = "pattern_frequency.svg")]
    output: PathBuf,
    /// Also write the counts as CSV
    #[arg(long)]
    csv: bool,
}

pub(crate) fn run(arg: &PatternFrequencyArg) -> anyhow::Result<()> {
    let pattern = arg.pattern.unwrap_or(FIXED_BOARD);
    println!("Tracking pattern: [{}]", format_state(&pattern));
    println!("Games per group: {}", arg.group_size);

    let count = |path: &Path| {
        pattern_frequency(path, &pattern, arg.group_size)
            .with_context(|| format!("Failed to read board log: {}", path.display()))
    };
    let sym = count(&arg.sym)?;
    let notsym = count(&arg.notsym)?;

    let Some(last_group) = sym.keys().chain(notsym.keys()).copied().max() else {
        println!("No matches found in either file.");
        return Ok(());
    };
    let mut plot = Plot::new("game id (end of group)", "pattern match count");
    plot.push(group_series("sym", &sym, last_group, arg.group_size));
    plot.push(group_series("notsym", &notsym, last_group, arg.group_size));

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
    println!("Sym total matches: {}", sym.values().sum::<u64>());
    println!("Notsym total matches: {}", notsym.values().sum::<u64>());
    Ok(())
}
