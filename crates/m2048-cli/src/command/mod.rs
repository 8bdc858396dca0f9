use clap::{Parser, Subcommand};

use self::{
    average_progress::AverageProgressArg, export_score_averages::ExportScoreAveragesArg,
    graph::GraphArg, learning_curve::LearningCurveArg, pattern_frequency::PatternFrequencyArg,
    plot_scores::PlotScoresArg, score_log::ScoreLogArg, tile_matches::TileMatchesArg,
    write_meta::WriteMetaArg,
};

mod average_progress;
mod export_score_averages;
mod graph;
mod learning_curve;
mod pattern_frequency;
mod plot_scores;
mod score_log;
mod tile_matches;
mod write_meta;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Draw comparison graphs of player runs against the perfect player
    Graph(#[clap(flatten)] GraphArg),
    /// Summarize game-over progress per player, pooled across seeds
    AverageProgress(#[clap(flatten)] AverageProgressArg),
    /// Plot training score logs averaged across seeds
    ScoreLog(#[clap(flatten)] ScoreLogArg),
    /// Average finished-game scores of a training log over game-id intervals
    ExportScoreAverages(#[clap(flatten)] ExportScoreAveragesArg),
    /// Plot interval score averages of two training logs against each other
    PlotScores(#[clap(flatten)] PlotScoresArg),
    /// Plot err/aerr learning curves
    LearningCurve(#[clap(flatten)] LearningCurveArg),
    /// List complete tile patterns shared by two board logs
    TileMatches(#[clap(flatten)] TileMatchesArg),
    /// Count one board per group of games in the sym and notsym board logs
    PatternFrequency(#[clap(flatten)] PatternFrequencyArg),
    /// Write meta.json for a data directory from its evaluation file name
    WriteMeta(#[clap(flatten)] WriteMetaArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Graph(arg) => graph::run(&arg)?,
        Mode::AverageProgress(arg) => average_progress::run(&arg)?,
        Mode::ScoreLog(arg) => score_log::run(&arg)?,
        Mode::ExportScoreAverages(arg) => export_score_averages::run(&arg)?,
        Mode::PlotScores(arg) => plot_scores::run(&arg)?,
        Mode::LearningCurve(arg) => learning_curve::run(&arg)?,
        Mode::TileMatches(arg) => tile_matches::run(&arg)?,
        Mode::PatternFrequency(arg) => pattern_frequency::run(&arg)?,
        Mode::WriteMeta(arg) => write_meta::run(&arg)?,
    }
    Ok(())
}
