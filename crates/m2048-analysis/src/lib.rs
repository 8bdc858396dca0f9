//! Evaluation-log analysis for n-tuple 2048 players
//!
//! This crate reads the logs written by the evaluation and training programs
//! and turns them into curves, histograms and summaries that the `m2048`
//! command renders.
//!
//! # Overview
//!
//! ## Progress Aggregation Workflow
//!
//! Compare players against the perfect player, bucketed by game progress:
//!
//! 1. **Select Directories** ([`player::discover_data_dirs`], [`player::DirFilter`]):
//!    Find player runs under a board-data root and filter them
//! 2. **Parse Logs** ([`record::EvalRecord`], [`state_log::StateLog`]): Read move
//!    evaluations and game endings
//! 3. **Compute Metrics** ([`metric::MetricKind`]): Accuracy and evaluation
//!    errors per record, averaged per progress value
//! 4. **Aggregate** ([`aggregate`]): Smooth, average across seeds and take
//!    differences between curves
//! 5. **Build Plots** ([`graph`]): Assemble [`series::Plot`]s ready for rendering
//!
//! ## Training Log Workflow
//!
//! - **Score Logs** ([`training_log::load_score_curves`]): Mean and spread of
//!   the training score across seeds
//! - **Interval Averages** ([`training_log::interval_averages`]): Average
//!   finished-game scores over fixed game-id intervals
//! - **Learning Curves** ([`training_log::read_learning_curve`]): Error ratio
//!   against update count
//!
//! ## Board Inspection
//!
//! - **Tile Patterns** ([`tiles::TileCounts`]): Complete boards shared by two board logs
//! - **Average Progress** ([`progress::summarize_progress`]): Game-over progress
//!   pooled across seeds
//!
//! # Examples
//!
//! ```no_run
//! use std::path::Path;
//!
//! use m2048_analysis::{
//!     aggregate::AggregationConfig,
//!     graph::{CurveSource, per_run_plot},
//!     metric::MetricKind,
//!     player::{PlayerData, discover_data_dirs},
//! };
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let root = Path::new("board_data");
//! let players = discover_data_dirs(root, false)?
//!     .iter()
//!     .map(|dir| PlayerData::new(root, dir))
//!     .collect::<Vec<_>>();
//!
//! let config = AggregationConfig::default();
//! let plot = per_run_plot(&players, CurveSource::Metric(MetricKind::Accuracy), &config)?;
//! for series in &plot.series {
//!     println!("{}: {} points", series.name, series.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod display;
pub mod error;
pub mod graph;
pub mod meta;
pub mod metric;
pub mod player;
pub mod progress;
pub mod record;
pub mod sample;
pub mod series;
pub mod state_log;
pub mod tiles;
pub mod training_log;

pub use self::error::AnalysisError;
