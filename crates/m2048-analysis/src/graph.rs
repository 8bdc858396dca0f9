//! Builders turning the selected player directories into [`Plot`]s.
//!
//! Directories whose input files are missing are reported and skipped. Any
//! other error, such as a record-count mismatch, aborts the graph.

use std::{collections::BTreeMap, path::Path, str::FromStr};

use m2048_stats::{histogram::Histogram, regression::LinearFit, survival::SurvivalCurve};

use crate::{
    aggregate::{AggregationConfig, diff_by_key, mean_across_runs, smooth_buckets},
    display::DisplayConfig,
    error::AnalysisError,
    meta::RunGroup,
    metric::{MetricKind, paired_metric_buckets},
    player::{PlayerData, REFERENCE_DIR_NAME, STATE_FILE_NAME},
    record::{read_after_state_evals, read_eval_log},
    sample::Sampler,
    series::{Plot, PlotStyle, Series, SeriesPoint},
    state_log::{StateLog, survival_diff_series, survival_series},
};

/// Number of bins of the score histograms.
pub const HISTOGRAM_BINS: usize = 100;

/// The per-directory curve a line graph is made of.
#[derive(Debug, Clone, Copy)]
pub enum CurveSource<'a> {
    /// Comparison against the perfect player, bucketed by progress.
    Metric(MetricKind),
    Survival,
    /// Distance to the perfect player's survival curve.
    SurvivalDiff { reference: &'a SurvivalCurve },
}

impl CurveSource<'_> {
    #[must_use]
    pub fn y_label(&self) -> &'static str {
        match self {
            Self::Metric(metric) => metric.y_label(),
            Self::Survival => "survival rate",
            Self::SurvivalDiff { .. } => "difference in survival rate for PP",
        }
    }

    fn applies_to(&self, player: &PlayerData) -> bool {
        !matches!(self, Self::SurvivalDiff { .. }) || !player.is_reference()
    }

    pub fn curve(
        &self,
        player: &PlayerData,
        config: &AggregationConfig,
    ) -> Result<Series, AnalysisError> {
        match *self {
            Self::Metric(metric) => {
                let reference = read_eval_log(&player.reference_eval_state()?)?;
                let candidate = read_eval_log(&player.eval_file()?)?;
                let buckets = paired_metric_buckets(&reference, &candidate, metric)?;
                let points = smooth_buckets(&buckets, config.window_for(metric));
                Ok(Series::new(player.name(), points))
            }
            Self::Survival => {
                let curve = survival_curve(player, config)?;
                Ok(survival_series(player.name(), &curve))
            }
            Self::SurvivalDiff { reference } => {
                let curve = survival_curve(player, config)?;
                Ok(survival_diff_series(player.name(), &curve, reference))
            }
        }
    }
}

fn survival_curve(
    player: &PlayerData,
    config: &AggregationConfig,
) -> Result<SurvivalCurve, AnalysisError> {
    let log = StateLog::read(&player.state_file()?)?;
    if log.progresses.is_empty() {
        log::warn!("{}: no finished games in state log", player.name());
    }
    Ok(log.survival_curve(config.survival_tail))
}

/// Survival curve of the perfect player, read from `<root>/PP/state.txt`.
pub fn reference_survival(
    root: &Path,
    config: &AggregationConfig,
) -> Result<SurvivalCurve, AnalysisError> {
    let path = root.join(REFERENCE_DIR_NAME).join(STATE_FILE_NAME);
    Ok(StateLog::read(&path)?.survival_curve(config.survival_tail))
}

/// Runs `f` on every player, skipping those with missing input files.
fn for_each_available<'p, T, I, F>(
    players: I,
    mut f: F,
) -> Result<Vec<(&'p PlayerData, T)>, AnalysisError>
where
    I: IntoIterator<Item = &'p PlayerData>,
    F: FnMut(&'p PlayerData) -> Result<T, AnalysisError>,
{
    let mut results = vec![];
    for player in players {
        match f(player) {
            Ok(value) => results.push((player, value)),
            Err(e @ AnalysisError::MissingFile { .. }) => {
                log::warn!("skipping {}: {e}", player.name());
            }
            Err(e) => return Err(e),
        }
    }
    Ok(results)
}

fn curves<'p>(
    players: &'p [PlayerData],
    source: CurveSource<'_>,
    config: &AggregationConfig,
) -> Result<Vec<(&'p PlayerData, Series)>, AnalysisError> {
    for_each_available(
        players.iter().filter(|p| source.applies_to(p)),
        |p| source.curve(p, config),
    )
}

/// One curve per directory.
pub fn per_run_plot(
    players: &[PlayerData],
    source: CurveSource<'_>,
    config: &AggregationConfig,
) -> Result<Plot, AnalysisError> {
    let mut plot = Plot::new("progress", source.y_label());
    for (_, series) in curves(players, source, config)? {
        plot.push(series);
    }
    Ok(plot)
}

/// Averages the curves of each [`RunGroup`] across seeds.
///
/// Directories whose group cannot be determined are left out.
pub fn group_means(
    players: &[PlayerData],
    source: CurveSource<'_>,
    config: &AggregationConfig,
) -> Result<BTreeMap<RunGroup, Series>, AnalysisError> {
    let mut grouped = BTreeMap::<RunGroup, Vec<Series>>::new();
    for (player, series) in curves(players, source, config)? {
        match player.run_group() {
            Some(group) => grouped.entry(group).or_default().push(series),
            None => log::info!("{}: no tuple/sym metadata, left out of means", player.name()),
        }
    }
    Ok(grouped
        .into_iter()
        .map(|(group, curves)| {
            let mean = mean_across_runs(&group.mean_label(), &curves, config.align);
            (group, mean)
        })
        .filter(|(_, mean)| !mean.is_empty())
        .collect())
}

/// One averaged curve per [`RunGroup`].
pub fn mean_plot(
    players: &[PlayerData],
    source: CurveSource<'_>,
    config: &AggregationConfig,
) -> Result<Plot, AnalysisError> {
    let mut plot = Plot::new("progress", format!("{} mean", source.y_label()));
    for (_, mean) in group_means(players, source, config)? {
        plot.push(mean);
    }
    Ok(plot)
}

/// `sym - notsym` difference of the averaged curves for every tuple and stage
/// that has both variants.
pub fn symdiff_plot(
    players: &[PlayerData],
    source: CurveSource<'_>,
    config: &AggregationConfig,
) -> Result<Plot, AnalysisError> {
    let means = group_means(players, source, config)?;
    let mut plot = Plot::new("progress", format!("{} (sym - notsym)", source.y_label()))
        .with_zero_baseline();
    for (group, sym) in means.iter().filter(|(g, _)| g.sym == "sym") {
        let counterpart = RunGroup {
            sym: "notsym".to_owned(),
            ..group.clone()
        };
        match means.get(&counterpart) {
            Some(notsym) => {
                plot.push(diff_by_key(&group.symdiff_label(), sym, notsym, config.fill));
            }
            None => log::warn!("{}: no notsym counterpart", group.mean_label()),
        }
    }
    Ok(plot)
}

/// Which two directories `acc-diff` compares, and in which direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PairOrder {
    /// The first two selected directories.
    #[default]
    Input,
    /// The first `sym` directory minus the first `notsym` one.
    SymNotsym,
    /// The first `notsym` directory minus the first `sym` one.
    NotsymSym,
}

/// Error returned when parsing an unknown [`PairOrder`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown pair order '{name}', expected input, sym-notsym or notsym-sym")]
pub struct ParsePairOrderError {
    name: String,
}

impl FromStr for PairOrder {
    type Err = ParsePairOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "input" => Ok(Self::Input),
            "sym-notsym" => Ok(Self::SymNotsym),
            "notsym-sym" => Ok(Self::NotsymSym),
            _ => Err(ParsePairOrderError { name: s.to_owned() }),
        }
    }
}

impl PairOrder {
    fn pick(self, players: &[PlayerData]) -> Result<(&PlayerData, &PlayerData), AnalysisError> {
        if players.len() < 2 {
            return Err(AnalysisError::NotEnoughRuns {
                required: 2,
                found: players.len(),
            });
        }
        let input = (&players[0], &players[1]);
        let find = |sym: &str| {
            players
                .iter()
                .find(|p| p.run_group().is_some_and(|g| g.sym == sym))
        };
        let by_sym = match (find("sym"), find("notsym")) {
            (Some(sym), Some(notsym)) => Some((sym, notsym)),
            _ => None,
        };
        Ok(match (self, by_sym) {
            (Self::Input, _) => input,
            (Self::SymNotsym, Some(pair)) => pair,
            (Self::NotsymSym, Some((sym, notsym))) => (notsym, sym),
            (_, None) => {
                log::warn!("no sym/notsym pair among selected directories, using input order");
                input
            }
        })
    }
}

/// Accuracy of one directory minus accuracy of another, per progress.
pub fn accuracy_diff_plot(
    players: &[PlayerData],
    order: PairOrder,
    display: &DisplayConfig,
    config: &AggregationConfig,
) -> Result<Plot, AnalysisError> {
    let (first, second) = order.pick(players)?;
    let source = CurveSource::Metric(MetricKind::Accuracy);
    let a = source.curve(first, config)?;
    let b = source.curve(second, config)?;
    let name = format!(
        "{} - {}",
        display.label_for(first.name()),
        display.label_for(second.name())
    );
    let mut plot = Plot::new("progress", "accuracy difference").with_zero_baseline();
    plot.push(diff_by_key(&name, &a, &b, config.fill));
    Ok(plot)
}

/// Final-score distribution of every directory.
#[expect(clippy::cast_precision_loss)]
pub fn score_histograms(
    players: &[PlayerData],
) -> Result<Vec<(String, Histogram)>, AnalysisError> {
    let logs = for_each_available(players, |p| StateLog::read(&p.state_file()?))?;
    Ok(logs
        .into_iter()
        .map(|(player, log)| {
            let scores = log.scores.iter().map(|&s| s as f64);
            let histogram = Histogram::equal_width(scores, HISTOGRAM_BINS);
            (player.name().to_owned(), histogram)
        })
        .collect())
}

fn sorted_points(mut points: Vec<SeriesPoint>) -> Vec<SeriesPoint> {
    points.sort_by(|a, b| a.x.total_cmp(&b.x));
    points
}

/// Evaluation of the chosen move against progress, from a sample of each directory's records.
pub fn chosen_evals_plot(
    players: &[PlayerData],
    sampler: &mut Sampler,
) -> Result<Plot, AnalysisError> {
    let records = for_each_available(players, |p| read_eval_log(&p.eval_file()?))?;
    let mut plot = Plot::new("progress", "player").with_style(PlotStyle::Scatter);
    for (player, records) in records {
        let points = sampler
            .sample(&records)
            .into_iter()
            .map(|r| SeriesPoint::new(f64::from(r.progress), r.chosen_eval()))
            .collect();
        plot.push(Series::new(player.name(), sorted_points(points)));
    }
    Ok(plot)
}

/// A scatter graph of perfect-player against player evaluations for runs
/// sharing run name, tuple, seed and stage.
#[derive(Debug, Clone)]
pub struct ScatterPanel {
    /// Identifies the panel in output file names.
    pub name: String,
    pub plot: Plot,
    /// Least-squares fit of each series, by series name.
    pub fits: Vec<(String, LinearFit)>,
}

/// `<run>_s<seed>_NT<tuple>[_st<stage>]`, or `None` when the run name, seed
/// or tuple/sym cannot be determined.
fn scatter_panel_name(player: &PlayerData) -> Option<String> {
    let parts = player
        .rel_path()
        .iter()
        .map(|s| s.to_string_lossy())
        .collect::<Vec<_>>();
    let seed = player.meta().and_then(|m| m.seed).or_else(|| {
        parts
            .get(1)
            .and_then(|s| s.strip_prefix("seed"))
            .and_then(|s| s.parse().ok())
    })?;
    let group = player.run_group()?;
    if parts.len() < 2 {
        return None;
    }
    let stage = group.stage.map(|s| format!("_st{s}")).unwrap_or_default();
    Some(format!("{}_s{seed}_NT{}{stage}", parts[0], group.tuple))
}

fn fit_line(name: String, fit: &LinearFit, points: &[SeriesPoint]) -> Option<Series> {
    let (first, last) = (points.first()?, points.last()?);
    Some(Series::new(
        name,
        vec![
            SeriesPoint::new(first.x, fit.predict(first.x)),
            SeriesPoint::new(last.x, fit.predict(last.x)),
        ],
    ))
}

/// Perfect-player after-state evaluation (x) against the evaluation of the
/// move the player chose (y), one panel per run with `sym` and `notsym`
/// overlaid.
///
/// Directories whose run name, seed or tuple/sym cannot be determined are
/// reported and skipped.
pub fn after_state_scatter(
    players: &[PlayerData],
    sampler: &mut Sampler,
) -> Result<Vec<ScatterPanel>, AnalysisError> {
    let named = players.iter().filter(|p| {
        let known = scatter_panel_name(p).is_some();
        if !known {
            log::warn!("skipping {}: no run name, seed or tuple/sym metadata", p.name());
        }
        known
    });
    let pairs = for_each_available(named, |p| {
        let reference = read_after_state_evals(&p.reference_eval_after_state()?)?;
        let records = read_eval_log(&p.eval_file()?)?;
        if reference.len() != records.len() {
            return Err(AnalysisError::DataMismatch {
                reference: reference.len(),
                candidate: records.len(),
            });
        }
        Ok(reference
            .into_iter()
            .zip(&records)
            .map(|(x, r)| SeriesPoint::new(x, r.chosen_eval()))
            .collect::<Vec<_>>())
    })?;

    let mut panels = BTreeMap::<String, ScatterPanel>::new();
    for (player, points) in pairs {
        let points = sorted_points(sampler.sample(&points));
        let Some(name) = scatter_panel_name(player) else {
            continue;
        };
        let panel = panels.entry(name.clone()).or_insert_with(|| ScatterPanel {
            name,
            plot: Plot::new("perfect", "player").with_style(PlotStyle::Scatter),
            fits: vec![],
        });
        let xs = points.iter().map(|p| p.x).collect::<Vec<_>>();
        let ys = points.iter().map(|p| p.y).collect::<Vec<_>>();
        if let Some(fit) = LinearFit::least_squares(&xs, &ys) {
            if let Some(line) = fit_line(format!("{} fit", player.name()), &fit, &points) {
                panel.plot.lines.push(line);
            }
            panel.fits.push((player.name().to_owned(), fit));
        }
        panel.plot.push(Series::new(player.name(), points));
    }

    for panel in panels.values_mut() {
        let xs = panel.plot.series.iter().flat_map(Series::xs);
        let (min, max) = xs.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
            (lo.min(x), hi.max(x))
        });
        if min < max {
            panel.plot.lines.push(Series::new(
                "y = x",
                vec![SeriesPoint::new(min, min), SeriesPoint::new(max, max)],
            ));
        }
    }
    Ok(panels.into_values().collect())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    struct Board {
        root: tempfile::TempDir,
    }

    impl Board {
        fn new() -> Self {
            Self {
                root: tempfile::tempdir().unwrap(),
            }
        }

        fn dir(&self, rel: &str, meta: Option<&str>) -> PlayerData {
            let dir = self.root.path().join(rel);
            fs::create_dir_all(&dir).unwrap();
            if let Some(meta) = meta {
                fs::write(dir.join("meta.json"), meta).unwrap();
            }
            PlayerData::new(self.root.path(), &dir)
        }

        fn write(&self, rel: &str, contents: &str) {
            let path = self.root.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, contents).unwrap();
        }
    }

    fn eval_lines(rows: &[([f64; 4], u32)]) -> String {
        rows.iter()
            .map(|(e, p)| format!("{} {} {} {} {p}\n", e[0], e[1], e[2], e[3]))
            .collect()
    }

    #[test]
    fn test_accuracy_curve_against_reference() {
        let board = Board::new();
        let rows = (0..20)
            .map(|i| ([1.0, 0.0, 0.0, 0.0], i))
            .collect::<Vec<_>>();
        board.write("a/eval-state.txt", &eval_lines(&rows));
        board.write("a/eval.txt", &eval_lines(&rows));
        let players = vec![board.dir("a", None), board.dir("missing", None)];

        let config = AggregationConfig::default();
        let plot = per_run_plot(&players, CurveSource::Metric(MetricKind::Accuracy), &config)
            .unwrap();
        assert_eq!(plot.y_label, "accuracy");
        assert_eq!(plot.series.len(), 1);
        let series = &plot.series[0];
        assert_eq!(series.name, "a");
        // 20 buckets smoothed with a window of 10
        assert_eq!(series.len(), 11);
        assert_eq!(series.points[0], SeriesPoint::new(4.5, 1.0));
    }

    #[test]
    fn test_mismatch_aborts() {
        let board = Board::new();
        board.write("a/eval-state.txt", &eval_lines(&[([1.0, 0.0, 0.0, 0.0], 0)]));
        board.write("a/eval.txt", "");
        let players = vec![board.dir("a", None)];
        let err = per_run_plot(
            &players,
            CurveSource::Metric(MetricKind::AbsoluteError),
            &AggregationConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::DataMismatch { .. }));
    }

    #[test]
    fn test_survival_means_and_symdiff() {
        let board = Board::new();
        board.write("r/seed1/NT6_sym/state.txt", "progress: 2\nprogress: 2\n");
        board.write("r/seed2/NT6_sym/state.txt", "progress: 4\nprogress: 4\n");
        board.write("r/seed1/NT6_notsym/state.txt", "progress: 1\nprogress: 1\n");
        let players = vec![
            board.dir("r/seed1/NT6_sym", None),
            board.dir("r/seed2/NT6_sym", None),
            board.dir("r/seed1/NT6_notsym", None),
        ];
        let config = AggregationConfig {
            survival_tail: 0,
            ..AggregationConfig::default()
        };

        let plot = mean_plot(&players, CurveSource::Survival, &config).unwrap();
        let names = plot.series.iter().map(|s| s.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["NT6_notsym_mean", "NT6_sym_mean"]);
        // Intersection of domains 0..2 and 0..4
        assert_eq!(plot.series[1].ys().collect::<Vec<_>>(), vec![1.0, 1.0]);

        let plot = symdiff_plot(&players, CurveSource::Survival, &config).unwrap();
        assert!(plot.zero_baseline);
        assert_eq!(plot.series.len(), 1);
        assert_eq!(plot.series[0].name, "NT6_sym-notsym");
        // sym mean [1, 1] minus notsym [1], missing key filled with zero
        assert_eq!(plot.series[0].ys().collect::<Vec<_>>(), vec![0.0, 1.0]);
    }

    #[test]
    fn test_survival_diff_skips_reference() {
        let board = Board::new();
        board.write("PP/state.txt", "progress: 3\n");
        board.write("a/state.txt", "progress: 1\n");
        let players = vec![board.dir("PP", None), board.dir("a", None)];
        let config = AggregationConfig::default();
        let reference = reference_survival(board.root.path(), &config).unwrap();
        let source = CurveSource::SurvivalDiff {
            reference: &reference,
        };
        let plot = per_run_plot(&players, source, &config).unwrap();
        assert_eq!(plot.series.len(), 1);
        assert_eq!(plot.series[0].name, "a");
        assert_eq!(&plot.series[0].ys().collect::<Vec<_>>()[..3], &[0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_accuracy_diff_order_and_minimum() {
        let board = Board::new();
        let good = eval_lines(&[([1.0, 0.0, 0.0, 0.0], 0)]);
        let bad = eval_lines(&[([0.0, 1.0, 0.0, 0.0], 0)]);
        for (dir, eval) in [("notsym", &bad), ("sym", &good)] {
            board.write(&format!("{dir}/eval-state.txt"), &good);
            board.write(&format!("{dir}/eval.txt"), eval);
        }
        let players = vec![
            board.dir("notsym", Some(r#"{"tuple": 6, "sym": "notsym", "seed": 1}"#)),
            board.dir("sym", Some(r#"{"tuple": 6, "sym": "sym", "seed": 1}"#)),
        ];
        let config = AggregationConfig {
            window: Some(1),
            ..AggregationConfig::default()
        };
        let display = DisplayConfig::default();

        let plot = accuracy_diff_plot(&players, PairOrder::Input, &display, &config).unwrap();
        assert_eq!(plot.series[0].name, "notsym - sym");
        assert_eq!(plot.series[0].points, vec![SeriesPoint::new(0.0, -1.0)]);

        let plot = accuracy_diff_plot(&players, PairOrder::SymNotsym, &display, &config).unwrap();
        assert_eq!(plot.series[0].points, vec![SeriesPoint::new(0.0, 1.0)]);

        let err =
            accuracy_diff_plot(&players[..1], PairOrder::Input, &display, &config).unwrap_err();
        assert!(matches!(err, AnalysisError::NotEnoughRuns { found: 1, .. }));
    }

    #[test]
    fn test_parse_pair_order() {
        assert_eq!("input".parse(), Ok(PairOrder::Input));
        assert_eq!("sym-notsym".parse(), Ok(PairOrder::SymNotsym));
        assert_eq!("notsym-sym".parse(), Ok(PairOrder::NotsymSym));
        assert!("sym".parse::<PairOrder>().is_err());
    }

    #[test]
    fn test_histograms_and_evals() {
        let board = Board::new();
        board.write("a/state.txt", "score: 10\nscore: 20\nscore: 30\n");
        board.write(
            "a/eval.txt",
            &eval_lines(&[([1.0, 5.0, 0.0, 0.0], 3), ([2.0, 0.0, 0.0, 0.0], 1)]),
        );
        let players = vec![board.dir("a", None)];

        let histograms = score_histograms(&players).unwrap();
        assert_eq!(histograms.len(), 1);
        assert_eq!(histograms[0].1.bins.len(), HISTOGRAM_BINS);
        assert_eq!(histograms[0].1.total(), 3);

        let plot = chosen_evals_plot(&players, &mut Sampler::new(1000, Some(0))).unwrap();
        assert_eq!(
            plot.series[0].points,
            vec![SeriesPoint::new(1.0, 2.0), SeriesPoint::new(3.0, 5.0)]
        );
    }

    #[test]
    fn test_scatter_overlays_sym_variants() {
        let board = Board::new();
        let evals = eval_lines(&[
            ([1.0, 0.0, 0.0, 0.0], 0),
            ([2.0, 0.0, 0.0, 0.0], 1),
            ([3.0, 0.0, 0.0, 0.0], 2),
        ]);
        for sym in ["sym", "notsym"] {
            let rel = format!("run/seed4/NT6_{sym}");
            board.write(&format!("{rel}/eval.txt"), &evals);
            board.write(&format!("{rel}/eval-after-state.txt"), "2\n4\n6\n");
        }
        let players = vec![
            board.dir("run/seed4/NT6_sym", None),
            board.dir("run/seed4/NT6_notsym", None),
        ];
        let panels = after_state_scatter(&players, &mut Sampler::new(1500, Some(0))).unwrap();
        assert_eq!(panels.len(), 1);
        let panel = &panels[0];
        assert_eq!(panel.name, "run_s4_NT6");
        assert_eq!(panel.plot.series.len(), 2);
        assert_eq!(panel.fits.len(), 2);
        assert!((panel.fits[0].1.slope - 0.5).abs() < 1e-12);
        // Two fit lines and the identity line
        assert_eq!(panel.plot.lines.len(), 3);
    }

    #[test]
    fn test_scatter_skips_unplaced_directories() {
        let board = Board::new();
        let evals = eval_lines(&[([1.0, 0.0, 0.0, 0.0], 0), ([2.0, 0.0, 0.0, 0.0], 1)]);
        for rel in ["run/seed4/NT6_sym", "loose", "run/seed4/misc"] {
            board.write(&format!("{rel}/eval.txt"), &evals);
            board.write(&format!("{rel}/eval-after-state.txt"), "1\n2\n");
        }
        let players = vec![
            board.dir("run/seed4/NT6_sym", None),
            board.dir("loose", Some(r#"{"tuple": 6, "sym": "sym", "seed": 1}"#)),
            board.dir("run/seed4/misc", None),
        ];
        let panels = after_state_scatter(&players, &mut Sampler::new(1500, Some(0))).unwrap();
        assert_eq!(panels.len(), 1);
        assert_eq!(panels[0].name, "run_s4_NT6");
        let names = panels[0].plot.series.iter().map(|s| s.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["run__seed4__NT6_sym"]);
    }
}
