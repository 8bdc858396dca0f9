//! Logs written by the n-tuple training programs.
//!
//! - `log_score.csv`: average score per training count, one file per seed
//! - the training console log: `game <id> finished with score <score>` lines
//! - learning-rate logs: error ratio per update count

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use m2048_stats::descriptive::DescriptiveStats;
use regex::Regex;
use walkdir::WalkDir;

use crate::{
    error::{AnalysisError, column_index, open_csv, read_text},
    series::{Series, SeriesPoint},
};

pub const SCORE_LOG_FILE_NAME: &str = "log_score.csv";

static FINISHED_GAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"game\s+(\d+)\s+finished\s+with\s+score\s+(\d+)").expect("valid regex")
});

fn csv_error(path: &Path) -> impl Fn(csv::Error) -> AnalysisError + '_ {
    move |source| AnalysisError::Csv {
        path: path.to_owned(),
        source,
    }
}

/// Reads `(traincount_total, avg_score)` pairs from a `log_score.csv`.
///
/// Training counts may be written as floats and are truncated.
pub fn read_score_log(path: &Path) -> Result<Vec<(u64, f64)>, AnalysisError> {
    let mut reader = open_csv("score log", path)?;
    let headers = reader.headers().map_err(csv_error(path))?.clone();
    let x_col = column_index(&headers, "traincount_total", path)?;
    let y_col = column_index(&headers, "avg_score", path)?;

    let mut points = vec![];
    for (i, row) in reader.records().enumerate() {
        let row = row.map_err(csv_error(path))?;
        let x = row.get(x_col).and_then(|v| v.trim().parse::<f64>().ok());
        let y = row.get(y_col).and_then(|v| v.trim().parse::<f64>().ok());
        match (x, y) {
            (Some(x), Some(y)) if x >= 0.0 => {
                #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                points.push((x as u64, y));
            }
            _ => log::warn!("{}: row {}: invalid score entry, skipped", path.display(), i + 2),
        }
    }
    Ok(points)
}

/// Finds `<dat_root>/<run_name>/seed*/NT*_*/log_score.csv`, keyed by the
/// `NT<tuple>_<sym>` directory name.
pub fn find_score_logs(
    dat_root: &Path,
    run_name: &str,
) -> Result<Vec<(String, PathBuf)>, AnalysisError> {
    let run_dir = dat_root.join(run_name);
    if !run_dir.is_dir() {
        return Ok(vec![]);
    }
    let mut logs = vec![];
    for entry in WalkDir::new(&run_dir)
        .min_depth(2)
        .max_depth(2)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| AnalysisError::Io {
            path: e.path().unwrap_or(&run_dir).to_owned(),
            source: e.into(),
        })?;
        let name = entry.file_name().to_string_lossy();
        let parent_is_seed = entry
            .path()
            .parent()
            .and_then(Path::file_name)
            .is_some_and(|p| p.to_string_lossy().starts_with("seed"));
        let path = entry.path().join(SCORE_LOG_FILE_NAME);
        if entry.file_type().is_dir()
            && parent_is_seed
            && name.starts_with("NT")
            && name.contains('_')
            && path.is_file()
        {
            logs.push((name.into_owned(), path));
        }
    }
    Ok(logs)
}

/// Mean and spread across seeds of the score at each training count.
#[derive(Debug, Clone)]
pub struct ScoreCurve {
    pub name: String,
    pub points: Vec<(u64, DescriptiveStats)>,
}

/// Collects the score logs of one run and aggregates them per tuple/sym variant.
///
/// Unreadable logs are reported and skipped.
pub fn load_score_curves(dat_root: &Path, run_name: &str) -> Result<Vec<ScoreCurve>, AnalysisError> {
    let mut by_name = BTreeMap::<String, BTreeMap<u64, Vec<f64>>>::new();
    for (name, path) in find_score_logs(dat_root, run_name)? {
        let points = match read_score_log(&path) {
            Ok(points) => points,
            Err(e @ (AnalysisError::MissingColumn { .. } | AnalysisError::Csv { .. })) => {
                log::warn!("skipping {}: {e}", path.display());
                continue;
            }
            Err(e) => return Err(e),
        };
        let by_x = by_name.entry(name).or_default();
        for (x, y) in points {
            by_x.entry(x).or_default().push(y);
        }
    }
    Ok(by_name
        .into_iter()
        .map(|(name, by_x)| ScoreCurve {
            name,
            points: by_x
                .into_iter()
                .filter_map(|(x, ys)| Some((x, DescriptiveStats::new(ys)?)))
                .collect(),
        })
        .collect())
}

/// Parses `game <id> finished with score <score>` lines.
///
/// A game id appearing twice keeps its last score.
#[must_use]
pub fn parse_finished_games(text: &str) -> BTreeMap<u64, u64> {
    FINISHED_GAME
        .captures_iter(text)
        .filter_map(|caps| Some((caps[1].parse().ok()?, caps[2].parse().ok()?)))
        .collect()
}

pub fn read_finished_games(path: &Path) -> Result<BTreeMap<u64, u64>, AnalysisError> {
    Ok(parse_finished_games(&read_text("training log", path)?))
}

/// Average score over one interval of game ids.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalAverage {
    pub start_game: u64,
    pub end_game: u64,
    pub avg_score: f64,
    pub count: usize,
}

/// Averages scores over consecutive intervals of `scope` game ids starting at 1.
///
/// Only complete intervals are emitted, and intervals without any finished
/// game are left out.
///
/// ```
/// # use std::collections::BTreeMap;
/// # use m2048_analysis::training_log::interval_averages;
/// let scores = BTreeMap::from([(1, 10), (2, 30), (3, 50), (5, 7)]);
/// let rows = interval_averages(&scores, 2);
/// assert_eq!(rows.len(), 2);
/// assert_eq!((rows[0].start_game, rows[0].end_game, rows[0].avg_score), (1, 2, 20.0));
/// assert_eq!((rows[1].start_game, rows[1].count), (3, 1));
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn interval_averages(scores: &BTreeMap<u64, u64>, scope: u64) -> Vec<IntervalAverage> {
    let Some(&max_game) = scores.keys().next_back() else {
        return vec![];
    };
    if scope == 0 {
        return vec![];
    }
    (1..=max_game / scope)
        .filter_map(|k| {
            let (start_game, end_game) = ((k - 1) * scope + 1, k * scope);
            let interval = scores.range(start_game..=end_game);
            let count = interval.clone().count();
            if count == 0 {
                return None;
            }
            let sum = interval.map(|(_, &s)| s as f64).sum::<f64>();
            Some(IntervalAverage {
                start_game,
                end_game,
                avg_score: sum / count as f64,
                count,
            })
        })
        .collect()
}

/// Interval averages as a series placed at the last game id of each interval.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn interval_series(name: &str, rows: &[IntervalAverage]) -> Series {
    let points = rows
        .iter()
        .map(|row| SeriesPoint::new(row.end_game as f64, row.avg_score))
        .collect();
    Series::new(name, points)
}

/// Writes interval averages as `start_game,end_game,avg_score,count`.
pub fn write_interval_csv(rows: &[IntervalAverage], path: &Path) -> Result<(), AnalysisError> {
    let mut writer = csv::Writer::from_path(path).map_err(csv_error(path))?;
    writer
        .write_record(["start_game", "end_game", "avg_score", "count"])
        .map_err(csv_error(path))?;
    for row in rows {
        writer
            .write_record([
                row.start_game.to_string(),
                row.end_game.to_string(),
                format!("{:.6}", row.avg_score),
                row.count.to_string(),
            ])
            .map_err(csv_error(path))?;
    }
    writer.flush().map_err(|source| AnalysisError::Io {
        path: path.to_owned(),
        source,
    })
}

/// Column layout of a learning-rate log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearningLogSchema {
    /// `updatecounts`, `err`, `aerr`
    PerUpdate,
    /// `uc_sum`, `err_avg`, `aerr_avg`
    Averaged,
}

impl LearningLogSchema {
    fn columns(self) -> [&'static str; 3] {
        match self {
            Self::PerUpdate => ["updatecounts", "err", "aerr"],
            Self::Averaged => ["uc_sum", "err_avg", "aerr_avg"],
        }
    }

    fn detect(headers: &csv::StringRecord) -> Option<Self> {
        [Self::PerUpdate, Self::Averaged].into_iter().find(|schema| {
            schema
                .columns()
                .iter()
                .all(|c| headers.iter().any(|h| h.trim() == *c))
        })
    }
}

/// Reads `err / aerr` against update count from a learning-rate log.
///
/// Rows with `aerr == 0` carry no ratio and are skipped. Points are sorted by
/// update count.
pub fn read_learning_curve(path: &Path) -> Result<Vec<SeriesPoint>, AnalysisError> {
    let mut reader = open_csv("learning-rate log", path)?;
    let headers = reader.headers().map_err(csv_error(path))?.clone();
    let schema = LearningLogSchema::detect(&headers).ok_or_else(|| AnalysisError::MissingColumn {
        path: path.to_owned(),
        column: "updatecounts/err/aerr or uc_sum/err_avg/aerr_avg".to_owned(),
    })?;
    let [x_col, err_col, aerr_col] = schema
        .columns()
        .map(|c| column_index(&headers, c, path));
    let (x_col, err_col, aerr_col) = (x_col?, err_col?, aerr_col?);

    let mut points = vec![];
    for (i, row) in reader.records().enumerate() {
        let row = row.map_err(csv_error(path))?;
        let field = |col: usize| row.get(col).and_then(|v| v.trim().parse::<f64>().ok());
        match (field(x_col), field(err_col), field(aerr_col)) {
            (Some(_), Some(_), Some(aerr)) if aerr == 0.0 => {}
            (Some(x), Some(err), Some(aerr)) => points.push(SeriesPoint::new(x, err / aerr)),
            _ => log::warn!("{}: row {}: invalid learning-rate entry, skipped", path.display(), i + 2),
        }
    }
    points.sort_by(|a, b| a.x.total_cmp(&b.x));
    Ok(points)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_score_log_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SCORE_LOG_FILE_NAME);
        fs::write(
            &path,
            "traincount_total,avg_score,other\n1000.0,12.5,x\nbad,1,x\n2000.7,20,x\n",
        )
        .unwrap();
        assert_eq!(read_score_log(&path).unwrap(), vec![(1000, 12.5), (2000, 20.0)]);

        fs::write(&path, "count,avg_score\n1,2\n").unwrap();
        assert!(matches!(
            read_score_log(&path),
            Err(AnalysisError::MissingColumn { column, .. }) if column == "traincount_total"
        ));
    }

    #[test]
    fn test_score_curves_across_seeds() {
        let root = tempfile::tempdir().unwrap();
        let write = |rel: &str, body: &str| {
            let path = root.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, body).unwrap();
        };
        write("run/seed1/NT6_sym/log_score.csv", "traincount_total,avg_score\n1,10\n2,20\n");
        write("run/seed2/NT6_sym/log_score.csv", "traincount_total,avg_score\n1,30\n");
        write("run/seed1/NT4_notsym/log_score.csv", "traincount_total,avg_score\n1,5\n");
        write("run/other/NT6_sym/log_score.csv", "traincount_total,avg_score\n1,99\n");
        write("run/seed1/misc/log_score.csv", "traincount_total,avg_score\n1,99\n");

        let curves = load_score_curves(root.path(), "run").unwrap();
        let names = curves.iter().map(|c| c.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["NT4_notsym", "NT6_sym"]);
        let nt6 = &curves[1];
        assert_eq!(nt6.points.len(), 2);
        let (x, stats) = &nt6.points[0];
        assert_eq!(*x, 1);
        assert_eq!(stats.mean, 20.0);
        assert!((stats.std_dev - 200.0_f64.sqrt()).abs() < 1e-9);
        assert_eq!(nt6.points[1].1.std_dev, 0.0);

        assert!(load_score_curves(root.path(), "missing").unwrap().is_empty());
    }

    #[test]
    fn test_finished_games_and_intervals() {
        let text = "\
game 1 finished with score 100
noise
game 2  finished  with  score 300
game 2 finished with score 200
game 4 finished with score 50
game 5 finished with score 70
";
        let scores = parse_finished_games(text);
        assert_eq!(scores.len(), 4);
        assert_eq!(scores[&2], 200);

        let rows = interval_averages(&scores, 2);
        assert_eq!(
            rows,
            vec![
                IntervalAverage {
                    start_game: 1,
                    end_game: 2,
                    avg_score: 150.0,
                    count: 2
                },
                IntervalAverage {
                    start_game: 3,
                    end_game: 4,
                    avg_score: 50.0,
                    count: 1
                },
            ]
        );
        assert!(interval_averages(&BTreeMap::new(), 2).is_empty());
    }

    #[test]
    fn test_interval_series() {
        let scores = parse_finished_games(
            "game 1 finished with score 10\n\
             game 2 finished with score 30\n\
             game 4 finished with score 8\n\
             game 5 finished with score 99\n",
        );
        let series = interval_series("sym", &interval_averages(&scores, 2));
        assert_eq!(series.name, "sym");
        assert_eq!(
            series.points,
            vec![SeriesPoint::new(2.0, 20.0), SeriesPoint::new(4.0, 8.0)]
        );
    }

    #[test]
    fn test_interval_csv_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let rows = [IntervalAverage {
            start_game: 1,
            end_game: 3,
            avg_score: 10.0 / 3.0,
            count: 3,
        }];
        write_interval_csv(&rows, &path).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "start_game,end_game,avg_score,count\n1,3,3.333333,3\n"
        );
    }

    #[test]
    fn test_learning_curve_schemas() {
        let dir = tempfile::tempdir().unwrap();
        let per_update = dir.path().join("sym.csv");
        fs::write(&per_update, "updatecounts,err,aerr\n2,1,4\n1,3,0\n3,2,4\n").unwrap();
        let points = read_learning_curve(&per_update).unwrap();
        assert_eq!(
            points,
            vec![SeriesPoint::new(2.0, 0.25), SeriesPoint::new(3.0, 0.5)]
        );

        let averaged = dir.path().join("notsym.csv");
        fs::write(&averaged, "uc_sum,err_avg,aerr_avg\n1.5,1,2\n").unwrap();
        let points = read_learning_curve(&averaged).unwrap();
        assert_eq!(points, vec![SeriesPoint::new(1.5, 0.5)]);

        let unknown = dir.path().join("unknown.csv");
        fs::write(&unknown, "a,b\n1,2\n").unwrap();
        assert!(matches!(
            read_learning_curve(&unknown),
            Err(AnalysisError::MissingColumn { .. })
        ));
    }
}
