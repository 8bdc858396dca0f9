//! Complete tile patterns recorded in board-log CSV files.

use std::{cmp::Reverse, collections::BTreeMap, path::Path};

use csv::StringRecord;

use crate::{
    error::{AnalysisError, MalformedRow, column_index, open_csv},
    series::{Series, SeriesPoint},
};

pub const CELL_COUNT: usize = 9;

/// Tile exponents of the nine cells, `tile0` to `tile8`.
pub type TileState = [u32; CELL_COUNT];

/// The board searched for when no pattern is given explicitly.
pub const FIXED_BOARD: TileState = [0, 1, 2, 0, 0, 1, 0, 0, 0];

/// Parses a comma-separated list of nine tile values.
pub fn parse_tile_state(s: &str) -> Result<TileState, MalformedRow> {
    let values = s
        .split(',')
        .map(|v| v.trim().parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| MalformedRow::new(format!("invalid tile value in '{s}': {e}")))?;
    values.try_into().map_err(|values: Vec<u32>| {
        MalformedRow::new(format!(
            "expected {CELL_COUNT} tiles, found {}",
            values.len()
        ))
    })
}

#[must_use]
pub fn format_state(state: &TileState) -> String {
    state
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Number of rows per distinct tile pattern in one board log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileCounts {
    pub counts: BTreeMap<TileState, u64>,
    pub rows: u64,
}

impl TileCounts {
    /// Reads the `tile0..tile8` columns of a board-log CSV.
    pub fn read(path: &Path) -> Result<Self, AnalysisError> {
        let csv_err = |source| AnalysisError::Csv {
            path: path.to_owned(),
            source,
        };
        let mut reader = open_csv("board log", path)?;
        let headers = reader.headers().map_err(csv_err)?.clone();
        let columns = tile_columns(&headers, path)?;

        let mut counts = Self::default();
        for (line, row) in reader.records().enumerate() {
            let row = row.map_err(csv_err)?;
            let Some(state) = tiles_of(&row, &columns) else {
                log::warn!("{}: row {}: invalid tile value, skipped", path.display(), line + 2);
                continue;
            };
            counts.rows += 1;
            *counts.counts.entry(state).or_default() += 1;
        }
        Ok(counts)
    }

    #[must_use]
    pub fn count_of(&self, state: &TileState) -> u64 {
        self.counts.get(state).copied().unwrap_or(0)
    }
}

fn tile_columns(headers: &StringRecord, path: &Path) -> Result<[usize; CELL_COUNT], AnalysisError> {
    let mut columns = [0; CELL_COUNT];
    for (i, col) in columns.iter_mut().enumerate() {
        *col = column_index(headers, &format!("tile{i}"), path)?;
    }
    Ok(columns)
}

fn tiles_of(row: &StringRecord, columns: &[usize; CELL_COUNT]) -> Option<TileState> {
    let mut state = [0; CELL_COUNT];
    for (&col, tile) in columns.iter().zip(&mut state) {
        *tile = row.get(col)?.trim().parse().ok()?;
    }
    Some(state)
}

/// Rows matching `pattern` per group of `group_size` consecutive game ids,
/// read from the `game_id` and `tile0..tile8` columns of a board log.
///
/// Game ids start at 1, so games `1..=group_size` form group 0. Groups
/// without a match are absent.
pub fn pattern_frequency(
    path: &Path,
    pattern: &TileState,
    group_size: u64,
) -> Result<BTreeMap<u64, u64>, AnalysisError> {
    let csv_err = |source| AnalysisError::Csv {
        path: path.to_owned(),
        source,
    };
    let mut reader = open_csv("board log", path)?;
    let headers = reader.headers().map_err(csv_err)?.clone();
    let game_column = column_index(&headers, "game_id", path)?;
    let columns = tile_columns(&headers, path)?;

    let mut groups = BTreeMap::new();
    for (line, row) in reader.records().enumerate() {
        let row = row.map_err(csv_err)?;
        let game_id = row
            .get(game_column)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|&id| id > 0);
        let (Some(game_id), Some(state)) = (game_id, tiles_of(&row, &columns)) else {
            log::warn!(
                "{}: row {}: invalid game id or tile value, skipped",
                path.display(),
                line + 2
            );
            continue;
        };
        if state != *pattern {
            continue;
        }
        if let Some(group) = (game_id - 1).checked_div(group_size) {
            *groups.entry(group).or_default() += 1;
        }
    }
    Ok(groups)
}

/// Counts of groups `0..=last_group` as a series, missing groups as zero.
///
/// Each point sits at the last game id of its group.
///
/// ```
/// # use std::collections::BTreeMap;
/// # use m2048_analysis::tiles::group_series;
/// let series = group_series("sym", &BTreeMap::from([(1, 4)]), 2, 100);
/// assert_eq!(series.xs().collect::<Vec<_>>(), [100.0, 200.0, 300.0]);
/// assert_eq!(series.ys().collect::<Vec<_>>(), [0.0, 4.0, 0.0]);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn group_series(
    name: &str,
    groups: &BTreeMap<u64, u64>,
    last_group: u64,
    group_size: u64,
) -> Series {
    let points = (0..=last_group)
        .map(|g| {
            let count = groups.get(&g).copied().unwrap_or(0);
            SeriesPoint::new(((g + 1) * group_size) as f64, count as f64)
        })
        .collect();
    Series::new(name, points)
}

/// Patterns present in both logs, with the smaller of the two counts,
/// ordered by count descending and then by pattern.
#[must_use]
pub fn shared_patterns(a: &TileCounts, b: &TileCounts, top: usize) -> Vec<(TileState, u64)> {
    let mut shared = a
        .counts
        .iter()
        .filter_map(|(state, &count_a)| {
            let count_b = b.counts.get(state)?;
            Some((*state, count_a.min(*count_b)))
        })
        .collect::<Vec<_>>();
    shared.sort_by_key(|&(state, count)| (Reverse(count), state));
    shared.truncate(top);
    shared
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const HEADER: &str = "turn,tile0,tile1,tile2,tile3,tile4,tile5,tile6,tile7,tile8\n";

    fn write_log(dir: &Path, name: &str, rows: &[&str]) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut body = HEADER.to_owned();
        for row in rows {
            body.push_str(row);
            body.push('\n');
        }
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_parse_and_format_state() {
        let state = parse_tile_state("0, 1,2,0,0,1,0,0,0").unwrap();
        assert_eq!(state, FIXED_BOARD);
        assert_eq!(format_state(&state), "0,1,2,0,0,1,0,0,0");
        assert_eq!(format_state(&[11, 0, 0, 0, 0, 0, 0, 0, 3]), "11,0,0,0,0,0,0,0,3");
        assert!(parse_tile_state("0,1,2").is_err());
        assert!(parse_tile_state("0,1,2,0,0,1,0,0,x").is_err());
    }

    #[test]
    fn test_shared_patterns() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_log(
            dir.path(),
            "a.csv",
            &[
                "1,0,1,2,0,0,1,0,0,0",
                "2,0,1,2,0,0,1,0,0,0",
                "3,0,1,2,0,0,1,0,0,0",
                "4,1,1,1,1,1,1,1,1,1",
                "5,2,2,2,2,2,2,2,2,2",
                "6,bad,2,2,2,2,2,2,2,2",
            ],
        );
        let b = write_log(
            dir.path(),
            "b.csv",
            &[
                "1,0,1,2,0,0,1,0,0,0",
                "2,0,1,2,0,0,1,0,0,0",
                "3,1,1,1,1,1,1,1,1,1",
                "4,1,1,1,1,1,1,1,1,1",
                "5,3,3,3,3,3,3,3,3,3",
            ],
        );
        let a = TileCounts::read(&a).unwrap();
        let b = TileCounts::read(&b).unwrap();
        assert_eq!(a.rows, 5);
        assert_eq!(a.count_of(&FIXED_BOARD), 3);
        assert_eq!(b.count_of(&[9; CELL_COUNT]), 0);

        let shared = shared_patterns(&a, &b, 10);
        assert_eq!(shared, vec![(FIXED_BOARD, 2), ([1; CELL_COUNT], 1)]);
        assert_eq!(shared_patterns(&a, &b, 1).len(), 1);
    }

    #[test]
    fn test_pattern_frequency_by_game_group() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board_log.csv");
        fs::write(
            &path,
            "game_id,tile0,tile1,tile2,tile3,tile4,tile5,tile6,tile7,tile8\n\
             1,0,1,2,0,0,1,0,0,0\n\
             2,0,1,2,0,0,1,0,0,0\n\
             2,1,1,1,1,1,1,1,1,1\n\
             5,0,1,2,0,0,1,0,0,0\n\
             0,0,1,2,0,0,1,0,0,0\n\
             x,0,1,2,0,0,1,0,0,0\n\
             7,0,1,2,0,0,1,0,0,x\n",
        )
        .unwrap();

        let groups = pattern_frequency(&path, &FIXED_BOARD, 2).unwrap();
        assert_eq!(groups, BTreeMap::from([(0, 2), (2, 1)]));
        let groups = pattern_frequency(&path, &FIXED_BOARD, 1000).unwrap();
        assert_eq!(groups, BTreeMap::from([(0, 3)]));
        assert!(pattern_frequency(&path, &FIXED_BOARD, 0).unwrap().is_empty());

        let series = group_series("a", &BTreeMap::from([(0, 2), (2, 1)]), 3, 2);
        assert_eq!(series.ys().collect::<Vec<_>>(), [2.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_pattern_frequency_requires_game_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_log(dir.path(), "a.csv", &["1,0,1,2,0,0,1,0,0,0"]);
        assert!(matches!(
            pattern_frequency(&path, &FIXED_BOARD, 10),
            Err(AnalysisError::MissingColumn { column, .. }) if column == "game_id"
        ));
    }

    #[test]
    fn test_missing_tile_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.csv");
        fs::write(&path, "tile0,tile1\n0,1\n").unwrap();
        assert!(matches!(
            TileCounts::read(&path),
            Err(AnalysisError::MissingColumn { column, .. }) if column == "tile2"
        ));
    }
}
