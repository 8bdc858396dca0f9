use std::{path::Path, str::FromStr, sync::LazyLock};

use arrayvec::ArrayVec;
use regex::Regex;

use crate::error::{AnalysisError, MalformedRow, read_text};

/// Number of candidate moves evaluated at each decision point.
pub const MOVE_COUNT: usize = 4;

/// Game-summary lines interleaved with the per-move records.
static GAME_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*game").expect("valid regex"));

/// One decision point of a game: the evaluation of every candidate move and
/// the game progress at which the decision was made.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalRecord {
    pub evals: [f64; MOVE_COUNT],
    pub progress: u32,
}

impl EvalRecord {
    /// Indices of every move attaining the maximum evaluation, ties included.
    ///
    /// The result is never empty and is in ascending order. Records built by
    /// parsing only hold finite evaluations; otherwise a NaN evaluation
    /// counts as best only when every evaluation is NaN.
    ///
    /// ```
    /// # use m2048_analysis::record::EvalRecord;
    /// let record = EvalRecord { evals: [1.0, 5.0, 1.0, 5.0], progress: 3 };
    /// assert_eq!(record.best_move_indices().as_slice(), &[1, 3]);
    /// ```
    #[expect(clippy::float_cmp)]
    #[must_use]
    pub fn best_move_indices(&self) -> ArrayVec<usize, MOVE_COUNT> {
        let max = self.best_eval();
        self.evals
            .iter()
            .enumerate()
            .filter(|&(_, &e)| e == max || e.total_cmp(&max).is_eq())
            .map(|(i, _)| i)
            .collect()
    }

    /// Index of the move the player actually chose (the first best move).
    #[must_use]
    pub fn chosen_move(&self) -> usize {
        self.best_move_indices()[0]
    }

    #[must_use]
    pub fn best_eval(&self) -> f64 {
        self.evals.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Evaluation of the chosen move.
    #[must_use]
    pub fn chosen_eval(&self) -> f64 {
        self.evals[self.chosen_move()]
    }
}

impl FromStr for EvalRecord {
    type Err = MalformedRow;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut fields = line.split_whitespace();
        let mut evals = [0.0; MOVE_COUNT];
        for (i, slot) in evals.iter_mut().enumerate() {
            let field = fields
                .next()
                .ok_or_else(|| MalformedRow::new(format!("missing evaluation #{i}")))?;
            *slot = field
                .parse::<f64>()
                .ok()
                .filter(|e| e.is_finite())
                .ok_or_else(|| MalformedRow::new(format!("invalid evaluation '{field}'")))?;
        }
        let field = fields
            .next()
            .ok_or_else(|| MalformedRow::new("missing progress"))?;
        let progress = field
            .parse::<f64>()
            .map_err(|_| MalformedRow::new(format!("invalid progress '{field}'")))?;
        if progress.is_nan() || progress < 0.0 || progress > f64::from(u32::MAX) {
            return Err(MalformedRow::new(format!(
                "progress out of range '{field}'"
            )));
        }
        #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let progress = progress.trunc() as u32;
        Ok(Self { evals, progress })
    }
}

fn data_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty() && !GAME_LINE.is_match(line))
        .map(|(i, line)| (i + 1, line))
}

/// Parses the text of an evaluation log.
///
/// Game-summary lines and blank lines are dropped. Lines that fail to parse
/// are reported with a warning and skipped.
#[must_use]
pub fn parse_eval_log(text: &str, origin: &Path) -> Vec<EvalRecord> {
    data_lines(text)
        .filter_map(|(lineno, line)| match line.parse() {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("{}:{lineno}: {e}, skipped", origin.display());
                None
            }
        })
        .collect()
}

/// Reads and parses an evaluation log (`eval.txt`, `eval-state.txt`).
pub fn read_eval_log(path: &Path) -> Result<Vec<EvalRecord>, AnalysisError> {
    let text = read_text("evaluation log", path)?;
    Ok(parse_eval_log(&text, path))
}

/// Parses an after-state evaluation log: a single evaluation per line.
#[must_use]
pub fn parse_after_state_evals(text: &str, origin: &Path) -> Vec<f64> {
    data_lines(text)
        .filter_map(|(lineno, line)| {
            let field = line.split_whitespace().next().unwrap_or_default();
            match field.parse::<f64>() {
                Ok(v) if v.is_finite() => Some(v),
                _ => {
                    log::warn!(
                        "{}:{lineno}: invalid after-state evaluation '{field}', skipped",
                        origin.display()
                    );
                    None
                }
            }
        })
        .collect()
}

pub fn read_after_state_evals(path: &Path) -> Result<Vec<f64>, AnalysisError> {
    let text = read_text("after-state evaluation log", path)?;
    Ok(parse_after_state_evals(&text, path))
}
