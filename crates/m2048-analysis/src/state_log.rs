//! Game-state logs: `state.txt` and `after-state.txt`.

use std::{path::Path, str::FromStr, sync::LazyLock};

use m2048_stats::survival::SurvivalCurve;
use regex::Regex;

use crate::{
    error::{AnalysisError, read_text},
    series::{Series, SeriesPoint},
};

static PROGRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"progress: (\d+)").expect("valid regex"));
static SCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"score: (\d+)").expect("valid regex"));
static GAMEOVER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"gameover_turn: \d+; game: \d+; progress: (\d+); score: \d+")
        .expect("valid regex")
});

fn captured_numbers<'a, T>(re: &'a Regex, text: &'a str) -> impl Iterator<Item = T> + 'a
where
    T: FromStr + 'a,
{
    re.captures_iter(text)
        .filter_map(|caps| caps[1].parse().ok())
}

/// Every `progress: <n>` value in a state log, in order of appearance.
#[must_use]
pub fn parse_progresses(text: &str) -> Vec<usize> {
    captured_numbers(&PROGRESS, text).collect()
}

/// Every `score: <n>` value in a state log, in order of appearance.
#[must_use]
pub fn parse_scores(text: &str) -> Vec<u64> {
    captured_numbers(&SCORE, text).collect()
}

/// Progress of every completed game in an after-state log.
#[must_use]
pub fn parse_gameover_progresses(text: &str) -> Vec<usize> {
    text.lines()
        .flat_map(|line| captured_numbers(&GAMEOVER, line).take(1))
        .collect()
}

/// Game endings and final scores read from a `state.txt`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateLog {
    pub progresses: Vec<usize>,
    pub scores: Vec<u64>,
}

impl StateLog {
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self {
            progresses: parse_progresses(text),
            scores: parse_scores(text),
        }
    }

    pub fn read(path: &Path) -> Result<Self, AnalysisError> {
        let text = read_text("state log", path)?;
        Ok(Self::parse(&text))
    }

    #[must_use]
    pub fn survival_curve(&self, tail: usize) -> SurvivalCurve {
        SurvivalCurve::from_endings(self.progresses.iter().copied(), tail)
    }
}

/// Converts a survival curve into a series over integer progress values.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn survival_series(name: &str, curve: &SurvivalCurve) -> Series {
    let points = curve
        .rates
        .iter()
        .enumerate()
        .map(|(i, &rate)| SeriesPoint::new(i as f64, rate))
        .collect();
    Series::new(name, points)
}

/// Absolute difference between a survival curve and the reference curve.
///
/// The domain is that of `curve`; past the end of the reference domain the
/// reference rate is zero.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn survival_diff_series(
    name: &str,
    curve: &SurvivalCurve,
    reference: &SurvivalCurve,
) -> Series {
    let points = curve
        .rates
        .iter()
        .enumerate()
        .map(|(i, &rate)| SeriesPoint::new(i as f64, (rate - reference.rate_at(i)).abs()))
        .collect();
    Series::new(name, points)
}
