//! Per-record comparison of a player against the perfect-player reference.

use std::collections::BTreeMap;

use crate::{error::AnalysisError, record::EvalRecord};

/// Evaluations at or below this value mark illegal or terminal moves.
pub const INVALID_EVAL_SENTINEL: f64 = -1e5;

/// A scalar computed from one reference record and the matching candidate record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Accuracy,
    AbsoluteError,
    RelativeError,
}

impl MetricKind {
    /// Smoothing window applied to the bucketed curve of this metric.
    #[must_use]
    pub fn default_window(self) -> usize {
        match self {
            Self::Accuracy => 10,
            Self::AbsoluteError | Self::RelativeError => 5,
        }
    }

    #[must_use]
    pub fn y_label(self) -> &'static str {
        match self {
            Self::Accuracy => "accuracy",
            Self::AbsoluteError => "abs error",
            Self::RelativeError => "rel error",
        }
    }

    #[must_use]
    pub fn compute(self, reference: &EvalRecord, candidate: &EvalRecord) -> f64 {
        match self {
            Self::Accuracy => accuracy(reference, candidate),
            Self::AbsoluteError => absolute_error(reference, candidate),
            Self::RelativeError => relative_error(reference, candidate),
        }
    }
}

/// Fraction of the candidate's best moves that are also best moves of the reference.
///
/// ```
/// # use m2048_analysis::{metric::accuracy, record::EvalRecord};
/// let reference = EvalRecord { evals: [1.0, 3.0, 3.0, 0.0], progress: 0 };
/// let candidate = EvalRecord { evals: [0.0, 2.0, 0.0, 2.0], progress: 0 };
/// assert_eq!(accuracy(&reference, &candidate), 0.5);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn accuracy(reference: &EvalRecord, candidate: &EvalRecord) -> f64 {
    let reference_best = reference.best_move_indices();
    let candidate_best = candidate.best_move_indices();
    let common = candidate_best
        .iter()
        .filter(|i| reference_best.contains(i))
        .count();
    common as f64 / candidate_best.len() as f64
}

/// Reference evaluation of the candidate's chosen move minus the reference's best evaluation.
///
/// Always zero or negative.
#[must_use]
pub fn absolute_error(reference: &EvalRecord, candidate: &EvalRecord) -> f64 {
    reference.evals[candidate.chosen_move()] - reference.chosen_eval()
}

/// [`absolute_error`] normalized by the spread between the reference's best
/// evaluation and its worst valid one.
///
/// Evaluations at or below [`INVALID_EVAL_SENTINEL`] are ignored when
/// finding the worst evaluation. When there is no spread, or no valid
/// evaluation at all, the relative error is zero.
#[expect(clippy::float_cmp)]
#[must_use]
pub fn relative_error(reference: &EvalRecord, candidate: &EvalRecord) -> f64 {
    let Some(floor) = reference
        .evals
        .iter()
        .copied()
        .filter(|&e| e > INVALID_EVAL_SENTINEL)
        .min_by(f64::total_cmp)
    else {
        return 0.0;
    };
    let best = reference.chosen_eval();
    if best == floor {
        return 0.0;
    }
    absolute_error(reference, candidate) / (best - floor)
}

/// Computes `metric` for every record pair and collects the values per
/// reference progress.
///
/// The two logs must describe the same decision points, so a difference in
/// record count is an [`AnalysisError::DataMismatch`].
pub fn paired_metric_buckets(
    reference: &[EvalRecord],
    candidate: &[EvalRecord],
    metric: MetricKind,
) -> Result<BTreeMap<u32, f64>, AnalysisError> {
    if reference.len() != candidate.len() {
        return Err(AnalysisError::DataMismatch {
            reference: reference.len(),
            candidate: candidate.len(),
        });
    }
    Ok(crate::aggregate::bucket_and_average(
        reference.iter().zip(candidate),
        |(r, _)| r.progress,
        |(r, c)| metric.compute(r, c),
    ))
}
