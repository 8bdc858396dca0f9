//! Bucketing, smoothing and cross-run combination of progress curves.
//!
//! The functions here turn flat per-record measurements into curves:
//!
//! 1. [`bucket_and_average`] groups values by an integer key and averages them.
//! 2. [`smooth_buckets`] applies a moving average to the bucket keys and means.
//! 3. [`mean_across_runs`] averages several curves describing the same
//!    configuration, and [`diff_by_key`] subtracts one curve from another.
//!
//! Every option is carried by an explicit [`AggregationConfig`].

use std::{cmp::Ordering, collections::BTreeMap};

use m2048_stats::smoothing::moving_average;

use crate::{
    metric::MetricKind,
    series::{Series, SeriesPoint},
};

/// How [`mean_across_runs`] lines up curves with different x values.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum AlignPolicy {
    /// Truncate every curve to the shortest one and average point by point,
    /// ignoring x values.
    Positional,
    /// Average only the x values present in every curve.
    #[default]
    Intersection,
    /// Average every x value over the curves that contain it.
    Union,
}

/// How [`diff_by_key`] treats an x value present on only one side.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum FillPolicy {
    /// The missing side contributes zero.
    #[default]
    Zero,
    /// The x value is dropped.
    Skip,
}

/// Options threaded through every aggregation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationConfig {
    /// Smoothing window overriding the per-metric default.
    pub window: Option<usize>,
    pub align: AlignPolicy,
    pub fill: FillPolicy,
    /// Number of points emitted past the last game ending on survival curves.
    pub survival_tail: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            window: None,
            align: AlignPolicy::default(),
            fill: FillPolicy::default(),
            survival_tail: 10,
        }
    }
}

impl AggregationConfig {
    #[must_use]
    pub fn window_for(&self, metric: MetricKind) -> usize {
        self.window.unwrap_or_else(|| metric.default_window())
    }
}

/// Groups items by `key_fn`, applies `metric_fn` to each and averages per group.
///
/// The returned map iterates in ascending key order with no duplicates.
///
/// # Examples
///
/// ```
/// # use m2048_analysis::aggregate::bucket_and_average;
/// let buckets = bucket_and_average([(2, 1.0), (1, 4.0), (2, 3.0)], |&(k, _)| k, |&(_, v)| v);
/// assert_eq!(buckets.into_iter().collect::<Vec<_>>(), vec![(1, 4.0), (2, 2.0)]);
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn bucket_and_average<I, T, K, KF, MF>(items: I, key_fn: KF, metric_fn: MF) -> BTreeMap<K, f64>
where
    I: IntoIterator<Item = T>,
    K: Ord,
    KF: Fn(&T) -> K,
    MF: Fn(&T) -> f64,
{
    let mut sums = BTreeMap::<K, (f64, usize)>::new();
    for item in items {
        let entry = sums.entry(key_fn(&item)).or_default();
        entry.0 += metric_fn(&item);
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(key, (sum, count))| (key, sum / count as f64))
        .collect()
}

/// Smooths a bucketed curve by applying the same moving average to its keys
/// and to its means.
///
/// The result has `max(0, len - window + 1)` points.
#[must_use]
pub fn smooth_buckets(buckets: &BTreeMap<u32, f64>, window: usize) -> Vec<SeriesPoint> {
    let keys = buckets.keys().map(|&k| f64::from(k)).collect::<Vec<_>>();
    let values = buckets.values().copied().collect::<Vec<_>>();
    let xs = moving_average(&keys, window);
    let ys = moving_average(&values, window);
    xs.into_iter()
        .zip(ys)
        .map(|(x, y)| SeriesPoint::new(x, y))
        .collect()
}

/// An `f64` usable as a map key, ordered by [`f64::total_cmp`].
#[derive(Debug, Clone, Copy)]
pub struct XKey(pub f64);

impl PartialEq for XKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for XKey {}

impl PartialOrd for XKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for XKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

fn keyed(series: &Series) -> BTreeMap<XKey, f64> {
    series.points.iter().map(|p| (XKey(p.x), p.y)).collect()
}

/// Averages several curves into one.
///
/// With [`AlignPolicy::Positional`] the curves are truncated to the shortest
/// one and both x and y are averaged by index. The keyed policies join the
/// curves on their x values instead. Within one curve x values are assumed to
/// be unique.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean_across_runs(name: &str, curves: &[Series], align: AlignPolicy) -> Series {
    if curves.is_empty() {
        return Series::new(name, vec![]);
    }
    let n = curves.len() as f64;

    let points = match align {
        AlignPolicy::Positional => {
            let min_len = curves.iter().map(Series::len).min().unwrap_or(0);
            (0..min_len)
                .map(|i| {
                    let (sx, sy) = curves.iter().fold((0.0, 0.0), |(sx, sy), c| {
                        (sx + c.points[i].x, sy + c.points[i].y)
                    });
                    SeriesPoint::new(sx / n, sy / n)
                })
                .collect()
        }
        AlignPolicy::Intersection | AlignPolicy::Union => {
            let mut sums = BTreeMap::<XKey, (f64, usize)>::new();
            for curve in curves {
                for (x, y) in keyed(curve) {
                    let entry = sums.entry(x).or_default();
                    entry.0 += y;
                    entry.1 += 1;
                }
            }
            sums.into_iter()
                .filter(|(_, (_, count))| align == AlignPolicy::Union || *count == curves.len())
                .map(|(XKey(x), (sum, count))| SeriesPoint::new(x, sum / count as f64))
                .collect()
        }
    };
    Series::new(name, points)
}

/// Computes `a - b` over the sorted union of their x values.
///
/// ```
/// # use m2048_analysis::{aggregate::{diff_by_key, FillPolicy}, series::Series};
/// let a = Series::from_xy("a", &[1.0, 2.0], &[5.0, 5.0]);
/// let b = Series::from_xy("b", &[2.0, 3.0], &[1.0, 1.0]);
/// let zero = diff_by_key("a-b", &a, &b, FillPolicy::Zero);
/// assert_eq!(zero.ys().collect::<Vec<_>>(), vec![5.0, 4.0, -1.0]);
/// let skip = diff_by_key("a-b", &a, &b, FillPolicy::Skip);
/// assert_eq!(skip.xs().collect::<Vec<_>>(), vec![2.0]);
/// ```
#[must_use]
pub fn diff_by_key(name: &str, a: &Series, b: &Series, fill: FillPolicy) -> Series {
    let a = keyed(a);
    let b = keyed(b);
    let mut keys = a.keys().chain(b.keys()).copied().collect::<Vec<_>>();
    keys.sort();
    keys.dedup();

    let points = keys
        .into_iter()
        .filter_map(|key| {
            let (ya, yb) = match (a.get(&key), b.get(&key), fill) {
                (Some(&ya), Some(&yb), _) => (ya, yb),
                (Some(&ya), None, FillPolicy::Zero) => (ya, 0.0),
                (None, Some(&yb), FillPolicy::Zero) => (0.0, yb),
                _ => return None,
            };
            Some(SeriesPoint::new(key.0, ya - yb))
        })
        .collect();
    Series::new(name, points)
}
