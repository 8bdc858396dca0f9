/// Summary of a sample, such as the game-over progress of a player or the
/// scores of several seeds at one training step.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Mean of the two middle values for even counts.
    pub median: f64,
    /// Sample standard deviation (`n - 1` denominator), zero for a single value.
    pub std_dev: f64,
}

impl DescriptiveStats {
    /// Summarizes `values` in any order. Returns `None` for an empty sample.
    ///
    /// ```
    /// # use m2048_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([30.0, 10.0]).unwrap();
    /// assert_eq!((stats.min, stats.max), (10.0, 30.0));
    /// assert_eq!(stats.median, 20.0);
    /// assert!((stats.std_dev - 200.0_f64.sqrt()).abs() < 1e-9);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// Same as [`DescriptiveStats::new`] for values already in ascending order.
    ///
    /// # Panics
    ///
    /// Panics if `sorted` is not in ascending order.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted: &[f64]) -> Option<Self> {
        assert!(sorted.is_sorted_by(|a, b| a <= b), "values must be sorted");

        let (&min, &max) = (sorted.first()?, sorted.last()?);
        let count = sorted.len();
        let n = count as f64;
        let mean = sorted.iter().sum::<f64>() / n;

        let mid = count / 2;
        let median = if count % 2 == 0 {
            f64::midpoint(sorted[mid - 1], sorted[mid])
        } else {
            sorted[mid]
        };

        let std_dev = if count < 2 {
            0.0
        } else {
            let variance = sorted
                .iter()
                .map(|v| (v - mean).powi(2))
                .sum::<f64>()
                / (n - 1.0);
            variance.sqrt()
        };

        Some(Self {
            count,
            min,
            max,
            mean,
            median,
            std_dev,
        })
    }
}

/// Arithmetic mean of `values`, or `None` when empty.
///
/// ```
/// # use m2048_stats::descriptive::mean;
/// assert_eq!(mean(&[1.0, 2.0, 6.0]), Some(3.0));
/// assert_eq!(mean(&[]), None);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
