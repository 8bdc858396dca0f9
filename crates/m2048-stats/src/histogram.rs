use std::ops::Range;

/// A histogram representation of a dataset's distribution.
///
/// The data range `[min, max]` is divided into bins of equal width. Every bin
/// is half-open except the last, which also includes `max`.
#[derive(Debug, Clone)]
pub struct Histogram {
    /// The bins comprising the histogram, in ascending order.
    pub bins: Vec<HistogramBin>,
}

/// A single bin in a histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    /// The range of values covered by this bin.
    pub range: Range<f64>,
    /// The number of values that fall within this bin.
    pub count: u64,
}

impl HistogramBin {
    #[must_use]
    pub fn center(&self) -> f64 {
        f64::midpoint(self.range.start, self.range.end)
    }
}

impl Histogram {
    /// Creates an equal-width histogram.
    ///
    /// When all values are identical the range is widened to `value ± 0.5`
    /// so the bins still have a positive width.
    ///
    /// # Examples
    ///
    /// ```
    /// # use m2048_stats::histogram::Histogram;
    /// let histogram = Histogram::equal_width([0.0, 1.0, 2.0, 3.0, 4.0], 2);
    /// assert_eq!(histogram.bins.len(), 2);
    /// assert_eq!(histogram.bins[0].count, 2);
    /// assert_eq!(histogram.bins[1].count, 3);
    /// ```
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    #[must_use]
    pub fn equal_width<I>(values: I, num_bins: usize) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let values = values.into_iter().collect::<Vec<_>>();
        if values.is_empty() || num_bins == 0 {
            return Self { bins: vec![] };
        }

        let mut min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let mut max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max - min < f64::EPSILON {
            min -= 0.5;
            max += 0.5;
        }
        let width = (max - min) / num_bins as f64;

        let mut bins = (0..num_bins)
            .map(|i| HistogramBin {
                range: (min + i as f64 * width)..(min + (i + 1) as f64 * width),
                count: 0,
            })
            .collect::<Vec<_>>();

        for value in values {
            let idx = (((value - min) / width).floor() as usize).min(num_bins - 1);
            bins[idx].count += 1;
        }

        Self { bins }
    }

    /// Total number of values counted.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|b| b.count).sum()
    }
}
