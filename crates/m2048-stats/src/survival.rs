/// Survival-rate curve built from the progress values at which games ended.
///
/// The curve is a step function over integer progress values: the rate at
/// progress `i` is the fraction of recorded games whose ending progress is
/// strictly greater than `i`, i.e. games that are still running after `i`.
/// It starts at or below 1.0 and is non-increasing.
///
/// The domain covers `0..max_ending + tail`, so plots show the drop to zero
/// followed by a short flat tail.
#[derive(Debug, Clone, PartialEq)]
pub struct SurvivalCurve {
    /// Survival rate at progress `0, 1, 2, ...`.
    pub rates: Vec<f64>,
    /// Number of game endings the curve was built from.
    pub total: usize,
}

impl SurvivalCurve {
    /// Builds a survival curve from game-ending progress values.
    ///
    /// # Arguments
    ///
    /// * `endings` - Progress value at which each game ended
    /// * `tail` - Number of extra points emitted past the largest ending
    ///
    /// # Examples
    ///
    /// ```
    /// # use m2048_stats::survival::SurvivalCurve;
    /// let curve = SurvivalCurve::from_endings([1, 1, 2, 3], 10);
    /// assert_eq!(&curve.rates[..4], &[1.0, 0.5, 0.25, 0.0]);
    /// assert_eq!(curve.rates.len(), 13);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_endings<I>(endings: I, tail: usize) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let endings = endings.into_iter().collect::<Vec<_>>();
        let Some(&max_ending) = endings.iter().max() else {
            return Self {
                rates: vec![],
                total: 0,
            };
        };

        let mut dropped = vec![0_usize; max_ending + 1];
        for &ending in &endings {
            dropped[ending] += 1;
        }

        let total = endings.len();
        let mut remaining = total;
        let rates = (0..max_ending + tail)
            .map(|progress| {
                remaining -= dropped.get(progress).copied().unwrap_or(0);
                remaining as f64 / total as f64
            })
            .collect();

        Self { rates, total }
    }

    /// Returns the survival rate at a specific progress value.
    ///
    /// Past the end of the recorded domain every game has ended, so the rate
    /// is `0.0`. An empty curve has no recorded endings and reports `1.0`.
    ///
    /// ```
    /// # use m2048_stats::survival::SurvivalCurve;
    /// let curve = SurvivalCurve::from_endings([2, 4], 0);
    /// assert_eq!(curve.rate_at(3), 0.5);
    /// assert_eq!(curve.rate_at(100), 0.0);
    /// ```
    #[must_use]
    pub fn rate_at(&self, progress: usize) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.rates.get(progress).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
