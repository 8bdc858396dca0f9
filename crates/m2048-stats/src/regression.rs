/// A straight line `y = slope * x + intercept` fitted by ordinary least squares.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Fits a line through paired samples.
    ///
    /// Returns `None` when fewer than two pairs are given, when the slices
    /// differ in length, or when every `x` is identical.
    ///
    /// # Examples
    ///
    /// ```
    /// # use m2048_stats::regression::LinearFit;
    /// let fit = LinearFit::least_squares(&[0.0, 1.0, 2.0], &[1.0, 3.0, 5.0]).unwrap();
    /// assert!((fit.slope - 2.0).abs() < 1e-12);
    /// assert!((fit.intercept - 1.0).abs() < 1e-12);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn least_squares(xs: &[f64], ys: &[f64]) -> Option<Self> {
        if xs.len() != ys.len() || xs.len() < 2 {
            return None;
        }
        let n = xs.len() as f64;
        let mean_x = xs.iter().sum::<f64>() / n;
        let mean_y = ys.iter().sum::<f64>() / n;

        let (sxy, sxx) = xs
            .iter()
            .zip(ys)
            .fold((0.0, 0.0), |(sxy, sxx), (x, y)| {
                let dx = x - mean_x;
                (sxy + dx * (y - mean_y), sxx + dx * dx)
            });
        if sxx.abs() < f64::EPSILON {
            return None;
        }

        let slope = sxy / sxx;
        Some(Self {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }

    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}
