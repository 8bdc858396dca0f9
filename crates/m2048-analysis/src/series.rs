/// One plotted sample after aggregation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub x: f64,
    pub y: f64,
}

impl SeriesPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A named curve whose x values are non-decreasing.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<SeriesPoint>,
}

impl Series {
    pub fn new(name: impl Into<String>, points: Vec<SeriesPoint>) -> Self {
        let series = Self {
            name: name.into(),
            points,
        };
        debug_assert!(
            series.points.is_sorted_by(|a, b| a.x <= b.x),
            "series x values must be non-decreasing"
        );
        series
    }

    /// Builds a series from parallel x and y slices, truncating to the shorter one.
    pub fn from_xy(name: impl Into<String>, xs: &[f64], ys: &[f64]) -> Self {
        let points = xs
            .iter()
            .zip(ys)
            .map(|(&x, &y)| SeriesPoint::new(x, y))
            .collect();
        Self::new(name, points)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn xs(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.x)
    }

    pub fn ys(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.y)
    }
}

/// How a plot's series should be drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlotStyle {
    #[default]
    Line,
    Scatter,
}

/// A set of series sharing axis labels, ready to be rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Plot {
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
    pub style: PlotStyle,
    /// Reference lines drawn dashed on top of the series, such as fitted lines.
    pub lines: Vec<Series>,
    /// Draw a dashed horizontal reference line at `y = 0`.
    pub zero_baseline: bool,
}

impl Plot {
    pub fn new(x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        Self {
            x_label: x_label.into(),
            y_label: y_label.into(),
            series: vec![],
            style: PlotStyle::Line,
            lines: vec![],
            zero_baseline: false,
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: PlotStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_zero_baseline(mut self) -> Self {
        self.zero_baseline = true;
        self
    }

    pub fn push(&mut self, series: Series) {
        self.series.push(series);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(Series::is_empty)
    }
}
