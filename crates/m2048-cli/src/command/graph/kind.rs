use m2048_analysis::metric::MetricKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum GraphKind {
    Acc,
    AccMean,
    AccDiff,
    ErrAbs,
    ErrAbsMean,
    ErrRel,
    ErrRelMean,
    Surv,
    SurvMean,
    SurvDiff,
    SurvDiffMean,
    Hist,
    Evals,
    Scatter,
}

/// What a line graph plots for each directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineSource {
    Metric(MetricKind),
    Survival,
    SurvivalDiff,
}

impl GraphKind {
    /// File stem used when no output name is given.
    pub(crate) fn default_stem(self) -> &'static str {
        match self {
            Self::Acc => "accuracy",
            Self::AccMean => "accuracy_mean",
            Self::AccDiff => "acc-diff",
            Self::ErrAbs => "error_abs",
            Self::ErrAbsMean => "error_abs_mean",
            Self::ErrRel => "error_rel",
            Self::ErrRelMean => "error_rel_mean",
            Self::Surv => "survival",
            Self::SurvMean => "survival_mean",
            Self::SurvDiff => "survival-diff",
            Self::SurvDiffMean => "survival-diff-mean",
            Self::Hist => "histogram",
            Self::Evals => "evals",
            Self::Scatter => "scatter",
        }
    }

    /// Whether the perfect player's own directory takes part.
    pub(crate) fn includes_reference(self) -> bool {
        matches!(self, Self::Surv | Self::SurvDiff | Self::Hist | Self::Evals)
    }

    pub(crate) fn is_mean(self) -> bool {
        matches!(
            self,
            Self::AccMean | Self::ErrAbsMean | Self::ErrRelMean | Self::SurvMean | Self::SurvDiffMean
        )
    }

    /// The curve source of line graphs other than `acc-diff`.
    pub(crate) fn line_source(self) -> Option<LineSource> {
        let source = match self {
            Self::Acc | Self::AccMean => LineSource::Metric(MetricKind::Accuracy),
            Self::ErrAbs | Self::ErrAbsMean => LineSource::Metric(MetricKind::AbsoluteError),
            Self::ErrRel | Self::ErrRelMean => LineSource::Metric(MetricKind::RelativeError),
            Self::Surv | Self::SurvMean => LineSource::Survival,
            Self::SurvDiff | Self::SurvDiffMean => LineSource::SurvivalDiff,
            Self::AccDiff | Self::Hist | Self::Evals | Self::Scatter => return None,
        };
        Some(source)
    }
}
