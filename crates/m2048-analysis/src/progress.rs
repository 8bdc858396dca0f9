//! Average game-over progress per player, pooled across seeds.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use m2048_stats::descriptive::DescriptiveStats;
use regex::Regex;

use crate::{
    error::{AnalysisError, read_text},
    player::AFTER_STATE_FILE_NAME,
    state_log::parse_gameover_progresses,
};

static SEED_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_seed\d+$").expect("valid regex"));

/// Directory name with a trailing `_seed<N>` removed.
///
/// ```
/// # use std::path::Path;
/// # use m2048_analysis::progress::group_name;
/// assert_eq!(group_name(Path::new("out/NT6_sym_seed3")), "NT6_sym");
/// assert_eq!(group_name(Path::new("out/NT6_sym")), "NT6_sym");
/// ```
#[must_use]
pub fn group_name(dir: &Path) -> String {
    let name = dir
        .file_name()
        .map_or_else(|| dir.to_string_lossy(), |n| n.to_string_lossy());
    SEED_SUFFIX.replace(&name, "").into_owned()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSummary {
    pub name: String,
    pub stats: DescriptiveStats,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressReport {
    /// Groups sorted by mean progress, best first.
    pub summaries: Vec<ProgressSummary>,
    /// Directories whose after-state log is missing or has no finished game.
    pub empty_dirs: Vec<PathBuf>,
}

/// Pools the game-over progress of `dirs` by [`group_name`].
pub fn summarize_progress(dirs: &[PathBuf]) -> Result<ProgressReport, AnalysisError> {
    let mut groups = BTreeMap::<String, Vec<f64>>::new();
    let mut empty_dirs = vec![];
    for dir in dirs {
        let path = dir.join(AFTER_STATE_FILE_NAME);
        let progresses = match read_text("after-state log", &path) {
            Ok(text) => parse_gameover_progresses(&text),
            Err(AnalysisError::MissingFile { .. }) => vec![],
            Err(e) => return Err(e),
        };
        if progresses.is_empty() {
            empty_dirs.push(dir.clone());
            continue;
        }
        #[expect(clippy::cast_precision_loss)]
        groups
            .entry(group_name(dir))
            .or_default()
            .extend(progresses.into_iter().map(|p| p as f64));
    }

    let mut summaries = groups
        .into_iter()
        .filter_map(|(name, values)| {
            Some(ProgressSummary {
                name,
                stats: DescriptiveStats::new(values)?,
            })
        })
        .collect::<Vec<_>>();
    summaries.sort_by(|a, b| b.stats.mean.total_cmp(&a.stats.mean));
    Ok(ProgressReport {
        summaries,
        empty_dirs,
    })
}
