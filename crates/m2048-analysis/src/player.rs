//! Player data directories under a board-data root.
//!
//! Each directory holds the logs of one player run: `state.txt`, `eval.txt`
//! and optionally `meta.json` plus perfect-player evaluations of the same
//! positions. The perfect player's own directory is named [`REFERENCE_DIR_NAME`].

use std::{
    cell::OnceCell,
    collections::BTreeSet,
    fs, io,
    path::{Component, Path, PathBuf},
};

use regex::Regex;
use walkdir::WalkDir;

use crate::{
    display::DisplayConfig,
    error::AnalysisError,
    meta::{Meta, RunGroup},
};

pub const REFERENCE_DIR_NAME: &str = "PP";
pub const STATE_FILE_NAME: &str = "state.txt";
pub const AFTER_STATE_FILE_NAME: &str = "after-state.txt";
pub const EVAL_FILE_NAME: &str = "eval.txt";
pub const EVAL_STATE_FILE_NAME: &str = "eval-state.txt";
pub const EVAL_AFTER_STATE_FILE_NAME: &str = "eval-after-state.txt";

/// Joins the components of a relative path with `__` so it can be used as a
/// flat file name or map key.
///
/// ```
/// # use std::path::Path;
/// # use m2048_analysis::player::make_safe_name;
/// assert_eq!(make_safe_name(Path::new("run1/seed3/NT6_sym")), "run1__seed3__NT6_sym");
/// assert_eq!(make_safe_name(Path::new("PP")), "PP");
/// ```
#[must_use]
pub fn make_safe_name(rel_path: &Path) -> String {
    rel_path
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("__")
}

/// Lists candidate data directories below `root`.
///
/// Without `recursive` these are the immediate subdirectories. With it,
/// every directory containing an `eval.txt` at any depth. A missing root
/// yields no directories. The result is sorted by path.
pub fn discover_data_dirs(root: &Path, recursive: bool) -> Result<Vec<PathBuf>, AnalysisError> {
    if !root.exists() {
        return Ok(vec![]);
    }
    let io_err = |path: &Path, source: io::Error| AnalysisError::Io {
        path: path.to_owned(),
        source,
    };

    if recursive {
        let mut dirs = BTreeSet::new();
        for entry in WalkDir::new(root) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_owned();
                io_err(&path, e.into())
            })?;
            if entry.file_type().is_file()
                && entry.file_name() == EVAL_FILE_NAME
                && let Some(parent) = entry.path().parent()
            {
                dirs.insert(parent.to_owned());
            }
        }
        return Ok(dirs.into_iter().collect());
    }

    let mut dirs = vec![];
    for entry in fs::read_dir(root).map_err(|e| io_err(root, e))? {
        let entry = entry.map_err(|e| io_err(root, e))?;
        if entry.path().is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// One player run directory.
#[derive(Debug)]
pub struct PlayerData {
    root: PathBuf,
    dir: PathBuf,
    rel_path: PathBuf,
    safe_name: String,
    meta: OnceCell<Option<Meta>>,
}

impl PlayerData {
    /// Creates the handle for `dir`, a directory below the board-data `root`.
    #[must_use]
    pub fn new(root: &Path, dir: &Path) -> Self {
        let rel_path = dir
            .strip_prefix(root)
            .map_or_else(|_| PathBuf::from(dir.file_name().unwrap_or_default()), Path::to_owned);
        let safe_name = make_safe_name(&rel_path);
        Self {
            root: root.to_owned(),
            dir: dir.to_owned(),
            rel_path,
            safe_name,
            meta: OnceCell::new(),
        }
    }

    /// Unique key of this directory in plots and the display config.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.safe_name
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn rel_path(&self) -> &Path {
        &self.rel_path
    }

    /// Whether this is the perfect player's own directory (or lies below it).
    #[must_use]
    pub fn is_reference(&self) -> bool {
        self.rel_path
            .components()
            .next()
            .is_some_and(|c| c.as_os_str() == REFERENCE_DIR_NAME)
    }

    fn existing(&self, kind: &'static str, path: PathBuf) -> Result<PathBuf, AnalysisError> {
        if path.is_file() {
            Ok(path)
        } else {
            Err(AnalysisError::MissingFile { kind, path })
        }
    }

    pub fn state_file(&self) -> Result<PathBuf, AnalysisError> {
        self.existing("state log", self.dir.join(STATE_FILE_NAME))
    }

    pub fn eval_file(&self) -> Result<PathBuf, AnalysisError> {
        self.existing("evaluation log", self.dir.join(EVAL_FILE_NAME))
    }

    /// `after-state.txt`, which records the progress of each finished game.
    pub fn after_state_file(&self) -> Result<PathBuf, AnalysisError> {
        self.existing("after-state log", self.dir.join(AFTER_STATE_FILE_NAME))
    }

    /// Perfect-player evaluation of the positions in `eval.txt`.
    ///
    /// A copy inside the directory wins over `PP/eval-state-<name>.txt`.
    pub fn reference_eval_state(&self) -> Result<PathBuf, AnalysisError> {
        self.reference_file(EVAL_STATE_FILE_NAME, "eval-state")
    }

    /// Perfect-player evaluation of the after-states chosen by this player.
    pub fn reference_eval_after_state(&self) -> Result<PathBuf, AnalysisError> {
        self.reference_file(EVAL_AFTER_STATE_FILE_NAME, "eval-after-state")
    }

    fn reference_file(&self, local: &str, stem: &str) -> Result<PathBuf, AnalysisError> {
        let local = self.dir.join(local);
        if local.is_file() {
            return Ok(local);
        }
        let shared = self
            .root
            .join(REFERENCE_DIR_NAME)
            .join(format!("{stem}-{}.txt", self.safe_name));
        self.existing("perfect-player evaluation", shared)
    }

    /// The directory's `meta.json`, loaded on first access.
    ///
    /// An unreadable file is reported once and treated as absent.
    pub fn meta(&self) -> Option<&Meta> {
        self.meta
            .get_or_init(|| {
                Meta::read(&self.dir).unwrap_or_else(|e| {
                    log::warn!("ignoring metadata of {}: {e}", self.dir.display());
                    None
                })
            })
            .as_ref()
    }

    /// Group used by the averaged graphs, from metadata or the directory layout.
    #[must_use]
    pub fn run_group(&self) -> Option<RunGroup> {
        self.meta()
            .and_then(Meta::run_group)
            .or_else(|| RunGroup::from_rel_path(&self.rel_path))
    }

    /// Label derived from metadata, or `PP` for the reference directory.
    #[must_use]
    pub fn meta_label(&self) -> Option<String> {
        match self.meta() {
            Some(meta) => meta.label(),
            None if self.dir.file_name().is_some_and(|n| n == REFERENCE_DIR_NAME) => {
                Some(REFERENCE_DIR_NAME.to_owned())
            }
            None => None,
        }
    }

    /// Label used when the display config has none: [`Self::meta_label`] or the relative path.
    #[must_use]
    pub fn default_label(&self) -> String {
        self.meta_label()
            .unwrap_or_else(|| self.rel_path.to_string_lossy().into_owned())
    }
}

/// Restricts directories by metadata. Empty lists accept any value.
#[derive(Debug, Clone, Default)]
pub struct MetaFilter {
    pub seeds: Vec<u64>,
    pub stages: Vec<u32>,
    pub tuples: Vec<u32>,
    pub sym: Option<String>,
}

impl MetaFilter {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
            && self.stages.is_empty()
            && self.tuples.is_empty()
            && self.sym.is_none()
    }

    /// Directories without metadata only pass an empty filter.
    #[must_use]
    pub fn matches(&self, meta: Option<&Meta>) -> bool {
        fn accepts<T: PartialEq>(allowed: &[T], value: Option<&T>) -> bool {
            allowed.is_empty() || value.is_some_and(|v| allowed.contains(v))
        }

        if self.is_empty() {
            return true;
        }
        let Some(meta) = meta else {
            return false;
        };
        accepts(&self.seeds, meta.seed.as_ref())
            && accepts(&self.stages, meta.stage.as_ref())
            && accepts(&self.tuples, meta.tuple.as_ref())
            && self.sym.as_ref().is_none_or(|sym| meta.sym.as_ref() == Some(sym))
    }
}

/// Selects which discovered directories take part in a graph.
#[derive(Debug, Clone, Default)]
pub struct DirFilter {
    /// Only paths matching one of these patterns are kept. Empty keeps all.
    pub intersection: Vec<String>,
    /// Paths matching one of these patterns are dropped, as are paths
    /// containing `sample`.
    pub exclude: Vec<String>,
    /// Keep the perfect player's own directory.
    pub include_reference: bool,
    pub meta: MetaFilter,
}

impl DirFilter {
    fn compile(&self) -> Result<(Regex, Regex), AnalysisError> {
        let exclude = self
            .exclude
            .iter()
            .map(String::as_str)
            .chain(["sample"])
            .collect::<Vec<_>>()
            .join("|");
        let intersection = Regex::new(&self.intersection.join("|"))
            .map_err(|source| AnalysisError::InvalidPattern { source })?;
        let exclude =
            Regex::new(&exclude).map_err(|source| AnalysisError::InvalidPattern { source })?;
        Ok((intersection, exclude))
    }

    /// Applies the filter and orders the survivors by their display `order`.
    ///
    /// The sort is stable, so directories with equal order keep their
    /// discovery order.
    pub fn select(
        &self,
        players: Vec<PlayerData>,
        display: &DisplayConfig,
    ) -> Result<Vec<PlayerData>, AnalysisError> {
        let (intersection, exclude) = self.compile()?;
        let mut selected = players
            .into_iter()
            .filter(|p| {
                let rel = p.rel_path.to_string_lossy();
                intersection.is_match(&rel)
                    && !exclude.is_match(&rel)
                    && (self.include_reference || !p.is_reference())
                    && self.meta.matches(p.meta())
            })
            .collect::<Vec<_>>();
        selected.sort_by_key(|p| display.order_of(p.name()));
        log::info!("{} directories selected", selected.len());
        Ok(selected)
    }
}
