//! Error types shared by the analysis modules.
//!
//! Two policies apply throughout the crate:
//!
//! - **Row-level** problems (an unparsable line in a log or CSV file) are
//!   reported with [`log::warn!`] and the row is skipped. [`MalformedRow`]
//!   carries the reason for the warning.
//! - **File-level** problems ([`AnalysisError`]) are returned to the caller.
//!   A [`AnalysisError::MissingFile`] usually means "skip this directory",
//!   while [`AnalysisError::DataMismatch`] aborts the comparison in progress.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum AnalysisError {
    #[display("{kind} file does not exist: {}", path.display())]
    MissingFile { kind: &'static str, path: PathBuf },

    #[display(
        "record count mismatch: reference has {reference} records, candidate has {candidate}"
    )]
    DataMismatch { reference: usize, candidate: usize },

    #[display("failed to access {}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[display("failed to parse JSON file {}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[display("failed to read CSV file {}", path.display())]
    Csv { path: PathBuf, source: csv::Error },

    #[display("column '{column}' not found in {}", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[display("invalid directory pattern")]
    InvalidPattern { source: regex::Error },

    #[display("at least {required} runs are required, found {found}")]
    NotEnoughRuns { required: usize, found: usize },

    #[display("evaluation file name does not match '<N>tuple_<sym|notsym>_data_<seed>_<stage>.dat': {name}")]
    InvalidEvFileName { name: String },

    #[display("{} already exists", path.display())]
    AlreadyExists { path: PathBuf },
}

/// Reason a single input row was rejected.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("malformed row: {reason}")]
pub struct MalformedRow {
    pub reason: String,
}

impl MalformedRow {
    pub(crate) fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Reads a whole text file, mapping a missing file to [`AnalysisError::MissingFile`].
pub(crate) fn read_text(kind: &'static str, path: &Path) -> Result<String, AnalysisError> {
    fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            AnalysisError::MissingFile {
                kind,
                path: path.to_owned(),
            }
        } else {
            AnalysisError::Io {
                path: path.to_owned(),
                source,
            }
        }
    })
}

/// Opens a CSV file with a header row.
pub(crate) fn open_csv(
    kind: &'static str,
    path: &Path,
) -> Result<csv::Reader<fs::File>, AnalysisError> {
    if !path.exists() {
        return Err(AnalysisError::MissingFile {
            kind,
            path: path.to_owned(),
        });
    }
    csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|source| AnalysisError::Csv {
            path: path.to_owned(),
            source,
        })
}

/// Looks up the index of a named column in a CSV header row.
pub(crate) fn column_index(
    headers: &csv::StringRecord,
    column: &str,
    path: &Path,
) -> Result<usize, AnalysisError> {
    headers
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| AnalysisError::MissingColumn {
            path: path.to_owned(),
            column: column.to_owned(),
        })
}
