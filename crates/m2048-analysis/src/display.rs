//! Per-directory display preferences cached in `config.json`.
//!
//! The file maps each directory's safe name to a label, color, line style
//! and sort order. It is created on first use and amended on every graph
//! invocation, so users can edit the labels and colors by hand between runs.

use std::{
    collections::BTreeMap,
    fs::{self, File, OpenOptions},
    io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{error::AnalysisError, player::PlayerData};

pub const CONFIG_FILE_NAME: &str = "config.json";

fn default_linestyle() -> String {
    "solid".to_owned()
}

/// Display settings of one directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayEntry {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default = "default_linestyle")]
    pub linestyle: String,
    #[serde(default)]
    pub order: i64,
    /// Keys added by hand that this tool does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DisplayEntry {
    #[must_use]
    pub fn with_label(label: String) -> Self {
        Self {
            label: Some(label),
            color: None,
            linestyle: default_linestyle(),
            order: 0,
            extra: Map::new(),
        }
    }
}

/// The contents of `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayConfig {
    pub entries: BTreeMap<String, DisplayEntry>,
}

impl DisplayConfig {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DisplayEntry> {
        self.entries.get(name)
    }

    /// Label to show in legends for the series `name`.
    #[must_use]
    pub fn label_for<'a>(&'a self, name: &'a str) -> &'a str {
        self.get(name)
            .and_then(|e| e.label.as_deref())
            .filter(|l| !l.is_empty())
            .unwrap_or(name)
    }

    #[must_use]
    pub fn order_of(&self, name: &str) -> i64 {
        self.get(name).map_or(0, |e| e.order)
    }

    /// Adds defaults for directories without an entry and replaces
    /// placeholder labels once metadata provides a better one.
    ///
    /// A label is a placeholder while it is empty or still equal to the
    /// directory's relative path or safe name.
    pub fn amend(&mut self, players: &[PlayerData]) {
        for player in players {
            let meta_label = player.meta_label();
            let rel = player.rel_path().to_string_lossy();
            match self.entries.get_mut(player.name()) {
                None => {
                    let label = meta_label.unwrap_or_else(|| rel.into_owned());
                    self.entries
                        .insert(player.name().to_owned(), DisplayEntry::with_label(label));
                }
                Some(entry) => {
                    let Some(meta_label) = meta_label else {
                        continue;
                    };
                    let is_placeholder = entry
                        .label
                        .as_deref()
                        .is_none_or(|l| l.is_empty() || l == rel || l == player.name());
                    if is_placeholder {
                        entry.label = Some(meta_label);
                    }
                }
            }
        }
    }

    pub fn read(path: &Path) -> Result<Self, AnalysisError> {
        let text = fs::read_to_string(path).map_err(|source| AnalysisError::Io {
            path: path.to_owned(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| AnalysisError::Json {
            path: path.to_owned(),
            source,
        })
    }

    pub fn write(&self, path: &Path) -> Result<(), AnalysisError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)
            .map_err(|source| AnalysisError::Json {
                path: path.to_owned(),
                source,
            })?;
        fs::write(path, buf).map_err(|source| AnalysisError::Io {
            path: path.to_owned(),
            source,
        })
    }

    /// Reads `path` (if present), amends it for `players` and writes it back
    /// while holding an exclusive lock on `<path>.lock`.
    pub fn load_and_update(path: &Path, players: &[PlayerData]) -> Result<Self, AnalysisError> {
        let _lock = ConfigLock::acquire(path)?;
        let mut config = if path.exists() {
            Self::read(path)?
        } else {
            Self::default()
        };
        config.amend(players);
        config.write(path)?;
        Ok(config)
    }
}

/// Advisory lock serializing updates of one config file across processes.
struct ConfigLock {
    file: File,
}

impl ConfigLock {
    fn acquire(config_path: &Path) -> Result<Self, AnalysisError> {
        let mut lock_path = config_path.as_os_str().to_owned();
        lock_path.push(".lock");
        let lock_path = PathBuf::from(lock_path);
        let io_err = |source: io::Error| AnalysisError::Io {
            path: lock_path.clone(),
            source,
        };
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(io_err)?;
        file.lock().map_err(io_err)?;
        Ok(Self { file })
    }
}

impl Drop for ConfigLock {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            log::warn!("failed to release config lock: {e}");
        }
    }
}
