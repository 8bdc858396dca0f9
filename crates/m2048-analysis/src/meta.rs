//! Run metadata stored as `meta.json` next to each data directory.

use std::{
    fmt,
    path::{Component, Path},
    sync::LazyLock,
};

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{AnalysisError, read_text};

pub const META_FILE_NAME: &str = "meta.json";

static EVFILE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)tuple_(sym|notsym)_data_(\d+)_(\d+)\.dat").expect("valid regex")
});

/// Describes the training run a data directory was produced from.
///
/// Every field is optional. Integers may be written as numbers or numeric
/// strings, and `sym` may be a boolean (`true` is `"sym"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(
        default,
        deserialize_with = "lenient_int",
        skip_serializing_if = "Option::is_none"
    )]
    pub tuple: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient_sym",
        skip_serializing_if = "Option::is_none"
    )]
    pub sym: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_int",
        skip_serializing_if = "Option::is_none"
    )]
    pub seed: Option<u64>,
    #[serde(
        default,
        deserialize_with = "lenient_int",
        skip_serializing_if = "Option::is_none"
    )]
    pub stage: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evfile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relpath: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

fn lenient_int<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64> + std::str::FromStr,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| T::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_sym<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => Some(if b { "sym" } else { "notsym" }.to_owned()),
        Some(Value::String(s)) => Some(s.to_lowercase()),
        _ => None,
    })
}

impl Meta {
    /// Reads `meta.json` from a data directory, returning `None` when the file does not exist.
    pub fn read(dir: &Path) -> Result<Option<Self>, AnalysisError> {
        let path = dir.join(META_FILE_NAME);
        let text = match read_text("meta", &path) {
            Ok(text) => text,
            Err(AnalysisError::MissingFile { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| AnalysisError::Json { path, source })
    }

    /// Parses `<tuple>tuple_<sym|notsym>_data_<seed>_<stage>.dat`.
    ///
    /// Only the file name of `evfile` is inspected.
    ///
    /// ```
    /// # use m2048_analysis::meta::Meta;
    /// let meta = Meta::from_evfile("/data/6tuple_sym_data_3_2.dat").unwrap();
    /// assert_eq!(meta.tuple, Some(6));
    /// assert_eq!(meta.sym.as_deref(), Some("sym"));
    /// assert_eq!(meta.seed, Some(3));
    /// assert_eq!(meta.stage, Some(2));
    /// assert_eq!(meta.evfile.as_deref(), Some("6tuple_sym_data_3_2.dat"));
    /// ```
    pub fn from_evfile(evfile: &str) -> Result<Self, AnalysisError> {
        let name = Path::new(evfile)
            .file_name()
            .map_or_else(|| evfile.to_owned(), |n| n.to_string_lossy().into_owned());
        let invalid = || AnalysisError::InvalidEvFileName { name: name.clone() };
        let caps = EVFILE_NAME.captures(&name).ok_or_else(invalid)?;
        Ok(Self {
            tuple: Some(caps[1].parse().map_err(|_| invalid())?),
            sym: Some(caps[2].to_owned()),
            seed: Some(caps[3].parse().map_err(|_| invalid())?),
            stage: Some(caps[4].parse().map_err(|_| invalid())?),
            evfile: Some(name.clone()),
            relpath: None,
            id: None,
        })
    }

    /// Display label `NT<tuple>_<sym>_s<seed>[_st<stage>]`.
    #[must_use]
    pub fn label(&self) -> Option<String> {
        let (tuple, sym, seed) = (self.tuple?, self.sym.as_ref()?, self.seed?);
        Some(format!("NT{tuple}_{sym}_s{seed}{}", StageSuffix(self.stage)))
    }

    #[must_use]
    pub fn run_group(&self) -> Option<RunGroup> {
        Some(RunGroup {
            tuple: self.tuple?,
            sym: self.sym.clone()?,
            stage: self.stage,
        })
    }
}

/// Runs that differ only by seed, averaged together by the `*-mean` graphs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunGroup {
    pub tuple: u32,
    pub sym: String,
    pub stage: Option<u32>,
}

impl RunGroup {
    /// Recovers the group from a `<run>/seed<N>/NT<tuple>_<sym>` directory layout.
    #[must_use]
    pub fn from_rel_path(rel: &Path) -> Option<Self> {
        let parts = rel
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => s.to_str(),
                _ => None,
            })
            .collect::<Vec<_>>();
        let nt_dir = parts.get(2)?;
        let (head, sym) = nt_dir.strip_prefix("NT")?.split_once('_')?;
        Some(Self {
            tuple: head.parse().ok()?,
            sym: sym.to_owned(),
            stage: None,
        })
    }

    #[must_use]
    pub fn mean_label(&self) -> String {
        format!("NT{}_{}_mean{}", self.tuple, self.sym, StageSuffix(self.stage))
    }

    /// Label of the `sym - notsym` curve for this group's tuple and stage.
    #[must_use]
    pub fn symdiff_label(&self) -> String {
        format!("NT{}_sym-notsym{}", self.tuple, StageSuffix(self.stage))
    }
}

struct StageSuffix(Option<u32>);

impl fmt::Display for StageSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(stage) => write!(f, "_st{stage}"),
            None => Ok(()),
        }
    }
}
