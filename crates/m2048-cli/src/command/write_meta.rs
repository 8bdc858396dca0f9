use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::Args;
use m2048_analysis::{
    AnalysisError,
    meta::{META_FILE_NAME, Meta},
    player::make_safe_name,
};

use crate::util::Output;

#[derive(Debug, Clone, Args)]
pub(crate) struct WriteMetaArg {
    /// Data directory to write meta.json into
    data_dir: PathBuf,
    /// Evaluation file path or name, `<N>tuple_<sym|notsym>_data_<seed>_<stage>.dat`
    evfile: String,
    /// Board-data root that relpath and id are relative to
    #[arg(long, default_value = "board_data")]
    board_dir: PathBuf,
    /// Overwrite an existing meta.json
    #[arg(long)]
    force: bool,
}

fn resolve(path: &Path) -> PathBuf {
    fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_owned())
}

/// Fills `relpath` and `id` from the location of `data_dir` under `board_dir`.
fn locate(meta: &mut Meta, data_dir: &Path, board_dir: &Path) {
    match data_dir.strip_prefix(board_dir) {
        Ok(rel) => {
            meta.relpath = Some(rel.to_string_lossy().into_owned());
            meta.id = Some(make_safe_name(rel));
        }
        Err(_) => {
            meta.relpath = Some(data_dir.to_string_lossy().into_owned());
            let name = data_dir.file_name().map(Path::new).unwrap_or(data_dir);
            meta.id = Some(make_safe_name(name));
        }
    }
}

pub(crate) fn run(arg: &WriteMetaArg) -> anyhow::Result<()> {
    let data_dir = resolve(&arg.data_dir);
    let board_dir = resolve(&arg.board_dir);
    let mut meta = Meta::from_evfile(&arg.evfile)?;
    locate(&mut meta, &data_dir, &board_dir);

    let meta_path = data_dir.join(META_FILE_NAME);
    if meta_path.exists() && !arg.force {
        return Err(AnalysisError::AlreadyExists { path: meta_path })
            .context("Pass --force to overwrite it");
    }
    let mut output = Output::open(meta_path.clone())?;
    output.write_json(&meta, b"  ")?;
    println!("wrote: {}", meta_path.display());
    Ok(())
}
