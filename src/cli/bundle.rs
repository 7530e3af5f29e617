//! `vasset bundle`: create a group from the command line.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::asset::AssetType;
use crate::bundler::Bundler;
use crate::group::FileSet;
use crate::log;
use crate::registry::Position;
use crate::utils::path::normalize_path;

/// Store `files` as a group and print its URL, or its combined source with
/// `print`.
pub fn run_bundle(
    bundler: &Bundler,
    ty: AssetType,
    position: Position,
    print: bool,
    files: &[PathBuf],
) -> Result<()> {
    let files = absolute_files(files)?;

    if print {
        let id = bundler.groups().ensure(&files)?;
        let lm = bundler.freshness().resolve(&files);
        let source = bundler.group_source(id.as_str(), ty, lm)?;
        println!("{source}");
        return Ok(());
    }

    let count = files.len();
    let url = bundler.create_group(files, ty, position)?;
    log!("bundle"; "{} {} file{} at {}", count, ty, if count == 1 { "" } else { "s" }, position);
    println!("{url}");
    Ok(())
}

/// Group records hold absolute paths.
fn absolute_files(files: &[PathBuf]) -> Result<FileSet> {
    files
        .iter()
        .map(|file| {
            std::path::absolute(file)
                .map(|path| normalize_path(&path))
                .with_context(|| format!("invalid path {}", file.display()))
        })
        .collect()
}
