//! `vasset group`: inspect a stored group.

use anyhow::Result;

use crate::bundler::Bundler;

/// Print the files of group `id` and its current fingerprint.
pub fn show_group(bundler: &Bundler, id: &str) -> Result<()> {
    let files = bundler.groups().lookup(id)?;
    for path in &files {
        println!("{}", path.display());
    }

    match bundler.freshness().resolve(&files) {
        Some(lm) => println!("lm: {lm}"),
        None => println!("lm: unavailable"),
    }
    Ok(())
}
