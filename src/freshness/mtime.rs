//! Modification-time probes.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use super::Fingerprint;

/// Get the modification time of a file
///
/// Returns `None` if the file doesn't exist or mtime cannot be read
pub fn get_mtime(path: &Path) -> Option<SystemTime> {
    path.metadata().and_then(|m| m.modified()).ok()
}

/// Latest mtime across `paths`, in whole seconds.
///
/// `None` when any path has no readable mtime, or when `paths` is empty.
pub fn latest_mtime<'a>(paths: impl IntoIterator<Item = &'a Path>) -> Option<Fingerprint> {
    paths
        .into_iter()
        .map(|path| {
            let secs = get_mtime(path)?.duration_since(UNIX_EPOCH).ok()?.as_secs();
            Some(Fingerprint::from_secs(secs))
        })
        .try_fold(None, |max: Option<Fingerprint>, fp| Some(max.max(Some(fp?))))
        .flatten()
}
