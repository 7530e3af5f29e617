//! Ordered file sets.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AssetError, Result};

/// Ordered sequence of absolute source paths.
///
/// Order is concatenation order; duplicates are kept as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileSet(Vec<PathBuf>);

impl FileSet {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self(files)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.0.iter().map(PathBuf::as_path)
    }

    pub fn push(&mut self, path: impl Into<PathBuf>) {
        self.0.push(path.into());
    }

    pub fn into_inner(self) -> Vec<PathBuf> {
        self.0
    }

    /// Paths as UTF-8 strings, the persisted form.
    pub fn to_strings(&self) -> Result<Vec<&str>> {
        self.0
            .iter()
            .map(|p| {
                p.to_str()
                    .ok_or_else(|| AssetError::InvalidAssetPath(p.clone()))
            })
            .collect()
    }

    /// blake3 hex digest of the path list (length-prefixed, order-sensitive).
    pub fn digest(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        self.feed(&mut hasher);
        hasher.finalize().to_hex().to_string()
    }

    /// Feed paths into `hasher` with a length prefix per entry, so that
    /// `["ab", "c"]` and `["a", "bc"]` never collide.
    pub(crate) fn feed(&self, hasher: &mut blake3::Hasher) {
        hasher.update(&(self.0.len() as u64).to_le_bytes());
        for path in &self.0 {
            let bytes = path.as_os_str().as_encoded_bytes();
            hasher.update(&(bytes.len() as u64).to_le_bytes());
            hasher.update(bytes);
        }
    }
}

impl From<Vec<PathBuf>> for FileSet {
    fn from(files: Vec<PathBuf>) -> Self {
        Self(files)
    }
}

impl FromIterator<PathBuf> for FileSet {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a FileSet {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
