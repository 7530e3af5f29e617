//! Group identifiers.

use std::fmt;

use super::FileSet;
use crate::error::{AssetError, Result};

/// Length of a group id in hex characters (16 digest bytes).
pub const GROUP_ID_LEN: usize = 32;

/// Deterministic name of a FileSet, stable across processes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(String);

impl GroupId {
    /// Derive the id of `files` under an application `prefix`.
    pub fn derive(prefix: &str, files: &FileSet) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(prefix.len() as u64).to_le_bytes());
        hasher.update(prefix.as_bytes());
        files.feed(&mut hasher);
        let digest = hasher.finalize();
        Self(hex::encode(&digest.as_bytes()[..GROUP_ID_LEN / 2]))
    }

    /// Parse an id received from outside (query strings, CLI).
    ///
    /// Only the exact derived shape is accepted, so an id can always be used
    /// as a file name inside the group directory.
    pub fn parse(raw: &str) -> Result<Self> {
        let valid = raw.len() == GROUP_ID_LEN
            && raw.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        if valid {
            Ok(Self(raw.to_owned()))
        } else {
            Err(AssetError::GroupNotFound(raw.to_owned()))
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for GroupId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn files(paths: &[&str]) -> FileSet {
        paths.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_derive_deterministic() {
        let set = files(&["/www/js/a.js", "/www/js/b.js"]);
        let a = GroupId::derive("app", &set);
        let b = GroupId::derive("app", &set.clone());
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), GROUP_ID_LEN);
        assert!(GroupId::parse(a.as_str()).is_ok());
    }

    #[test]
    fn test_derive_distinguishes_sets() {
        let ab = GroupId::derive("app", &files(&["/a.js", "/b.js"]));
        let ba = GroupId::derive("app", &files(&["/b.js", "/a.js"]));
        let a = GroupId::derive("app", &files(&["/a.js"]));
        assert_ne!(ab, ba);
        assert_ne!(ab, a);
    }

    #[test]
    fn test_derive_prefix_scoped() {
        let set = files(&["/a.js"]);
        assert_ne!(GroupId::derive("one", &set), GroupId::derive("two", &set));
        // Prefix boundary must not shift into the paths
        assert_ne!(
            GroupId::derive("ap", &files(&["p/a.js"])),
            GroupId::derive("app", &files(&["/a.js"]))
        );
    }

    #[test]
    fn test_parse_rejects_foreign_shapes() {
        for raw in [
            "",
            "../../etc/passwd",
            "0123456789abcdef0123456789ABCDEF",
            "0123456789abcdef0123456789abcde",
            "0123456789abcdef0123456789abcdef0",
            "0123456789abcdef/123456789abcdef",
        ] {
            let err = GroupId::parse(raw).unwrap_err();
            assert!(matches!(err, AssetError::GroupNotFound(_)), "{raw}");
        }
    }
}
