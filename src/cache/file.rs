//! Directory-backed cache backend.
//!
//! One file per key, named by the blake3 hash of the key. Each file starts
//! with an 8-byte little-endian expiry (seconds since the UNIX epoch, `0` for
//! none) followed by the raw value.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tempfile::NamedTempFile;

use super::{CacheBackend, CacheError};

const HEADER_LEN: usize = 8;

#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(blake3::hash(key.as_bytes()).to_hex().as_str())
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

impl CacheBackend for FileCache {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let path = self.entry_path(key);
        let mut bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let header: [u8; HEADER_LEN] = bytes
            .get(..HEADER_LEN)
            .and_then(|h| h.try_into().ok())
            .ok_or_else(|| CacheError::Corrupt(path.display().to_string()))?;

        let expires = u64::from_le_bytes(header);
        if expires != 0 && expires <= now_secs() {
            // Best effort: another writer may already have replaced it
            let _ = fs::remove_file(&path);
            return Ok(None);
        }

        bytes.drain(..HEADER_LEN);
        Ok(Some(bytes))
    }

    fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<(), CacheError> {
        let expires = ttl.map_or(0, |ttl| now_secs().saturating_add(ttl.as_secs()).max(1));

        fs::create_dir_all(&self.dir)?;
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(&expires.to_le_bytes())?;
        tmp.write_all(&value)?;
        tmp.persist(self.entry_path(key)).map_err(|e| e.error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_roundtrip_and_overwrite() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::new(dir.path().join("cache"));

        assert_eq!(cache.get("assetLm:x").unwrap(), None);
        cache.set("assetLm:x", b"one".to_vec(), None).unwrap();
        cache
            .set("assetLm:x", b"two".to_vec(), Some(Duration::from_secs(3600)))
            .unwrap();
        assert_eq!(cache.get("assetLm:x").unwrap(), Some(b"two".to_vec()));
        assert_eq!(fs::read_dir(cache.dir()).unwrap().count(), 1);
    }

    #[test]
    fn test_expired_entry_removed() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::new(dir.path());
        let path = cache.entry_path("k");
        let mut raw = 1u64.to_le_bytes().to_vec();
        raw.extend_from_slice(b"old");
        fs::write(&path, raw).unwrap();

        assert_eq!(cache.get("k").unwrap(), None);
        assert!(!path.exists());
    }

    #[test]
    fn test_truncated_entry_is_error() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::new(dir.path());
        fs::write(cache.entry_path("k"), b"abc").unwrap();
        assert!(matches!(cache.get("k"), Err(CacheError::Corrupt(_))));
    }
}
