//! Fingerprint resolution with optional short-lived caching.

use std::sync::Arc;
use std::time::Duration;

use super::{Fingerprint, mtime};
use crate::cache::CacheBackend;
use crate::debug;
use crate::group::FileSet;

const KEY_PREFIX: &str = "assetLm";

/// Computes the fingerprint of a FileSet.
///
/// Probing mtimes on every page render is cheap but not free, so results can
/// be cached for `ttl`. Debug mode always probes.
#[derive(Clone)]
pub struct FreshnessResolver {
    cache: Arc<dyn CacheBackend>,
    ttl: Option<Duration>,
    debug: bool,
}

impl FreshnessResolver {
    pub fn new(cache: Arc<dyn CacheBackend>, ttl: Option<Duration>, debug: bool) -> Self {
        Self {
            cache,
            ttl: ttl.filter(|ttl| !ttl.is_zero()),
            debug,
        }
    }

    fn cache_ttl(&self) -> Option<Duration> {
        if self.debug { None } else { self.ttl }
    }

    pub fn resolve(&self, files: &FileSet) -> Option<Fingerprint> {
        let Some(ttl) = self.cache_ttl() else {
            return mtime::latest_mtime(files.iter());
        };

        let key = format!("{KEY_PREFIX}{}", files.digest());
        match self.cache.get(&key) {
            Ok(Some(bytes)) => match serde_json::from_slice::<Fingerprint>(&bytes) {
                Ok(lm) => return Some(lm),
                Err(e) => debug!("freshness"; "undecodable entry {}: {}", key, e),
            },
            Ok(None) => {}
            Err(e) => debug!("freshness"; "cache read failed: {}", e),
        }

        let lm = mtime::latest_mtime(files.iter())?;
        let stored = serde_json::to_vec(&lm)
            .map_err(Into::into)
            .and_then(|bytes| self.cache.set(&key, bytes, Some(ttl)));
        if let Err(e) = stored {
            debug!("freshness"; "cache write failed: {}", e);
        }
        Some(lm)
    }
}
