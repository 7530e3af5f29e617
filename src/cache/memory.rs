//! In-process cache backend.

use std::time::{Duration, Instant};

use dashmap::DashMap;

use super::{CacheBackend, CacheError};

struct Entry {
    value: Vec<u8>,
    expires: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires.is_none_or(|at| now < at)
    }
}

/// Concurrent map with per-entry expiry. Expired entries are dropped lazily.
#[derive(Default)]
pub struct MemoryCache {
    entries: DashMap<String, Entry>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn remove(&self, key: &str) {
        self.entries.remove(key);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl CacheBackend for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key)
            && entry.is_live(now)
        {
            return Ok(Some(entry.value.clone()));
        }
        self.entries.remove_if(key, |_, entry| !entry.is_live(now));
        Ok(None)
    }

    fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<(), CacheError> {
        let expires = ttl.map(|ttl| Instant::now() + ttl);
        self.entries.insert(key.to_owned(), Entry { value, expires });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("k").unwrap(), None);
        cache.set("k", b"v1".to_vec(), None).unwrap();
        cache.set("k", b"v2".to_vec(), None).unwrap();
        assert_eq!(cache.get("k").unwrap(), Some(b"v2".to_vec()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_expired_entry_is_miss() {
        let cache = MemoryCache::new();
        cache.set("k", b"v".to_vec(), Some(Duration::ZERO)).unwrap();
        assert_eq!(cache.get("k").unwrap(), None);
        assert!(cache.is_empty());
    }
}
