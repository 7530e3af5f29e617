//! Key-value cache collaborator.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Errors from a cache backend. Callers treat them as misses.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache io error")]
    Io(#[from] io::Error),

    #[error("cache entry is corrupt: {0}")]
    Corrupt(String),

    #[error("cache entry encoding failed")]
    Encode(#[from] serde_json::Error),
}

/// Byte-valued key-value store shared by all requests.
///
/// A `ttl` of `None` means the entry does not expire.
pub trait CacheBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;
    fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<(), CacheError>;
}

/// Cache that stores nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCache;

impl CacheBackend for NullCache {
    fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: Vec<u8>, _ttl: Option<Duration>) -> Result<(), CacheError> {
        Ok(())
    }
}
