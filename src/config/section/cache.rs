//! `[cache]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [cache]
//! backend = "file"           # memory | file | none
//! dir = ".vasset/cache"
//! lm_ttl = 30                # Seconds to reuse a computed fingerprint (0 = always probe)
//! debug = false              # Always probe mtimes
//! ```

use std::path::PathBuf;
use std::time::Duration;

use macros::Config;
use serde::{Deserialize, Serialize};

/// Cache backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackendKind {
    #[default]
    Memory,
    File,
    None,
}

/// Render, fingerprint and remote URL caching.
#[derive(Debug, Clone, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "cache")]
pub struct CacheConfig {
    /// Backend: `memory`, `file` or `none`.
    pub backend: CacheBackendKind,

    /// Directory of the `file` backend.
    pub dir: PathBuf,

    /// Seconds a computed fingerprint is reused (0 disables).
    pub lm_ttl: u64,

    /// Always probe mtimes, never reuse fingerprints.
    pub debug: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackendKind::Memory,
            dir: ".vasset/cache".into(),
            lm_ttl: 0,
            debug: false,
        }
    }
}

impl CacheConfig {
    pub fn lm_ttl(&self) -> Option<Duration> {
        (self.lm_ttl > 0).then(|| Duration::from_secs(self.lm_ttl))
    }
}
