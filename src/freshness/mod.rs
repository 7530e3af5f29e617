//! Freshness detection: last-modified fingerprints of file sets.

mod fingerprint;
pub mod mtime;
mod resolver;

pub use fingerprint::Fingerprint;
pub use resolver::FreshnessResolver;
