//! Remote object store collaborator.

use super::RemoteError;

/// Which base URL to hand out for an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UrlMode {
    #[default]
    Standard,
    Ssl,
}

/// Flat namespace of named objects with public URLs.
pub trait RemoteStore: Send + Sync {
    /// Public URL of `name`, or `None` when the object does not exist.
    fn url(&self, name: &str, mode: UrlMode) -> Result<Option<String>, RemoteError>;

    fn put(&self, name: &str, data: &[u8], content_type: &str) -> Result<(), RemoteError>;

    /// Names of all objects starting with `prefix`.
    fn list(&self, prefix: &str) -> Result<Vec<String>, RemoteError>;

    fn delete(&self, name: &str) -> Result<(), RemoteError>;
}
