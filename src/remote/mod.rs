//! Remote object store publishing (CDN).

mod directory;
mod error;
mod publisher;
mod store;

pub use directory::DirectoryStore;
pub use error::RemoteError;
pub use publisher::{CleanupReport, RemotePublisher, object_name, stale_prefix};
pub use store::{RemoteStore, UrlMode};
