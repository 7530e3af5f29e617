//! Configuration sections of `vasset.toml`.

mod build;
mod cache;
mod cdn;
mod groups;
mod roots;
mod serve;

pub use build::BuildConfig;
pub use cache::{CacheBackendKind, CacheConfig};
pub use cdn::CdnConfig;
pub use groups::GroupsConfig;
pub use roots::RootsConfig;
pub use serve::ServeConfig;
