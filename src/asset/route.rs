//! Asset route: source file → servable URL mapping.

use std::path::PathBuf;

use url::Url;

/// Route information for one file of a group.
///
/// Built by [`PublicRoots::resolve`](super::PublicRoots::resolve) and carried
/// into the transform so CSS references can be rewritten against `base_url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRoute {
    /// Source file path (absolute)
    pub path: PathBuf,
    /// Directory containing the source file
    pub source_root: PathBuf,
    /// Public URL of `source_root`, always ending with `/`
    pub base_url: Url,
    /// Public URL of the file itself
    pub url: Url,
}
