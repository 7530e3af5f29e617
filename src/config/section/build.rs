//! `[build]` section configuration.

use macros::Config;
use serde::{Deserialize, Serialize};

/// Bundle transform settings.
#[derive(Debug, Clone, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "build")]
pub struct BuildConfig {
    /// Minify bundles (JS with oxc, CSS with lightningcss).
    #[config(inline_doc = "Minify bundles.")]
    pub minify: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self { minify: true }
    }
}
