//! `[roots]` section configuration.
//!
//! Public roots are the directories whose files may be bundled, together
//! with the URLs they are published under.
//!
//! # Example
//!
//! ```toml
//! [roots]
//! web = "public"
//! url = "https://example.com/"
//! theme = "public/themes/dark"
//! theme_url = "https://example.com/themes/dark/"
//! assets = "runtime/assets"
//! assets_url = "/assets"
//! base_path = "/"
//! ```

use std::path::PathBuf;

use macros::Config;
use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

/// Web root, optional theme root and asset-manager directory.
#[derive(Debug, Clone, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "roots")]
pub struct RootsConfig {
    /// Document root.
    pub web: PathBuf,

    /// Public URL of the document root.
    pub url: String,

    /// Active theme directory; matched before the web root.
    pub theme: Option<PathBuf>,

    /// Public URL of the theme directory.
    pub theme_url: Option<String>,

    /// Asset-manager directory (published copies of vendor assets).
    pub assets: Option<PathBuf>,

    /// URL prefix of the asset-manager directory.
    pub assets_url: String,

    /// Base for request-relative script URLs.
    pub base_path: String,
}

impl Default for RootsConfig {
    fn default() -> Self {
        Self {
            web: "public".into(),
            url: "http://127.0.0.1:5277/".into(),
            theme: None,
            theme_url: None,
            assets: None,
            assets_url: "/assets".into(),
            base_path: "/".into(),
        }
    }
}

impl RootsConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if url::Url::parse(&self.url).is_err() {
            diag.error_with_hint(
                Self::FIELDS.url,
                format!("`{}` is not an absolute URL", self.url),
                "url = \"https://example.com/\"",
            );
        }

        match (&self.theme, &self.theme_url) {
            (Some(_), Some(url)) if url::Url::parse(url).is_err() => {
                diag.error(Self::FIELDS.theme_url, format!("`{url}` is not an absolute URL"));
            }
            (None, Some(_)) => {
                diag.error(Self::FIELDS.theme_url, "set without `roots.theme`");
            }
            _ => {}
        }

        if !self.web.is_dir() {
            diag.error(
                Self::FIELDS.web,
                format!("`{}` is not a directory", self.web.display()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{ConfigDiagnostics, test_parse_config};

    #[test]
    fn test_roots_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.roots.url, "http://127.0.0.1:5277/");
        assert!(config.roots.theme.is_none());
        assert_eq!(config.roots.assets_url, "/assets");
    }

    #[test]
    fn test_roots_validation() {
        let config = test_parse_config(
            "[roots]\nweb = \"/definitely/missing\"\nurl = \"nope\"\ntheme_url = \"http://x/\"",
        );
        let mut diag = ConfigDiagnostics::new();
        config.roots.validate(&mut diag);
        assert_eq!(diag.len(), 3);
    }
}
