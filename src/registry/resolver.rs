//! Mapping registered URLs back to filesystem paths.
//!
//! One precedence is applied to every URL:
//!
//! 1. absolute (`scheme://`) or protocol-relative (`//`): the host must be the
//!    site's own, the path is taken from the web root
//! 2. under the asset-manager URL prefix: taken from the asset-manager root
//! 3. root-relative (`/…`): taken from the web root
//! 4. anything else: relative to the configured base path, from the web root
//!
//! Query and fragment are dropped, the path is percent-decoded and `.`/`..`
//! are folded lexically. Paths escaping their root resolve to nothing.

use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;
use url::Url;

use crate::config::RootsConfig;
use crate::utils::path::{fold_segments, join_segments};

#[derive(Debug, Clone)]
pub struct UrlResolver {
    web_root: PathBuf,
    host: Option<String>,
    assets: Option<(String, PathBuf)>,
    base_dir: String,
}

impl UrlResolver {
    /// `site_url` supplies the host that absolute URLs must match.
    pub fn new(web_root: impl Into<PathBuf>, site_url: &str) -> Self {
        let host = Url::parse(site_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_ascii_lowercase));
        Self {
            web_root: web_root.into(),
            host,
            assets: None,
            base_dir: "/".to_owned(),
        }
    }

    /// Resolver for the `[roots]` section: web root and site URL, the
    /// asset-manager directory when one is configured, and the base path.
    pub fn from_config(roots: &RootsConfig) -> Self {
        let resolver = Self::new(&roots.web, &roots.url).with_base_path(&roots.base_path);
        match &roots.assets {
            Some(dir) => resolver.with_assets(roots.assets_url.as_str(), dir),
            None => resolver,
        }
    }

    /// Asset-manager URL prefix (e.g. `/assets`) and its directory.
    pub fn with_assets(mut self, url: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        let url = url.into();
        if !url.is_empty() {
            self.assets = Some((url, root.into()));
        }
        self
    }

    /// Base for request-relative URLs; a path not ending in `/` names a
    /// document, and its directory is used.
    pub fn with_base_path(mut self, base: &str) -> Self {
        let base = if base.starts_with('/') { base.to_owned() } else { format!("/{base}") };
        self.base_dir = match base.rfind('/') {
            Some(idx) => base[..=idx].to_owned(),
            None => "/".to_owned(),
        };
        self
    }

    pub fn web_root(&self) -> &Path {
        &self.web_root
    }

    /// Filesystem path of `url`, or `None` for external or unmappable URLs.
    pub fn path_for(&self, url: &str) -> Option<PathBuf> {
        if let Some(absolute) = absolute_url(url) {
            let parsed = Url::parse(&absolute).ok()?;
            if let Some(host) = parsed.host_str()
                && self.host.as_deref() != Some(host.to_ascii_lowercase().as_str())
            {
                return None;
            }
            return map_path(&self.web_root, parsed.path());
        }

        if let Some((prefix, root)) = &self.assets
            && let Some(rest) = url.strip_prefix(prefix.trim_end_matches('/'))
            && (rest.is_empty() || rest.starts_with(['/', '?', '#']))
        {
            return map_path(root, rest);
        }

        if url.starts_with('/') {
            return map_path(&self.web_root, url);
        }

        map_path(&self.web_root, &format!("{}{url}", self.base_dir))
    }
}

/// Absolute URL with an explicit scheme, or `None` when `url` is not absolute.
fn absolute_url(url: &str) -> Option<String> {
    if url.starts_with("//") {
        return Some(format!("http:{url}"));
    }
    let (scheme, rest) = url.split_once(':')?;
    let is_scheme = !scheme.is_empty()
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '-'));
    (is_scheme && rest.starts_with("//")).then(|| url.to_owned())
}

fn map_path(root: &Path, raw: &str) -> Option<PathBuf> {
    let end = raw.find(['?', '#']).unwrap_or(raw.len());
    let decoded = percent_decode_str(&raw[..end]).decode_utf8().ok()?;
    let segments = fold_segments(&decoded)?;
    join_segments(root, &segments)
}
