//! Public roots: the directories whose files can be served to browsers.
//!
//! A file is servable when its directory lies under the web root or, when a
//! theme is active, under the theme root. The theme root wins when both match
//! (themes usually live inside the web root).

use std::path::{Component, Path, PathBuf};

use url::Url;

use super::AssetRoute;
use crate::error::{AssetError, Result};

/// A filesystem directory published under a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicRoot {
    pub path: PathBuf,
    pub url: Url,
}

impl PublicRoot {
    /// Create a root; the URL is normalized to end with `/`.
    pub fn new(path: impl Into<PathBuf>, url: &str) -> std::result::Result<Self, url::ParseError> {
        let mut url = Url::parse(url)?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(Self {
            path: path.into(),
            url,
        })
    }
}

/// Web root plus optional active theme root.
#[derive(Debug, Clone)]
pub struct PublicRoots {
    web: PublicRoot,
    theme: Option<PublicRoot>,
}

impl PublicRoots {
    pub fn new(web: PublicRoot, theme: Option<PublicRoot>) -> Self {
        Self { web, theme }
    }

    pub fn web(&self) -> &PublicRoot {
        &self.web
    }

    pub fn theme(&self) -> Option<&PublicRoot> {
        self.theme.as_ref()
    }

    /// Map a source file to its servable URLs.
    pub fn resolve(&self, file: &Path) -> Result<AssetRoute> {
        let invalid = || AssetError::InvalidAssetPath(file.to_path_buf());

        let dir = file.parent().ok_or_else(invalid)?;
        let name = file.file_name().and_then(|n| n.to_str()).ok_or_else(invalid)?;

        let root = self
            .theme
            .iter()
            .chain(std::iter::once(&self.web))
            .find(|root| dir.starts_with(&root.path))
            .ok_or_else(invalid)?;

        let rel = dir.strip_prefix(&root.path).map_err(|_| invalid())?;
        let base_url = join_segments(&root.url, rel, "").ok_or_else(invalid)?;
        let url = join_segments(&root.url, rel, name).ok_or_else(invalid)?;

        Ok(AssetRoute {
            path: file.to_path_buf(),
            source_root: dir.to_path_buf(),
            base_url,
            url,
        })
    }
}

/// Append `rel` directory components and a final segment to `base`.
///
/// Returns `None` for non-UTF-8 or non-normal components (`..`, `.`, roots).
fn join_segments(base: &Url, rel: &Path, last: &str) -> Option<Url> {
    let mut url = base.clone();
    {
        let mut segments = url.path_segments_mut().ok()?;
        segments.pop_if_empty();
        for component in rel.components() {
            match component {
                Component::Normal(part) => {
                    segments.push(part.to_str()?);
                }
                _ => return None,
            }
        }
        segments.push(last);
    }
    Some(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roots(theme: bool) -> PublicRoots {
        let web = PublicRoot::new("/srv/www", "http://example.com/").unwrap();
        let theme = theme.then(|| {
            PublicRoot::new("/srv/www/themes/dark", "http://example.com/themes/dark").unwrap()
        });
        PublicRoots::new(web, theme)
    }

    #[test]
    fn test_resolve_under_web_root() {
        let route = roots(false).resolve(Path::new("/srv/www/js/app.js")).unwrap();
        assert_eq!(route.base_url.as_str(), "http://example.com/js/");
        assert_eq!(route.url.as_str(), "http://example.com/js/app.js");
        assert_eq!(route.source_root, PathBuf::from("/srv/www/js"));
    }

    #[test]
    fn test_resolve_file_in_root_directory() {
        let route = roots(false).resolve(Path::new("/srv/www/main.css")).unwrap();
        assert_eq!(route.base_url.as_str(), "http://example.com/");
        assert_eq!(route.url.as_str(), "http://example.com/main.css");
    }

    #[test]
    fn test_theme_root_preferred() {
        let file = Path::new("/srv/www/themes/dark/css/site.css");
        let route = roots(true).resolve(file).unwrap();
        assert_eq!(
            route.url.as_str(),
            "http://example.com/themes/dark/css/site.css"
        );

        // Same result without theme, via web root
        let route = roots(false).resolve(file).unwrap();
        assert_eq!(
            route.url.as_str(),
            "http://example.com/themes/dark/css/site.css"
        );
    }

    #[test]
    fn test_theme_root_with_distinct_url() {
        let web = PublicRoot::new("/srv/www", "http://example.com/").unwrap();
        let theme = PublicRoot::new("/opt/theme", "https://static.example.com/theme/").unwrap();
        let roots = PublicRoots::new(web, Some(theme));

        let route = roots.resolve(Path::new("/opt/theme/a b.css")).unwrap();
        assert_eq!(
            route.url.as_str(),
            "https://static.example.com/theme/a%20b.css"
        );
    }

    #[test]
    fn test_outside_roots_rejected() {
        let err = roots(true).resolve(Path::new("/etc/app.js")).unwrap_err();
        assert!(matches!(err, AssetError::InvalidAssetPath(_)));
    }

    #[test]
    fn test_prefix_match_is_component_wise() {
        let err = roots(false)
            .resolve(Path::new("/srv/www-private/app.js"))
            .unwrap_err();
        assert!(matches!(err, AssetError::InvalidAssetPath(_)));
    }

    #[test]
    fn test_parent_components_rejected() {
        let err = roots(false)
            .resolve(Path::new("/srv/www/../secret/app.js"))
            .unwrap_err();
        assert!(matches!(err, AssetError::InvalidAssetPath(_)));
    }
}
