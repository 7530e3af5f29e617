//! Group → payload pipeline.

use std::fs;
use std::sync::Arc;

use super::{AssetType, PublicRoots, SourceAsset, Transform};
use crate::debug;
use crate::error::{AssetError, Result};
use crate::group::{GroupId, GroupStore};

/// Looks up a group, maps its files to public URLs and runs the transform.
pub struct Pipeline {
    groups: Arc<GroupStore>,
    roots: PublicRoots,
    transform: Arc<dyn Transform>,
}

impl Pipeline {
    pub fn new(groups: Arc<GroupStore>, roots: PublicRoots, transform: Arc<dyn Transform>) -> Self {
        Self {
            groups,
            roots,
            transform,
        }
    }

    /// Build the combined source of a group.
    pub fn build(&self, id: &GroupId, ty: AssetType) -> Result<String> {
        let files = self.groups.lookup(id.as_str())?;

        // Resolve everything first so a misconfigured path fails before any IO
        let routes = files
            .iter()
            .map(|path| self.roots.resolve(path))
            .collect::<Result<Vec<_>>>()?;

        let assets = routes
            .into_iter()
            .map(|route| {
                let content = fs::read_to_string(&route.path)
                    .map_err(|e| AssetError::SourceRead(route.path.clone(), e))?;
                Ok(SourceAsset { route, content })
            })
            .collect::<Result<Vec<_>>>()?;

        let source = self.transform.transform(ty, &assets)?;
        debug!("build"; "{} ({}, {} files, {} bytes)", id, ty, assets.len(), source.len());
        Ok(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{MinifyTransform, PublicRoot};
    use crate::group::FileSet;
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        groups: Arc<GroupStore>,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            fs::create_dir_all(dir.path().join("www/js")).unwrap();
            fs::create_dir_all(dir.path().join("www/css")).unwrap();
            let groups = Arc::new(GroupStore::new(dir.path().join("groups"), "test"));
            Self { dir, groups }
        }

        fn www(&self) -> PathBuf {
            self.dir.path().join("www")
        }

        fn write(&self, rel: &str, content: &str) -> PathBuf {
            let path = self.www().join(rel);
            fs::write(&path, content).unwrap();
            path
        }

        fn pipeline(&self, minify: bool) -> Pipeline {
            let roots = PublicRoots::new(
                PublicRoot::new(self.www(), "http://example.com/").unwrap(),
                None,
            );
            Pipeline::new(
                Arc::clone(&self.groups),
                roots,
                Arc::new(MinifyTransform::new(minify)),
            )
        }
    }

    #[test]
    fn test_build_concatenates_in_order() {
        let fx = Fixture::new();
        let a = fx.write("js/a.js", "window.a = 'A';");
        let b = fx.write("js/b.js", "window.b = 'B';");

        let id = fx.groups.ensure(&FileSet::new(vec![b, a])).unwrap();
        let out = fx.pipeline(false).build(&id, AssetType::Js).unwrap();
        assert_eq!(out, "window.b = 'B';\nwindow.a = 'A';");
    }

    #[test]
    fn test_build_unknown_group() {
        let fx = Fixture::new();
        let id = GroupId::derive("test", &FileSet::new(vec![fx.www().join("js/none.js")]));
        let err = fx.pipeline(true).build(&id, AssetType::Js).unwrap_err();
        assert!(matches!(err, AssetError::GroupNotFound(_)));
    }

    #[test]
    fn test_build_rejects_file_outside_roots() {
        let fx = Fixture::new();
        let inside = fx.write("css/a.css", "a{}");
        let outside = fx.dir.path().join("secret.css");
        fs::write(&outside, "b{}").unwrap();

        let id = fx
            .groups
            .ensure(&FileSet::new(vec![inside, outside.clone()]))
            .unwrap();
        let err = fx.pipeline(true).build(&id, AssetType::Css).unwrap_err();
        assert!(matches!(err, AssetError::InvalidAssetPath(p) if p == outside));
    }

    #[test]
    fn test_build_missing_source_file() {
        let fx = Fixture::new();
        let gone = fx.www().join("js/gone.js");
        let id = fx.groups.ensure(&FileSet::new(vec![gone.clone()])).unwrap();
        let err = fx.pipeline(true).build(&id, AssetType::Js).unwrap_err();
        assert!(matches!(err, AssetError::SourceRead(p, _) if p == gone));
    }

    #[test]
    fn test_build_css_rewrites_relative_urls() {
        let fx = Fixture::new();
        let css = fx.write("css/site.css", "body { background: url(../img/bg.png); }");
        let id = fx.groups.ensure(&FileSet::new(vec![css])).unwrap();
        let out = fx.pipeline(true).build(&id, AssetType::Css).unwrap();
        assert!(out.contains("http://example.com/img/bg.png"), "{out}");
    }
}
