//! Bundler facade: wires group storage, freshness, caching, the build
//! pipeline and optional remote publishing.

use std::sync::Arc;

use anyhow::Context;
use url::form_urlencoded;

use crate::asset::{AssetType, MinifyTransform, Pipeline, PublicRoot, PublicRoots, Transform};
use crate::cache::{CacheBackend, FileCache, MemoryCache, NullCache, RenderCache};
use crate::config::{BundleConfig, CacheBackendKind};
use crate::error::Result;
use crate::freshness::{Fingerprint, FreshnessResolver};
use crate::group::{FileSet, GroupId, GroupStore};
use crate::registry::Position;
use crate::remote::{DirectoryStore, RemotePublisher, RemoteStore, UrlMode};

/// Local link settings: `{base_url}{controller}/index?group=&type=&lm=`.
#[derive(Debug, Clone)]
pub struct LinkOptions {
    pub base_url: String,
    pub controller: String,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            base_url: "/".into(),
            controller: "asset".into(),
        }
    }
}

/// Entry point for page rendering (`create_group`) and for the asset
/// endpoint (`group_source`).
pub struct Bundler {
    groups: Arc<GroupStore>,
    freshness: FreshnessResolver,
    render: RenderCache,
    pipeline: Pipeline,
    publisher: Option<RemotePublisher>,
    links: LinkOptions,
}

impl Bundler {
    /// Assemble a bundler from explicit collaborators.
    ///
    /// The same cache backend holds render entries, remote URL entries and
    /// fingerprints.
    pub fn new(
        groups: GroupStore,
        roots: PublicRoots,
        cache: Arc<dyn CacheBackend>,
        freshness: FreshnessResolver,
        transform: Arc<dyn Transform>,
        links: LinkOptions,
    ) -> Self {
        let groups = Arc::new(groups);
        Self {
            pipeline: Pipeline::new(Arc::clone(&groups), roots, transform),
            render: RenderCache::new(Arc::clone(&cache)),
            groups,
            freshness,
            publisher: None,
            links,
        }
    }

    /// Publish to `store` instead of linking to the local endpoint.
    pub fn with_remote(
        mut self,
        cache: Arc<dyn CacheBackend>,
        store: Arc<dyn RemoteStore>,
        mode: UrlMode,
    ) -> Self {
        self.publisher = Some(RemotePublisher::new(cache, store, mode));
        self
    }

    /// Build a bundler from a loaded configuration.
    pub fn from_config(config: &BundleConfig) -> anyhow::Result<Self> {
        let cache: Arc<dyn CacheBackend> = match config.cache.backend {
            CacheBackendKind::Memory => Arc::new(MemoryCache::new()),
            CacheBackendKind::File => Arc::new(FileCache::new(&config.cache.dir)),
            CacheBackendKind::None => Arc::new(NullCache),
        };

        let roots = &config.roots;
        let web = PublicRoot::new(&roots.web, &roots.url)
            .with_context(|| format!("invalid roots.url `{}`", roots.url))?;
        let theme = match (&roots.theme, &roots.theme_url) {
            (Some(path), Some(url)) => Some(
                PublicRoot::new(path, url)
                    .with_context(|| format!("invalid roots.theme_url `{url}`"))?,
            ),
            (Some(path), None) => Some(theme_under_web(&web, path)?),
            _ => None,
        };

        let freshness = FreshnessResolver::new(
            Arc::clone(&cache),
            config.cache.lm_ttl(),
            config.cache.debug,
        );
        let links = LinkOptions {
            base_url: config.groups.base_url.clone(),
            controller: config.groups.controller.trim_matches('/').to_owned(),
        };

        let mut bundler = Self::new(
            GroupStore::new(&config.groups.dir, &config.groups.prefix),
            PublicRoots::new(web, theme),
            Arc::clone(&cache),
            freshness,
            Arc::new(MinifyTransform::new(config.build.minify)),
            links,
        );

        let cdn = &config.cdn;
        if cdn.enable {
            let dir = cdn.dir.as_ref().context("cdn.dir is required")?;
            let url = cdn.url.as_ref().context("cdn.url is required")?;
            let mut store = DirectoryStore::new(dir, url);
            if let Some(ssl_url) = &cdn.ssl_url {
                store = store.with_ssl_base_url(ssl_url);
            }
            let mode = if cdn.ssl { UrlMode::Ssl } else { UrlMode::Standard };
            bundler = bundler.with_remote(cache, Arc::new(store), mode);
        }

        Ok(bundler)
    }

    pub fn groups(&self) -> &GroupStore {
        &self.groups
    }

    pub fn freshness(&self) -> &FreshnessResolver {
        &self.freshness
    }

    /// Persist `files` as a group and return the URL pages should link to.
    pub fn create_group(&self, files: FileSet, ty: AssetType, pos: Position) -> Result<String> {
        let id = self.groups.ensure(&files)?;
        let lm = self.freshness.resolve(&files);

        match &self.publisher {
            Some(publisher) => publisher.publish_or_fetch(&id, &pos.tag(), ty, lm, |id, ty| {
                self.pipeline.build(id, ty)
            }),
            None => Ok(self.local_url(&id, ty, lm)),
        }
    }

    /// Combined source of a group, served by the asset endpoint.
    pub fn group_source(&self, group: &str, ty: AssetType, lm: Option<Fingerprint>) -> Result<String> {
        let id = GroupId::parse(group)?;
        self.render
            .get_or_build(&id, ty, lm, |id, ty| self.pipeline.build(id, ty))
    }

    fn local_url(&self, id: &GroupId, ty: AssetType, lm: Option<Fingerprint>) -> String {
        let lm = lm.map(|lm| lm.to_string()).unwrap_or_default();
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("group", id.as_str())
            .append_pair("type", ty.as_str())
            .append_pair("lm", &lm)
            .finish();
        format!("{}{}/index?{query}", self.links.base_url, self.links.controller)
    }
}

/// Theme root without its own URL: published under the web root's URL.
fn theme_under_web(web: &PublicRoot, path: &std::path::Path) -> anyhow::Result<PublicRoot> {
    let rel = path
        .strip_prefix(&web.path)
        .with_context(|| format!("roots.theme `{}` is outside roots.web and has no theme_url", path.display()))?;
    let mut url = web.url.clone();
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|()| anyhow::anyhow!("roots.url cannot be a base"))?;
        segments.pop_if_empty();
        for part in rel.iter() {
            segments.push(&part.to_string_lossy());
        }
    }
    Ok(PublicRoot::new(path, url.as_str())?)
}
