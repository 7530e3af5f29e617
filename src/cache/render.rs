//! Render cache: GroupId → (fingerprint, built source).

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::CacheBackend;
use crate::asset::AssetType;
use crate::debug;
use crate::error::Result;
use crate::freshness::Fingerprint;
use crate::group::GroupId;

#[derive(Serialize, Deserialize)]
struct Entry<'a> {
    lm: u64,
    #[serde(borrow)]
    source: std::borrow::Cow<'a, str>,
}

/// Caches built group sources, invalidated by fingerprint.
#[derive(Clone)]
pub struct RenderCache {
    backend: Arc<dyn CacheBackend>,
}

impl RenderCache {
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self { backend }
    }

    /// Return the cached source when its fingerprint equals `lm`, otherwise
    /// run `build` and store the result.
    ///
    /// An unavailable fingerprint always builds and never stores.
    pub fn get_or_build<F>(
        &self,
        id: &GroupId,
        ty: AssetType,
        lm: Option<Fingerprint>,
        build: F,
    ) -> Result<String>
    where
        F: FnOnce(&GroupId, AssetType) -> Result<String>,
    {
        let Some(lm) = lm else {
            return build(id, ty);
        };

        if let Some(source) = self.lookup(id, lm) {
            return Ok(source);
        }

        let source = build(id, ty)?;
        self.store(id, lm, &source);
        Ok(source)
    }

    fn lookup(&self, id: &GroupId, lm: Fingerprint) -> Option<String> {
        let bytes = match self.backend.get(id.as_str()) {
            Ok(bytes) => bytes?,
            Err(e) => {
                debug!("cache"; "render read {} failed: {}", id, e);
                return None;
            }
        };
        match serde_json::from_slice::<Entry>(&bytes) {
            Ok(entry) if entry.lm == lm.secs() => Some(entry.source.into_owned()),
            Ok(_) => None,
            Err(e) => {
                debug!("cache"; "render entry {} undecodable: {}", id, e);
                None
            }
        }
    }

    fn store(&self, id: &GroupId, lm: Fingerprint, source: &str) {
        let entry = Entry {
            lm: lm.secs(),
            source: source.into(),
        };
        let result = serde_json::to_vec(&entry)
            .map_err(Into::into)
            .and_then(|bytes| self.backend.set(id.as_str(), bytes, None));
        if let Err(e) = result {
            debug!("cache"; "render write {} failed: {}", id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheError, MemoryCache};
    use crate::error::AssetError;
    use crate::group::FileSet;
    use std::cell::Cell;
    use std::path::PathBuf;
    use std::time::Duration;

    fn gid(name: &str) -> GroupId {
        GroupId::derive("test", &FileSet::new(vec![PathBuf::from(name)]))
    }

    fn cache() -> (Arc<MemoryCache>, RenderCache) {
        let backend = Arc::new(MemoryCache::new());
        (backend.clone(), RenderCache::new(backend))
    }

    #[test]
    fn test_hit_miss_overwrite() {
        let (_, cache) = cache();
        let g1 = gid("/g1.js");
        let calls = Cell::new(0);
        let build = |src: &'static str| {
            let calls = &calls;
            move |_: &GroupId, _: AssetType| {
                calls.set(calls.get() + 1);
                Ok(src.to_string())
            }
        };

        let lm = Some(Fingerprint::from_secs(100));
        assert_eq!(cache.get_or_build(&g1, AssetType::Js, lm, build("A;B;")).unwrap(), "A;B;");
        assert_eq!(cache.get_or_build(&g1, AssetType::Js, lm, build("X")).unwrap(), "A;B;");
        assert_eq!(calls.get(), 1);

        // New fingerprint overwrites
        let lm = Some(Fingerprint::from_secs(101));
        assert_eq!(cache.get_or_build(&g1, AssetType::Js, lm, build("C;")).unwrap(), "C;");
        assert_eq!(cache.get_or_build(&g1, AssetType::Js, lm, build("X")).unwrap(), "C;");
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_unavailable_fingerprint_never_cached() {
        let (backend, cache) = cache();
        let g = gid("/g.js");
        for _ in 0..2 {
            let out = cache
                .get_or_build(&g, AssetType::Css, None, |_, _| Ok("a{}".into()))
                .unwrap();
            assert_eq!(out, "a{}");
        }
        assert!(backend.is_empty());
    }

    #[test]
    fn test_build_failure_not_cached() {
        let (backend, cache) = cache();
        let g = gid("/g.js");
        let lm = Some(Fingerprint::from_secs(5));
        let err = cache
            .get_or_build(&g, AssetType::Js, lm, |id, _| {
                Err(AssetError::GroupNotFound(id.to_string()))
            })
            .unwrap_err();
        assert!(matches!(err, AssetError::GroupNotFound(_)));
        assert!(backend.is_empty());
    }

    #[test]
    fn test_corrupt_entry_is_miss() {
        let (backend, cache) = cache();
        let g = gid("/g.js");
        backend.set(g.as_str(), b"garbage".to_vec(), None).unwrap();
        let out = cache
            .get_or_build(&g, AssetType::Js, Some(Fingerprint::from_secs(1)), |_, _| {
                Ok("fresh".into())
            })
            .unwrap();
        assert_eq!(out, "fresh");
        assert!(backend.get(g.as_str()).unwrap().is_some_and(|b| b != b"garbage"));
    }

    struct Broken;

    impl CacheBackend for Broken {
        fn get(&self, _: &str) -> Result<Option<Vec<u8>>, CacheError> {
            Err(CacheError::Corrupt("down".into()))
        }
        fn set(&self, _: &str, _: Vec<u8>, _: Option<Duration>) -> Result<(), CacheError> {
            Err(CacheError::Corrupt("down".into()))
        }
    }

    #[test]
    fn test_backend_errors_degrade_to_build() {
        let cache = RenderCache::new(Arc::new(Broken));
        let g = gid("/g.js");
        let out = cache
            .get_or_build(&g, AssetType::Js, Some(Fingerprint::from_secs(9)), |_, _| {
                Ok("built".into())
            })
            .unwrap();
        assert_eq!(out, "built");
    }
}
