//! Publishing built groups to a remote object store.
//!
//! Objects are named `{pos}-{group}-{lm}.{ext}`, so a given fingerprint maps
//! to exactly one object and older versions share the `{pos}-{group}-`
//! prefix. The publisher keeps a `{group}remote` cache entry pointing at the
//! current URL; when the entry is lost the URL is recovered from the store
//! without rebuilding.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{RemoteError, RemoteStore, UrlMode};
use crate::asset::AssetType;
use crate::cache::CacheBackend;
use crate::error::Result;
use crate::freshness::Fingerprint;
use crate::group::GroupId;
use crate::{debug, log};

#[derive(Debug, Serialize, Deserialize)]
struct RemoteEntry {
    lm: u64,
    url: String,
    group: String,
    pos: String,
}

/// Outcome of removing stale versions of a group.
#[derive(Debug, Default)]
pub struct CleanupReport {
    pub deleted: Vec<String>,
    pub failed: Vec<(String, RemoteError)>,
}

impl CleanupReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct RemotePublisher {
    cache: Arc<dyn CacheBackend>,
    store: Arc<dyn RemoteStore>,
    mode: UrlMode,
}

impl RemotePublisher {
    pub fn new(cache: Arc<dyn CacheBackend>, store: Arc<dyn RemoteStore>, mode: UrlMode) -> Self {
        Self { cache, store, mode }
    }

    /// Remote URL of the group at fingerprint `lm`, building and uploading
    /// it when the store does not have it yet.
    pub fn publish_or_fetch<F>(
        &self,
        id: &GroupId,
        pos: &str,
        ty: AssetType,
        lm: Option<Fingerprint>,
        build: F,
    ) -> Result<String>
    where
        F: FnOnce(&GroupId, AssetType) -> Result<String>,
    {
        let name = object_name(pos, id, lm, ty);

        if let Some(lm) = lm {
            if let Some(url) = self.cached_url(id, lm) {
                return Ok(url);
            }
            if let Some(url) = self.store.url(&name, self.mode)? {
                debug!("publish"; "recovered {} from store", name);
                self.remember(id, pos, lm, &url);
                return Ok(url);
            }
        }

        let report = self.cleanup(&stale_prefix(pos, id));
        for (stale, err) in &report.failed {
            log!("publish"; "failed to delete stale {}: {}", stale, err);
        }

        let source = build(id, ty)?;
        self.store.put(&name, source.as_bytes(), ty.mime())?;
        let url = self
            .store
            .url(&name, self.mode)?
            .ok_or_else(|| RemoteError::MissingUrl(name.clone()))?;
        log!("publish"; "uploaded {} ({} bytes)", name, source.len());

        if let Some(lm) = lm {
            self.remember(id, pos, lm, &url);
        }
        Ok(url)
    }

    /// Delete every object under `prefix`; individual failures are collected.
    pub fn cleanup(&self, prefix: &str) -> CleanupReport {
        let names = match self.store.list(prefix) {
            Ok(names) => names,
            Err(e) => {
                return CleanupReport {
                    deleted: Vec::new(),
                    failed: vec![(prefix.to_owned(), e)],
                };
            }
        };

        names
            .into_iter()
            .map(|name| {
                let result = self.store.delete(&name);
                (name, result)
            })
            .fold(CleanupReport::default(), |mut report, (name, result)| {
                match result {
                    Ok(()) => report.deleted.push(name),
                    Err(e) => report.failed.push((name, e)),
                }
                report
            })
    }

    fn cache_key(id: &GroupId) -> String {
        format!("{id}remote")
    }

    fn cached_url(&self, id: &GroupId, lm: Fingerprint) -> Option<String> {
        let bytes = match self.cache.get(&Self::cache_key(id)) {
            Ok(bytes) => bytes?,
            Err(e) => {
                debug!("publish"; "cache read failed: {}", e);
                return None;
            }
        };
        serde_json::from_slice::<RemoteEntry>(&bytes)
            .ok()
            .filter(|entry| entry.lm == lm.secs())
            .map(|entry| entry.url)
    }

    fn remember(&self, id: &GroupId, pos: &str, lm: Fingerprint, url: &str) {
        let entry = RemoteEntry {
            lm: lm.secs(),
            url: url.to_owned(),
            group: id.to_string(),
            pos: pos.to_owned(),
        };
        let result = serde_json::to_vec(&entry)
            .map_err(Into::into)
            .and_then(|bytes| self.cache.set(&Self::cache_key(id), bytes, None));
        if let Err(e) = result {
            debug!("publish"; "cache write failed: {}", e);
        }
    }
}

/// `{pos}-{group}-` shared by every version of a group.
pub fn stale_prefix(pos: &str, id: &GroupId) -> String {
    format!("{pos}-{id}-")
}

/// Object name of one version; an unavailable fingerprint is written as `0`.
pub fn object_name(pos: &str, id: &GroupId, lm: Option<Fingerprint>, ty: AssetType) -> String {
    let lm = lm.map_or(0, Fingerprint::secs);
    format!("{}{lm}.{}", stale_prefix(pos, id), ty.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::error::AssetError;
    use crate::group::FileSet;
    use parking_lot::Mutex;
    use rustc_hash::FxHashSet;
    use std::path::PathBuf;

    #[derive(Default)]
    struct Recorder {
        objects: Mutex<Vec<String>>,
        puts: Mutex<Vec<String>>,
        lists: Mutex<usize>,
        fail_delete: FxHashSet<String>,
        down: bool,
    }

    impl RemoteStore for Recorder {
        fn url(&self, name: &str, _: UrlMode) -> Result<Option<String>, RemoteError> {
            if self.down {
                return Err(RemoteError::Unavailable("down".into()));
            }
            let found = self.objects.lock().iter().any(|o| o == name);
            Ok(found.then(|| format!("https://cdn.test/{name}")))
        }

        fn put(&self, name: &str, _: &[u8], _: &str) -> Result<(), RemoteError> {
            self.puts.lock().push(name.to_owned());
            self.objects.lock().push(name.to_owned());
            Ok(())
        }

        fn list(&self, prefix: &str) -> Result<Vec<String>, RemoteError> {
            *self.lists.lock() += 1;
            let objects = self.objects.lock();
            Ok(objects.iter().filter(|o| o.starts_with(prefix)).cloned().collect())
        }

        fn delete(&self, name: &str) -> Result<(), RemoteError> {
            if self.fail_delete.contains(name) {
                return Err(RemoteError::Unavailable("delete refused".into()));
            }
            self.objects.lock().retain(|o| o != name);
            Ok(())
        }
    }

    fn gid() -> GroupId {
        GroupId::derive("test", &FileSet::new(vec![PathBuf::from("/www/a.js")]))
    }

    fn publisher(store: Arc<Recorder>) -> (Arc<MemoryCache>, RemotePublisher) {
        let cache = Arc::new(MemoryCache::new());
        let publisher = RemotePublisher::new(cache.clone(), store, UrlMode::Standard);
        (cache, publisher)
    }

    fn built(_: &GroupId, _: AssetType) -> Result<String> {
        Ok("var a=1;".into())
    }

    #[test]
    fn test_object_naming() {
        let id = gid();
        let lm = Some(Fingerprint::from_secs(42));
        assert_eq!(
            object_name("scriptpos2", &id, lm, AssetType::Js),
            format!("scriptpos2-{id}-42.js")
        );
        assert!(object_name("scriptpos5", &id, lm, AssetType::Css).starts_with(&stale_prefix("scriptpos5", &id)));
    }

    #[test]
    fn test_repeated_publish_uploads_once() {
        let store = Arc::new(Recorder::default());
        let (_, publisher) = publisher(store.clone());
        let id = gid();
        let lm = Some(Fingerprint::from_secs(100));

        let first = publisher.publish_or_fetch(&id, "scriptpos2", AssetType::Js, lm, built).unwrap();
        let second = publisher
            .publish_or_fetch(&id, "scriptpos2", AssetType::Js, lm, |_, _| {
                panic!("must not rebuild")
            })
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(store.puts.lock().len(), 1);
        assert_eq!(*store.lists.lock(), 1);
    }

    #[test]
    fn test_recovers_url_after_cache_eviction() {
        let store = Arc::new(Recorder::default());
        let (cache, publisher) = publisher(store.clone());
        let id = gid();
        let lm = Some(Fingerprint::from_secs(100));

        let url = publisher.publish_or_fetch(&id, "scriptpos0", AssetType::Js, lm, built).unwrap();
        cache.clear();

        let again = publisher
            .publish_or_fetch(&id, "scriptpos0", AssetType::Js, lm, |_, _| {
                panic!("must not rebuild")
            })
            .unwrap();
        assert_eq!(url, again);
        assert_eq!(store.puts.lock().len(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_stale_cleanup_survives_failed_delete() {
        let id = gid();
        let prefix = stale_prefix("scriptpos2", &id);
        let stale: Vec<String> = (1..=3).map(|n| format!("{prefix}{n}.js")).collect();
        let store = Arc::new(Recorder {
            objects: Mutex::new(stale.clone()),
            fail_delete: FxHashSet::from_iter([stale[1].clone()]),
            ..Recorder::default()
        });
        let (_, publisher) = publisher(store.clone());

        let lm = Some(Fingerprint::from_secs(100));
        let url = publisher.publish_or_fetch(&id, "scriptpos2", AssetType::Js, lm, built).unwrap();
        assert!(url.ends_with("-100.js"));

        let objects = store.objects.lock();
        assert!(!objects.contains(&stale[0]));
        assert!(objects.contains(&stale[1]));
        assert!(!objects.contains(&stale[2]));
        assert_eq!(store.puts.lock().len(), 1);
    }

    #[test]
    fn test_cleanup_report() {
        let store = Arc::new(Recorder {
            objects: Mutex::new(vec!["p-a".into(), "p-b".into(), "q-c".into()]),
            fail_delete: FxHashSet::from_iter(["p-b".to_string()]),
            ..Recorder::default()
        });
        let (_, publisher) = publisher(store);
        let report = publisher.cleanup("p-");
        assert_eq!(report.deleted, ["p-a"]);
        assert_eq!(report.failed.len(), 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_remote_errors_propagate_uncached() {
        let store = Arc::new(Recorder {
            down: true,
            ..Recorder::default()
        });
        let (cache, publisher) = publisher(store);
        let err = publisher
            .publish_or_fetch(&gid(), "scriptpos2", AssetType::Js, Some(Fingerprint::from_secs(1)), built)
            .unwrap_err();
        assert!(matches!(err, AssetError::RemoteUnavailable(_)));
        assert_eq!(err.status(), 500);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_unavailable_fingerprint_always_rebuilds() {
        let store = Arc::new(Recorder::default());
        let (cache, publisher) = publisher(store.clone());
        let id = gid();
        for _ in 0..2 {
            publisher.publish_or_fetch(&id, "scriptpos2", AssetType::Js, None, built).unwrap();
        }
        assert_eq!(store.puts.lock().len(), 2);
        assert!(cache.is_empty());
    }
}
