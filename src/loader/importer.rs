//! Module importer with a single-flight cache.
//!
//! # Responsibilities
//! - Resolve a route module to its loaded exports
//! - Cache by `(url, hash)`; a hit never touches the source
//! - Share one in-flight load between concurrent callers
//!
//! # Design Decisions
//! - Cache entries are shared futures; completed ones resolve immediately
//! - Failed loads are evicted so the next caller retries
//! - A new hash for a URL evicts the stale hashes of that URL

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures_util::future::{BoxFuture, FutureExt, Shared};

use crate::component::ModuleExports;
use crate::loader::source::{ImportError, ModuleSource};
use crate::observability::metrics;
use crate::routing::RouteModule;

type ImportResult = Result<Arc<ModuleExports>, ImportError>;
type ImportFuture = Shared<BoxFuture<'static, ImportResult>>;

/// Length of the hash suffix in versioned module URLs.
const HASH_SHORT: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    url: String,
    hash: String,
}

/// Loads and caches route modules.
pub struct ModuleImporter {
    base_url: String,
    source: Arc<dyn ModuleSource>,
    cache: DashMap<CacheKey, ImportFuture>,
}

impl ModuleImporter {
    pub fn new(base_url: impl Into<String>, source: Arc<dyn ModuleSource>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            source,
            cache: DashMap::new(),
        }
    }

    /// Versioned fetch URL: `<base>/_modules/pages/foo.<hash>.js`.
    pub fn fetch_url(&self, module: &RouteModule) -> String {
        let stem = match module.url.rfind('.') {
            Some(dot) if !module.url[dot..].contains('/') => &module.url[..dot],
            _ => module.url.as_str(),
        };
        let short: String = module.hash.chars().take(HASH_SHORT).collect();
        if short.is_empty() {
            format!("{}/_modules{}.js", self.base_url, stem)
        } else {
            format!("{}/_modules{}.{}.js", self.base_url, stem, short)
        }
    }

    /// Import a module, bypassing the cache when `force_refetch` is set.
    pub async fn import_module(&self, module: &RouteModule, force_refetch: bool) -> ImportResult {
        let key = CacheKey {
            url: module.url.clone(),
            hash: module.hash.clone(),
        };

        if !self.cache.contains_key(&key) {
            self.cache
                .retain(|k, _| k.url != key.url || k.hash == key.hash);
        }

        let pending = match self.cache.entry(key.clone()) {
            Entry::Occupied(mut entry) => {
                if force_refetch {
                    tracing::debug!(url = %module.url, hash = %module.hash, "Forced module refetch");
                    let fresh = self.start(module);
                    entry.insert(fresh.clone());
                    fresh
                } else {
                    metrics::record_module_cache_hit();
                    entry.get().clone()
                }
            }
            Entry::Vacant(entry) => {
                let fresh = self.start(module);
                entry.insert(fresh.clone());
                fresh
            }
        };

        let result = pending.clone().await;
        if let Err(e) = &result {
            tracing::warn!(url = %module.url, error = %e, "Module import failed");
            self.cache.remove_if(&key, |_, cached| cached.ptr_eq(&pending));
        }
        result
    }

    /// True if a load for this exact module version is cached or in flight.
    pub fn is_cached(&self, module: &RouteModule) -> bool {
        self.cache.contains_key(&CacheKey {
            url: module.url.clone(),
            hash: module.hash.clone(),
        })
    }

    /// Drop every cached version of a module URL.
    pub fn evict(&self, url: &str) {
        self.cache.retain(|k, _| k.url != url);
    }

    fn start(&self, module: &RouteModule) -> ImportFuture {
        let source = self.source.clone();
        let module = module.clone();
        let fetch_url = self.fetch_url(&module);
        async move {
            tracing::debug!(url = %module.url, fetch_url = %fetch_url, "Importing module");
            let result = source.load(&module, &fetch_url).await.map(Arc::new);
            metrics::record_module_import(result.is_ok());
            result
        }
        .boxed()
        .shared()
    }
}

impl std::fmt::Debug for ModuleImporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleImporter")
            .field("base_url", &self.base_url)
            .field("cached", &self.cache.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Export, TemplateComponent};
    use crate::loader::source::ModuleRegistry;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct Counting {
        inner: ModuleRegistry,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ModuleSource for Counting {
        async fn load(&self, module: &RouteModule, fetch_url: &str) -> Result<ModuleExports, ImportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.inner.load(module, fetch_url).await
        }
    }

    fn counting() -> Arc<Counting> {
        let inner = ModuleRegistry::new();
        inner.register(
            "/pages/index.js",
            Export::Component(Arc::new(TemplateComponent::new("Index", "home"))),
        );
        Arc::new(Counting {
            inner,
            calls: AtomicUsize::new(0),
        })
    }

    #[test]
    fn test_fetch_url() {
        let importer = ModuleImporter::new("/app/", counting());
        let module = RouteModule::new("/pages/blog/[slug].tsx", "0123456789abcdef");
        assert_eq!(importer.fetch_url(&module), "/app/_modules/pages/blog/[slug].012345678.js");
        let unhashed = RouteModule::new("/app.js", "");
        assert_eq!(importer.fetch_url(&unhashed), "/app/_modules/app.js");
    }

    #[tokio::test]
    async fn test_cache_hit_skips_source() {
        let source = counting();
        let importer = ModuleImporter::new("/", source.clone());
        let module = RouteModule::new("/pages/index.js", "h1");

        importer.import_module(&module, false).await.unwrap();
        importer.import_module(&module, false).await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        importer.import_module(&module, true).await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_single_flight() {
        let source = counting();
        let importer = ModuleImporter::new("/", source.clone());
        let module = RouteModule::new("/pages/index.js", "h1");

        let (a, b, c) = tokio::join!(
            importer.import_module(&module, false),
            importer.import_module(&module, false),
            importer.import_module(&module, false),
        );
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        let (a, b, c) = (a.unwrap(), b.unwrap(), c.unwrap());
        assert!(Arc::ptr_eq(&a, &b) && Arc::ptr_eq(&b, &c));
    }

    #[tokio::test]
    async fn test_new_hash_refetches_and_evicts_old() {
        let source = counting();
        let importer = ModuleImporter::new("/", source.clone());
        let v1 = RouteModule::new("/pages/index.js", "h1");
        let v2 = RouteModule::new("/pages/index.js", "h2");

        importer.import_module(&v1, false).await.unwrap();
        importer.import_module(&v2, false).await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert!(!importer.is_cached(&v1));
        assert!(importer.is_cached(&v2));
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let source = counting();
        let importer = ModuleImporter::new("/", source.clone());
        let missing = RouteModule::new("/pages/missing.js", "h1");

        assert!(importer.import_module(&missing, false).await.is_err());
        assert!(!importer.is_cached(&missing));

        source.inner.register(
            "/pages/missing.js",
            Export::Component(Arc::new(TemplateComponent::new("Late", "late"))),
        );
        assert!(importer.import_module(&missing, false).await.is_ok());
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }
}
