//! Page data loader.
//!
//! # Responsibilities
//! - Fetch server-provided data for a matched route
//! - Keep it in a shared cache keyed by URL for synchronous reads at render time
//!
//! # Design Decisions
//! - Concurrent loads of the same key share one fetch
//! - A cached value is reused unless the caller forces a reload

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use serde_json::Value;

use crate::loader::source::{DataError, DataSource};
use crate::observability::metrics;
use crate::routing::RouterUrl;

type LoadFuture = Shared<BoxFuture<'static, Result<(), DataError>>>;

/// Loads page data into a shared cache.
pub struct PageDataLoader {
    source: Arc<dyn DataSource>,
    data: Arc<DashMap<String, Value>>,
    inflight: DashMap<String, LoadFuture>,
}

impl PageDataLoader {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self {
            source,
            data: Arc::new(DashMap::new()),
            inflight: DashMap::new(),
        }
    }

    /// Load the data for `url` into the cache.
    pub async fn load_page_data(&self, url: &RouterUrl, force: bool) -> Result<(), DataError> {
        let key = url.data_key();
        if !force && self.data.contains_key(&key) {
            return Ok(());
        }

        let pending = match self.inflight.entry(key.clone()) {
            Entry::Occupied(entry) if !force => entry.get().clone(),
            Entry::Occupied(mut entry) => {
                let fresh = self.start(url.clone(), key.clone());
                entry.insert(fresh.clone());
                fresh
            }
            Entry::Vacant(entry) => {
                let fresh = self.start(url.clone(), key.clone());
                entry.insert(fresh.clone());
                fresh
            }
        };

        let result = pending.clone().await;
        self.inflight.remove_if(&key, |_, f| f.ptr_eq(&pending));
        result
    }

    /// Cached data for `url`, if loaded.
    pub fn get(&self, url: &RouterUrl) -> Option<Value> {
        self.data.get(&url.data_key()).map(|v| v.value().clone())
    }

    pub fn invalidate(&self, url: &RouterUrl) -> bool {
        self.data.remove(&url.data_key()).is_some()
    }

    pub fn clear(&self) {
        self.data.clear();
    }

    fn start(&self, url: RouterUrl, key: String) -> LoadFuture {
        let source = self.source.clone();
        let data = self.data.clone();
        async move {
            tracing::debug!(key = %key, "Loading page data");
            let result = source.fetch(&url).await;
            metrics::record_page_data_load(result.is_ok());
            let value = result?;
            data.insert(key, value);
            Ok(())
        }
        .boxed()
        .shared()
    }
}

impl std::fmt::Debug for PageDataLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageDataLoader")
            .field("cached", &self.data.len())
            .field("inflight", &self.inflight.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct Echo {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DataSource for Echo {
        async fn fetch(&self, url: &RouterUrl) -> Result<Value, DataError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            if url.pathname == "/broken" {
                return Err(DataError::Failed {
                    key: url.data_key(),
                    message: "500".into(),
                });
            }
            Ok(serde_json::json!({ "path": url.pathname, "n": n }))
        }
    }

    fn url(path: &str) -> RouterUrl {
        RouterUrl {
            page_path: path.into(),
            pathname: path.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_load_populates_cache() {
        let source = Arc::new(Echo::default());
        let loader = PageDataLoader::new(source.clone());
        let u = url("/blog/post-1");

        assert!(loader.get(&u).is_none());
        loader.load_page_data(&u, false).await.unwrap();
        assert_eq!(loader.get(&u).unwrap()["path"], "/blog/post-1");

        loader.load_page_data(&u, false).await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        loader.load_page_data(&u, true).await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert_eq!(loader.get(&u).unwrap()["n"], 1);
    }

    #[tokio::test]
    async fn test_concurrent_loads_share_fetch() {
        let source = Arc::new(Echo::default());
        let loader = PageDataLoader::new(source.clone());
        let u = url("/a");
        let (x, y) = tokio::join!(loader.load_page_data(&u, false), loader.load_page_data(&u, false));
        assert!(x.is_ok() && y.is_ok());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_leaves_cache_empty() {
        let loader = PageDataLoader::new(Arc::new(Echo::default()));
        let u = url("/broken");
        assert!(loader.load_page_data(&u, false).await.is_err());
        assert!(loader.get(&u).is_none());
        assert!(!loader.invalidate(&u));
    }
}
