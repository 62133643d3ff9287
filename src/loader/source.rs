//! Module and data sources.
//!
//! # Responsibilities
//! - Define the transport seams the importer and data loader call into
//! - Provide an in-memory module registry (fed by the manifest / hot reload)
//! - Provide filesystem-backed and in-memory page data sources
//!
//! # Design Decisions
//! - Errors are `Clone` so a single in-flight load can hand the same
//!   outcome to every waiter

use std::path::PathBuf;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use thiserror::Error;

use crate::component::{Export, ModuleExports};
use crate::routing::{RouteModule, RouterUrl};

/// Failure to resolve a module.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ImportError {
    #[error("module `{url}` not found")]
    NotFound { url: String },

    #[error("failed to load module `{url}`: {message}")]
    Failed { url: String, message: String },
}

/// Failure to load page data.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DataError {
    #[error("no page data for `{key}`")]
    NotFound { key: String },

    #[error("failed to load page data for `{key}`: {message}")]
    Failed { key: String, message: String },
}

/// Resolves module references to loaded modules.
#[async_trait]
pub trait ModuleSource: Send + Sync {
    /// Load `module`; `fetch_url` is the versioned URL the importer derived.
    async fn load(&self, module: &RouteModule, fetch_url: &str) -> Result<ModuleExports, ImportError>;
}

/// Fetches server-provided page data.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch(&self, url: &RouterUrl) -> Result<Value, DataError>;
}

/// In-memory module source. Hot reload swaps entries in place.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: DashMap<String, Export>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace the default export of a module URL.
    pub fn register(&self, url: impl Into<String>, export: Export) {
        self.modules.insert(url.into(), export);
    }

    pub fn unregister(&self, url: &str) -> bool {
        self.modules.remove(url).is_some()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.modules.contains_key(url)
    }
}

#[async_trait]
impl ModuleSource for ModuleRegistry {
    async fn load(&self, module: &RouteModule, fetch_url: &str) -> Result<ModuleExports, ImportError> {
        tracing::trace!(url = %module.url, fetch_url = %fetch_url, "Loading module from registry");
        self.modules
            .get(&module.url)
            .map(|e| ModuleExports {
                default: e.value().clone(),
            })
            .ok_or_else(|| ImportError::NotFound {
                url: module.url.clone(),
            })
    }
}

/// Page data read from JSON files: `<root>/<pathname>.json`, `/` maps to
/// `index.json`.
#[derive(Debug, Clone)]
pub struct FsDataSource {
    root: PathBuf,
}

impl FsDataSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// File holding the data of a pathname.
    pub fn path_for(&self, url: &RouterUrl) -> PathBuf {
        let rel = url.pathname.trim_matches('/');
        let rel = if rel.is_empty() { "index" } else { rel };
        self.root.join(format!("{}.json", rel))
    }
}

#[async_trait]
impl DataSource for FsDataSource {
    async fn fetch(&self, url: &RouterUrl) -> Result<Value, DataError> {
        let key = url.data_key();
        let path = self.path_for(url);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DataError::NotFound { key });
            }
            Err(e) => {
                return Err(DataError::Failed {
                    key,
                    message: e.to_string(),
                })
            }
        };
        serde_json::from_str(&content).map_err(|e| DataError::Failed {
            key,
            message: e.to_string(),
        })
    }
}

/// Page data held in memory, keyed by pathname.
#[derive(Debug, Default)]
pub struct MemoryDataSource {
    pages: DashMap<String, Value>,
}

impl MemoryDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, pathname: impl Into<String>, data: Value) {
        self.pages.insert(pathname.into(), data);
    }
}

#[async_trait]
impl DataSource for MemoryDataSource {
    async fn fetch(&self, url: &RouterUrl) -> Result<Value, DataError> {
        self.pages
            .get(&url.pathname)
            .map(|v| v.value().clone())
            .ok_or_else(|| DataError::NotFound {
                key: url.data_key(),
            })
    }
}
