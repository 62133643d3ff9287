//! Route module descriptors.
//!
//! # Responsibilities
//! - Describe one module of a matched module chain (url + content hash)
//! - Tag each module with its role once, when it enters the system
//!
//! # Design Decisions
//! - Reserved URLs (`/404.js`, `/app.js`, `/pages/` prefix) are decoded in
//!   exactly one place: `ModuleRole::classify`
//! - Serde shape matches the hot-reload wire format (`asyncDeps`)

use serde::{Deserialize, Serialize};

/// URL of the custom not-found shell module.
pub const NOT_FOUND_MODULE: &str = "/404.js";

/// URL of the custom application shell module.
pub const APP_MODULE: &str = "/app.js";

/// Namespace prefix of routable page modules.
pub const PAGES_PREFIX: &str = "/pages/";

/// Asynchronous dependencies a module declares.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AsyncDeps {
    /// The module reads server-provided page data at render time.
    pub data: bool,
}

/// A single module in a matched page's module chain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteModule {
    /// Canonical module path, e.g. `/pages/blog/[slug].js`.
    pub url: String,

    /// Content hash; changes whenever the source changes.
    #[serde(default)]
    pub hash: String,

    /// Declared async dependencies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub async_deps: Option<AsyncDeps>,
}

impl RouteModule {
    pub fn new(url: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            hash: hash.into(),
            async_deps: None,
        }
    }

    /// Mark this module as depending on page data.
    pub fn with_data(mut self) -> Self {
        self.async_deps = Some(AsyncDeps { data: true });
        self
    }

    /// True when the module declares a page data dependency.
    pub fn needs_data(&self) -> bool {
        self.async_deps.as_ref().map(|d| d.data).unwrap_or(false)
    }

    pub fn role(&self) -> ModuleRole {
        ModuleRole::classify(&self.url)
    }
}

/// Role of a module, decoded from its reserved URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleRole {
    /// Custom not-found shell (`/404.js`).
    NotFound,
    /// Custom application shell (`/app.js`).
    App,
    /// Routable page or layout under `/pages/`.
    Page,
    /// Anything else (shared components, styles). Ignored by the router.
    Other,
}

impl ModuleRole {
    pub fn classify(url: &str) -> Self {
        match url {
            NOT_FOUND_MODULE => ModuleRole::NotFound,
            APP_MODULE => ModuleRole::App,
            u if u.starts_with(PAGES_PREFIX) => ModuleRole::Page,
            _ => ModuleRole::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleRole::NotFound => "not_found",
            ModuleRole::App => "app",
            ModuleRole::Page => "page",
            ModuleRole::Other => "other",
        }
    }

    /// Human readable shell name used by diagnostics.
    pub fn shell_name(&self) -> Option<&'static str> {
        match self {
            ModuleRole::NotFound => Some("Custom 404 Page"),
            ModuleRole::App => Some("Custom App"),
            _ => None,
        }
    }
}
