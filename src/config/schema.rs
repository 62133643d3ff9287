//! App manifest schema.
//!
//! The manifest lists every route module the build produced, plus the
//! optional custom shells. All types derive Serde traits for deserialization
//! from TOML.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::component::{Export, TemplateComponent};
use crate::env::ScrollFixer;
use crate::routing::RouteModule;

/// Root manifest.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Prefix every route lives under (e.g. "/docs").
    pub base_url: String,

    /// Route modules under `/pages/`.
    pub pages: Vec<ModuleConfig>,

    /// Custom not-found shell (`/404.js`).
    pub not_found: Option<ModuleConfig>,

    /// Custom app shell (`/app.js`).
    pub app: Option<ModuleConfig>,

    /// Directory holding page data as JSON files.
    pub data_dir: Option<PathBuf>,

    /// Fixed-offset hints for anchor scrolling.
    pub scroll: Option<ScrollFixer>,

    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Route modules in manifest order.
    pub fn route_modules(&self) -> Vec<RouteModule> {
        self.pages.iter().map(ModuleConfig::route_module).collect()
    }

    /// Every module including shells.
    pub fn all_modules(&self) -> impl Iterator<Item = &ModuleConfig> {
        self.pages
            .iter()
            .chain(self.not_found.iter())
            .chain(self.app.iter())
    }
}

/// One built module.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ModuleConfig {
    pub url: String,

    /// Content hash of the build output.
    pub hash: String,

    /// Page needs server data before rendering.
    #[serde(default)]
    pub data: bool,

    /// Component template. Without one the module exports a plain value.
    #[serde(default)]
    pub template: Option<String>,

    /// Component display name; derived from the URL when absent.
    #[serde(default)]
    pub name: Option<String>,
}

impl ModuleConfig {
    pub fn route_module(&self) -> RouteModule {
        let module = RouteModule::new(self.url.clone(), self.hash.clone());
        if self.data {
            module.with_data()
        } else {
            module
        }
    }

    /// The module's default export.
    pub fn export(&self) -> Export {
        match &self.template {
            Some(template) => Export::Component(Arc::new(TemplateComponent::new(
                self.display_name(),
                template.clone(),
            ))),
            None => Export::Value(Value::Null),
        }
    }

    pub fn display_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        let file = self.url.rsplit('/').next().unwrap_or_default();
        file.split('.').next().unwrap_or_default().to_string()
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Compact,
        }
    }
}
