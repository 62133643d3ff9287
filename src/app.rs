//! Router assembly from an app manifest.
//!
//! # Responsibilities
//! - Build the routing table, module registry, loaders and environment
//! - Mount a controller on a fresh event bus
//! - Feed manifest reloads through the hot-reload bridge

use std::sync::Arc;

use crate::config::{AppConfig, ModuleConfig};
use crate::controller::{CustomComponents, Resolution, RouterController, RouterServices};
use crate::env::{Environment, MemoryEnvironment};
use crate::events::{EventBus, EventError, PopState};
use crate::hmr::{HotReloadBridge, ManifestDiff};
use crate::loader::{
    DataSource, FsDataSource, MemoryDataSource, ModuleImporter, ModuleRegistry, PageDataLoader,
};
use crate::routing::{RouterUrl, Routing};

/// A mounted router driven by a manifest.
pub struct RouterApp {
    bus: Arc<EventBus>,
    env: Arc<MemoryEnvironment>,
    controller: RouterController,
    bridge: HotReloadBridge,
}

impl RouterApp {
    /// Page data comes from `data_dir` when the manifest sets one.
    pub fn new(config: AppConfig) -> Self {
        let data: Arc<dyn DataSource> = match &config.data_dir {
            Some(dir) => Arc::new(FsDataSource::new(dir.clone())),
            None => Arc::new(MemoryDataSource::new()),
        };
        Self::with_data_source(config, data)
    }

    pub fn with_data_source(config: AppConfig, data: Arc<dyn DataSource>) -> Self {
        let bus = Arc::new(EventBus::new());
        let registry = Arc::new(ModuleRegistry::new());

        let mut env = MemoryEnvironment::new(&format!("{}/", config.base_url));
        if let Some(fixer) = config.scroll {
            env = env.with_scroll_fixer(fixer);
        }
        let env = Arc::new(env);

        let routing = Arc::new(Routing::new(
            config.base_url.clone(),
            config.route_modules(),
        ));
        let custom = CustomComponents {
            e404: config.not_found.as_ref().map(ModuleConfig::export),
            app: config.app.as_ref().map(ModuleConfig::export),
        };
        tracing::info!(
            base_url = %config.base_url,
            routes = routing.len(),
            custom_404 = custom.e404.is_some(),
            custom_app = custom.app.is_some(),
            "Router configured"
        );

        let services = RouterServices {
            bus: bus.clone(),
            importer: Arc::new(ModuleImporter::new(
                config.base_url.clone(),
                registry.clone(),
            )),
            data: Arc::new(PageDataLoader::new(data)),
            env: env.clone(),
        };
        let bridge = HotReloadBridge::new(registry, bus.clone(), config);
        let mut controller = RouterController::new(
            services,
            routing,
            RouterUrl::default(),
            custom,
            Vec::new(),
        );
        controller.mount();

        Self {
            bus,
            env,
            controller,
            bridge,
        }
    }

    /// Navigate to `href`, wait for the route to commit and render it.
    pub async fn render(&self, href: &str) -> String {
        self.env.push_location(href, false);
        let outcome = self.controller.navigate(PopState::navigate()).await;
        if outcome == Resolution::Superseded {
            tracing::debug!(href = %href, "Rendering a newer route");
        }
        self.controller.render()
    }

    /// Switch to a new manifest, announcing every module change on the bus.
    ///
    /// Returns once the shells added by the new manifest are installed, so the
    /// next `render` sees them.
    pub async fn reload(&mut self, next: AppConfig) -> Result<ManifestDiff, EventError> {
        let diff = self.bridge.apply(next)?;
        self.controller.shells_settled().await;
        Ok(diff)
    }

    pub fn config(&self) -> &AppConfig {
        self.bridge.current()
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn env(&self) -> &Arc<MemoryEnvironment> {
        &self.env
    }

    pub fn controller(&self) -> &RouterController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut RouterController {
        &mut self.controller
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    const MANIFEST: &str = r#"
[[pages]]
url = "/pages/index.js"
hash = "a1"
template = "<h1>Home</h1>"

[[pages]]
url = "/pages/blog.js"
hash = "b1"
template = "<main>{{slot}}</main>"

[[pages]]
url = "/pages/blog/[slug].js"
hash = "c1"
template = "<article>{{params.slug}}</article>"

[app]
url = "/app.js"
hash = "d1"
template = "<div id=\"app\">{{slot}}</div>"
"#;

    #[tokio::test]
    async fn test_render_paths() {
        let app = RouterApp::new(parse_config(MANIFEST).unwrap());
        assert!(app.controller().is_mounted());

        assert_eq!(app.render("/").await, "<div id=\"app\"><h1>Home</h1></div>");
        assert_eq!(
            app.render("/blog/hello").await,
            "<div id=\"app\"><main><article>hello</article></main></div>"
        );
        assert!(app.render("/nope").await.contains("404"));
    }

    #[tokio::test]
    async fn test_base_url() {
        let mut config = parse_config(MANIFEST).unwrap();
        config.base_url = "/docs".into();
        config.app = None;
        let app = RouterApp::new(config);
        assert_eq!(app.render("/docs/").await, "<h1>Home</h1>");
        assert_eq!(app.env().location().pathname, "/docs/");
    }
}
