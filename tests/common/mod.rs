//! Shared utilities for router integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::{watch, Notify};

use page_router::component::{Export, ModuleExports, TemplateComponent};
use page_router::controller::{
    CustomComponents, RouterController, RouterServices, ViewState,
};
use page_router::env::MemoryEnvironment;
use page_router::events::EventBus;
use page_router::loader::{
    ImportError, MemoryDataSource, ModuleImporter, ModuleSource, PageDataLoader,
};
use page_router::routing::{RouteModule, RouterUrl, Routing};

/// Component export rendering `template`.
pub fn template(name: &str, template: &str) -> Export {
    Export::Component(Arc::new(TemplateComponent::new(name, template)))
}

/// Module source that counts loads and can hold a URL until released.
#[derive(Default)]
pub struct TestSource {
    exports: DashMap<String, Export>,
    gates: DashMap<String, Arc<Notify>>,
    loads: Mutex<Vec<(String, String)>>,
}

impl TestSource {
    pub fn insert(&self, url: &str, export: Export) {
        self.exports.insert(url.to_string(), export);
    }

    /// Loads of `url` wait until `release` is called.
    pub fn hold(&self, url: &str) {
        self.gates.insert(url.to_string(), Arc::new(Notify::new()));
    }

    pub fn release(&self, url: &str) {
        if let Some((_, gate)) = self.gates.remove(url) {
            gate.notify_one();
        }
    }

    /// Number of loads of `url` that reached the source.
    pub fn loads_of(&self, url: &str) -> usize {
        self.loads().iter().filter(|(u, _)| u == url).count()
    }

    /// Every `(url, hash)` pair loaded, in order.
    pub fn loads(&self) -> Vec<(String, String)> {
        self.loads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModuleSource for TestSource {
    async fn load(&self, module: &RouteModule, _fetch_url: &str) -> Result<ModuleExports, ImportError> {
        self.loads
            .lock()
            .unwrap()
            .push((module.url.clone(), module.hash.clone()));

        let gate = self.gates.get(&module.url).map(|g| g.value().clone());
        if let Some(gate) = gate {
            gate.notified().await;
        }

        match self.exports.get(&module.url) {
            Some(export) => Ok(ModuleExports {
                default: export.value().clone(),
            }),
            None => Err(ImportError::NotFound {
                url: module.url.clone(),
            }),
        }
    }
}

/// A controller wired to in-memory collaborators.
pub struct Harness {
    pub bus: Arc<EventBus>,
    pub source: Arc<TestSource>,
    pub data: Arc<MemoryDataSource>,
    pub loader: Arc<PageDataLoader>,
    pub env: Arc<MemoryEnvironment>,
    pub controller: RouterController,
}

impl Harness {
    /// Mounted controller at `href` over `modules`. Every module gets a
    /// template export named after its URL unless the test replaces it.
    pub fn new(href: &str, modules: Vec<RouteModule>, custom: CustomComponents) -> Self {
        let source = Arc::new(TestSource::default());
        for module in &modules {
            source.insert(&module.url, template(&module.url, &format!("[{}]{{{{slot}}}}", module.url)));
        }
        let data = Arc::new(MemoryDataSource::new());
        let loader = Arc::new(PageDataLoader::new(data.clone()));
        let bus = Arc::new(EventBus::new());
        let env = Arc::new(MemoryEnvironment::new(href));

        let services = RouterServices {
            bus: bus.clone(),
            importer: Arc::new(ModuleImporter::new("", source.clone())),
            data: loader.clone(),
            env: env.clone(),
        };
        let routing = Arc::new(Routing::new("", modules));
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
            source,
            data,
            loader,
            env,
            controller,
        }
    }
}

/// Wait until the view satisfies `pred`, failing after a second.
pub async fn wait_for<F>(rx: &mut watch::Receiver<ViewState>, pred: F) -> ViewState
where
    F: FnMut(&ViewState) -> bool,
{
    let view = tokio::time::timeout(Duration::from_secs(1), rx.wait_for(pred))
        .await
        .expect("timed out waiting for view")
        .expect("controller dropped");
    view.clone()
}

/// Poll `check` until it holds, failing after a second.
pub async fn eventually<F>(mut check: F)
where
    F: FnMut() -> bool,
{
    tokio::time::timeout(Duration::from_secs(1), async {
        while !check() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition never held");
}
