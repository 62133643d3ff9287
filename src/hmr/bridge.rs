//! Applies manifest changes to the module registry and the event bus.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::events::{EventBus, EventError, RouterEvent};
use crate::hmr::diff::{diff_manifests, ManifestDiff};
use crate::loader::ModuleRegistry;

/// Keeps a module registry in step with the manifest and announces each
/// change on the bus.
#[derive(Debug)]
pub struct HotReloadBridge {
    registry: Arc<ModuleRegistry>,
    bus: Arc<EventBus>,
    current: AppConfig,
}

impl HotReloadBridge {
    /// Register every module of `config` without emitting anything.
    pub fn new(registry: Arc<ModuleRegistry>, bus: Arc<EventBus>, config: AppConfig) -> Self {
        for module in config.all_modules() {
            registry.register(module.url.clone(), module.export());
        }
        Self {
            registry,
            bus,
            current: config,
        }
    }

    pub fn current(&self) -> &AppConfig {
        &self.current
    }

    /// Switch to `next`: new and changed modules are registered before their
    /// `add-module`, removed ones are dropped after their `remove-module`.
    pub fn apply(&mut self, next: AppConfig) -> Result<ManifestDiff, EventError> {
        let diff = diff_manifests(&self.current, &next);
        self.current = next;

        for module in &diff.added {
            self.registry.register(module.url.clone(), module.export());
            self.bus
                .emit(&RouterEvent::add_module(module.route_module()))?;
        }
        for url in &diff.removed {
            self.bus.emit(&RouterEvent::remove_module(url.clone()))?;
            self.registry.unregister(url);
        }

        if !diff.is_empty() {
            tracing::info!(
                added = diff.added.len(),
                removed = diff.removed.len(),
                "Manifest applied"
            );
        }
        Ok(diff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModuleConfig;
    use crate::events::{EventKind, TaggedModule};
    use std::sync::Mutex;

    fn module(url: &str, hash: &str) -> ModuleConfig {
        ModuleConfig {
            url: url.into(),
            hash: hash.into(),
            data: false,
            template: Some("t".into()),
            name: None,
        }
    }

    #[test]
    fn test_apply_emits_in_order() {
        let registry = Arc::new(ModuleRegistry::new());
        let bus = Arc::new(EventBus::new());
        let seen = Arc::new(Mutex::new(Vec::new()));

        for kind in [EventKind::AddModule, EventKind::RemoveModule] {
            let seen = seen.clone();
            bus.on(
                kind,
                Arc::new(move |event: &RouterEvent| {
                    let entry = match event {
                        RouterEvent::AddModule(TaggedModule { module, .. }) => {
                            format!("+{}@{}", module.url, module.hash)
                        }
                        RouterEvent::RemoveModule(tagged) => format!("-{}", tagged.url),
                        _ => String::new(),
                    };
                    seen.lock().unwrap().push(entry);
                    Ok(())
                }),
            );
        }

        let initial = AppConfig {
            pages: vec![module("/pages/a.js", "1"), module("/pages/b.js", "1")],
            ..Default::default()
        };
        let mut bridge = HotReloadBridge::new(registry.clone(), bus, initial);
        assert!(registry.contains("/pages/b.js"));
        assert!(seen.lock().unwrap().is_empty());

        let next = AppConfig {
            pages: vec![module("/pages/a.js", "2")],
            not_found: Some(module("/404.js", "1")),
            ..Default::default()
        };
        let diff = bridge.apply(next).unwrap();
        assert_eq!(diff.added.len(), 2);
        assert_eq!(
            *seen.lock().unwrap(),
            vec!["+/pages/a.js@2", "+/404.js@1", "-/pages/b.js"]
        );
        assert!(!registry.contains("/pages/b.js"));
        assert!(registry.contains("/404.js"));
        assert_eq!(bridge.current().pages.len(), 1);
    }
}
