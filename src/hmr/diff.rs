//! Manifest diffing.

use std::collections::HashMap;

use crate::config::{AppConfig, ModuleConfig};

/// Module-level changes between two manifests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManifestDiff {
    /// New modules and modules whose build output changed.
    pub added: Vec<ModuleConfig>,
    /// URLs no longer present.
    pub removed: Vec<String>,
}

impl ManifestDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Compare two manifests module by module, shells included.
///
/// `added` follows the new manifest's order and `removed` the old one's.
pub fn diff_manifests(old: &AppConfig, new: &AppConfig) -> ManifestDiff {
    let before: HashMap<&str, &ModuleConfig> =
        old.all_modules().map(|m| (m.url.as_str(), m)).collect();
    let after: HashMap<&str, &ModuleConfig> =
        new.all_modules().map(|m| (m.url.as_str(), m)).collect();

    let added = new
        .all_modules()
        .filter(|m| before.get(m.url.as_str()).copied() != Some(*m))
        .cloned()
        .collect();
    let removed = old
        .all_modules()
        .filter(|m| !after.contains_key(m.url.as_str()))
        .map(|m| m.url.clone())
        .collect();

    ManifestDiff { added, removed }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(url: &str, hash: &str) -> ModuleConfig {
        ModuleConfig {
            url: url.into(),
            hash: hash.into(),
            data: false,
            template: Some("x".into()),
            name: None,
        }
    }

    #[test]
    fn test_diff() {
        let old = AppConfig {
            pages: vec![module("/pages/index.js", "a"), module("/pages/old.js", "b")],
            app: Some(module("/app.js", "c")),
            ..Default::default()
        };
        let new = AppConfig {
            pages: vec![module("/pages/index.js", "a2"), module("/pages/new.js", "d")],
            app: Some(module("/app.js", "c")),
            ..Default::default()
        };

        let diff = diff_manifests(&old, &new);
        let added: Vec<&str> = diff.added.iter().map(|m| m.url.as_str()).collect();
        assert_eq!(added, vec!["/pages/index.js", "/pages/new.js"]);
        assert_eq!(diff.removed, vec!["/pages/old.js".to_string()]);
    }

    #[test]
    fn test_identical_manifests() {
        let config = AppConfig {
            pages: vec![module("/pages/index.js", "a")],
            ..Default::default()
        };
        assert!(diff_manifests(&config, &config.clone()).is_empty());
    }
}
