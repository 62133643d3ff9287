//! Manifest validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Route modules compile to patterns and are unique
//! - Shells use their reserved URLs
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Pure function: AppConfig → Result<(), Vec<ValidationError>>

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::{AppConfig, ModuleConfig};
use crate::routing::matcher::RoutePattern;
use crate::routing::module::{APP_MODULE, NOT_FOUND_MODULE};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("page module `{url}` is not a route under /pages/")]
    NotARoute { url: String },

    #[error("module `{url}` is listed more than once")]
    Duplicate { url: String },

    #[error("module `{url}` has an empty hash")]
    EmptyHash { url: String },

    #[error("{shell} shell must use `{expected}`, found `{found}`")]
    ShellUrl {
        shell: &'static str,
        expected: &'static str,
        found: String,
    },

    #[error("base_url `{0}` must be empty or start with `/`")]
    BaseUrl(String),

    #[error("unknown log level `{0}`")]
    LogLevel(String),
}

pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !config.base_url.is_empty() && !config.base_url.starts_with('/') {
        errors.push(ValidationError::BaseUrl(config.base_url.clone()));
    }

    let mut seen = HashSet::new();
    for page in &config.pages {
        if RoutePattern::compile(&page.url).is_none() {
            errors.push(ValidationError::NotARoute {
                url: page.url.clone(),
            });
        }
        if !seen.insert(page.url.as_str()) {
            errors.push(ValidationError::Duplicate {
                url: page.url.clone(),
            });
        }
    }

    check_shell(&mut errors, config.not_found.as_ref(), "not_found", NOT_FOUND_MODULE);
    check_shell(&mut errors, config.app.as_ref(), "app", APP_MODULE);

    for module in config.all_modules() {
        if module.hash.trim().is_empty() {
            errors.push(ValidationError::EmptyHash {
                url: module.url.clone(),
            });
        }
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::LogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_shell(
    errors: &mut Vec<ValidationError>,
    module: Option<&ModuleConfig>,
    shell: &'static str,
    expected: &'static str,
) {
    if let Some(module) = module {
        if module.url != expected {
            errors.push(ValidationError::ShellUrl {
                shell,
                expected,
                found: module.url.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(url: &str, hash: &str) -> ModuleConfig {
        ModuleConfig {
            url: url.into(),
            hash: hash.into(),
            data: false,
            template: None,
            name: None,
        }
    }

    #[test]
    fn test_valid_config() {
        let config = AppConfig {
            pages: vec![page("/pages/index.js", "a1"), page("/pages/about.js", "b2")],
            app: Some(page("/app.js", "c3")),
            ..Default::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let config = AppConfig {
            base_url: "docs".into(),
            pages: vec![
                page("/components/button.js", "a1"),
                page("/pages/index.js", "b2"),
                page("/pages/index.js", ""),
            ],
            not_found: Some(page("/pages/404.js", "c3")),
            ..Default::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::BaseUrl("docs".into())));
        assert!(errors.contains(&ValidationError::NotARoute {
            url: "/components/button.js".into()
        }));
        assert!(errors.contains(&ValidationError::Duplicate {
            url: "/pages/index.js".into()
        }));
        assert!(errors.contains(&ValidationError::EmptyHash {
            url: "/pages/index.js".into()
        }));
        assert!(matches!(
            errors.iter().find(|e| matches!(e, ValidationError::ShellUrl { .. })),
            Some(ValidationError::ShellUrl { shell: "not_found", .. })
        ));
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn test_log_level() {
        let mut config = AppConfig::default();
        config.observability.log_level = "verbose".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::LogLevel("verbose".into())]);
    }
}
