//! App manifest.
//!
//! # Data Flow
//! ```text
//! manifest file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → routing table, module registry, shells
//!
//! With --watch:
//!     watcher.rs detects change
//!     → loader.rs loads new manifest
//!     → hmr diff against the previous one
//!     → add-module / remove-module on the bus
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal manifests
//! - Invalid manifests are rejected whole; the previous one stays active

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{AppConfig, LogFormat, ModuleConfig, ObservabilityConfig};
pub use validation::ValidationError;
pub use watcher::ConfigWatcher;
