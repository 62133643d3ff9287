//! Hot module reload.
//!
//! # Data Flow
//! ```text
//! manifest v1, manifest v2
//!     → diff.rs (added / changed / removed modules)
//!     → bridge.rs
//!         → module registry (register / unregister)
//!         → bus: add-module / remove-module
//!         → router controller (shell swap or route update + popstate)
//! ```

pub mod bridge;
pub mod diff;

pub use bridge::HotReloadBridge;
pub use diff::{diff_manifests, ManifestDiff};
