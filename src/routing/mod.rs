//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Location (pathname, search, hash)
//!     → router.rs (strip base, pick best route)
//!     → matcher.rs (evaluate compiled patterns, extract params)
//!     → Return: (RouterUrl, module chain) or explicit no-match
//!
//! Route Compilation:
//!     RouteModule[] (/pages/**)
//!     → matcher.rs compiles each module URL into a pattern
//!     → router.rs stores them in an atomically swapped snapshot
//!
//! Hot reload:
//!     update(module) / remove_route(url)
//!     → new snapshot, visible to the next lookup only
//! ```
//!
//! # Design Decisions
//! - Deterministic: same input always matches same route
//! - Most specific match wins (static > dynamic > catch-all)
//! - Module roles are tagged once at ingestion (module.rs)

pub mod matcher;
pub mod module;
pub mod router;
pub mod location;

pub use module::{AsyncDeps, ModuleRole, RouteModule};
pub use router::{Routing, SharedRouting};
pub use location::{Location, RouterUrl};
