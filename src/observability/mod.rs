//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Router, loaders, hot-reload bridge produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → stdout via tracing-subscriber
//!     → whatever metrics recorder the host installs
//! ```
//!
//! # Design Decisions
//! - Structured fields (url, hash, seq) on every state transition
//! - Metrics go through the `metrics` facade only

pub mod logging;
pub mod metrics;
