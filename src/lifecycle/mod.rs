//! Process lifecycle for the CLI.
//!
//! # Data Flow
//! ```text
//! Ctrl-C (signals.rs) → Shutdown::trigger (shutdown.rs)
//!     → stdin loop and manifest watcher stop
//!     → controller unmounts, process exits
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
