//! Event subsystem.
//!
//! # Data Flow
//! ```text
//! Browser adapter ──popstate──────────┐
//! Hot-reload channel ──add/remove-module──→ EventBus::emit → handlers (in order)
//! Prefetch adapter ──fetch-page-module┘
//! ```
//!
//! # Design Decisions
//! - The bus is a constructed object passed by reference, not a global
//! - Dispatch is synchronous over a snapshot of the registered handlers
//! - Handler errors propagate to the emitter

pub mod bus;
pub mod event;

pub use bus::{EventBus, EventError, Handler, HandlerId, Subscription};
pub use event::{EventKind, FetchPageModule, PopState, RouterEvent, TaggedModule, TaggedUrl};
