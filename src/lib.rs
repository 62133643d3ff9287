//! Client-side router for file-system routed pages.
//!
//! # Architecture Overview
//!
//! ```text
//!   host (history, viewport)          build / dev server
//!            │                               │
//!            ▼                               ▼
//!   ┌──────────────┐   popstate    ┌──────────────────┐
//!   │  navigation  │──────────────▶│                  │◀── add-module / remove-module (hmr)
//!   └──────────────┘               │    event bus     │
//!                                  │                  │◀── fetch-page-module (prefetch)
//!                                  └────────┬─────────┘
//!                                           ▼
//!                                  ┌──────────────────┐
//!                                  │    controller    │── seq-guarded commits
//!                                  └──┬─────┬─────┬───┘
//!                                     │     │     │
//!                            routing ◀┘     │     └▶ loader (modules, page data)
//!                                           ▼
//!                                  render composition (app / page / 404)
//! ```

pub mod app;
pub mod component;
pub mod config;
pub mod controller;
pub mod env;
pub mod events;
pub mod hmr;
pub mod lifecycle;
pub mod loader;
pub mod navigation;
pub mod observability;
pub mod routing;

pub use app::RouterApp;
pub use config::AppConfig;
pub use controller::RouterController;
pub use events::{EventBus, RouterEvent};
pub use lifecycle::Shutdown;
pub use routing::Routing;
