//! Browser environment capability.
//!
//! # Responsibilities
//! - Expose the current location and history to the router
//! - Expose viewport scrolling and element lookup for scroll correction
//!
//! # Design Decisions
//! - No ambient globals: the controller receives an `Environment`
//! - `MemoryEnvironment` backs tests and the CLI

pub mod memory;

use serde::{Deserialize, Serialize};

use crate::routing::Location;

pub use memory::MemoryEnvironment;

/// How the viewport moves to a scroll target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    #[default]
    Auto,
    Smooth,
    Instant,
}

/// A scroll request.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollTarget {
    pub top: f64,
    pub left: f64,
    pub behavior: Option<ScrollBehavior>,
}

/// Position of an element relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ElementRect {
    pub top: f64,
    pub left: f64,
}

/// Fixed-offset hints, e.g. the height of a sticky header.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ScrollFixer {
    pub offset_top: f64,
    pub offset_left: f64,
    pub behavior: Option<ScrollBehavior>,
}

/// Navigation and viewport capability provided by the host.
pub trait Environment: Send + Sync {
    /// The current location.
    fn location(&self) -> Location;

    /// Record a new history entry (or replace the current one).
    fn push_location(&self, href: &str, replace: bool);

    /// Current scroll offsets `(x, y)`.
    fn scroll_position(&self) -> (f64, f64);

    fn scroll_to(&self, target: ScrollTarget);

    /// Viewport rectangle of the element with this id.
    fn find_element(&self, id: &str) -> Option<ElementRect>;

    fn scroll_fixer(&self) -> Option<ScrollFixer>;
}
