//! Programmatic navigation.
//!
//! Both helpers only talk to the bus, so they work whether or not a
//! controller is mounted.

use crate::env::Environment;
use crate::events::{EventBus, EventError, PopState, RouterEvent};

/// Move to `href` and ask the router to resolve it, scrolling to the top
/// once the new route commits.
pub fn redirect(
    bus: &EventBus,
    env: &dyn Environment,
    href: &str,
    replace: bool,
) -> Result<(), EventError> {
    tracing::debug!(href = %href, replace, "Redirect");
    env.push_location(href, replace);
    bus.emit(&RouterEvent::PopState(PopState::navigate()))
}

/// Hint that `href` is likely to be visited next.
pub fn prefetch(bus: &EventBus, href: &str) -> Result<(), EventError> {
    bus.emit(&RouterEvent::fetch_page_module(href))
}
