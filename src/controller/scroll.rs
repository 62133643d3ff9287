//! Post-commit scroll correction.

use crate::env::{Environment, ScrollTarget};

/// Scroll to the element named by the location's fragment, adjusted by the
/// environment's fixed-offset hints. Returns false when there is nothing to do.
pub fn scroll_to_anchor(env: &dyn Environment) -> bool {
    let location = env.location();
    if location.hash.is_empty() {
        return false;
    }
    let Some(rect) = env.find_element(&location.hash) else {
        tracing::trace!(anchor = %location.hash, "Anchor element not found");
        return false;
    };

    let (scroll_x, scroll_y) = env.scroll_position();
    let fixer = env.scroll_fixer().unwrap_or_default();
    env.scroll_to(ScrollTarget {
        top: rect.top + scroll_y - fixer.offset_top,
        left: rect.left + scroll_x - fixer.offset_left,
        behavior: fixer.behavior,
    });
    true
}

/// Scroll the viewport back to the top-left corner.
pub fn reset_scroll(env: &dyn Environment) {
    env.scroll_to(ScrollTarget::default());
}
