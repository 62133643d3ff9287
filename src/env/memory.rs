//! In-memory environment.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::env::{ElementRect, Environment, ScrollFixer, ScrollTarget};
use crate::routing::Location;

#[derive(Debug, Default)]
struct State {
    location: Location,
    history: Vec<String>,
    scroll: (f64, f64),
    elements: HashMap<String, ElementRect>,
    scrolls: Vec<ScrollTarget>,
}

/// Environment without a browser: location, history and viewport are plain
/// values.
#[derive(Debug, Default)]
pub struct MemoryEnvironment {
    state: Mutex<State>,
    fixer: Option<ScrollFixer>,
}

impl MemoryEnvironment {
    pub fn new(href: &str) -> Self {
        let env = Self::default();
        env.push_location(href, false);
        env
    }

    pub fn with_scroll_fixer(mut self, fixer: ScrollFixer) -> Self {
        self.fixer = Some(fixer);
        self
    }

    /// Change the location without emitting anything, like a browser
    /// back/forward before its `popstate` fires.
    pub fn set_location(&self, href: &str) {
        self.lock().location = Location::parse(href);
    }

    /// Place an element with an id in the viewport.
    pub fn add_element(&self, id: impl Into<String>, rect: ElementRect) {
        self.lock().elements.insert(id.into(), rect);
    }

    /// Every scroll request received so far.
    pub fn scrolls(&self) -> Vec<ScrollTarget> {
        self.lock().scrolls.clone()
    }

    pub fn history(&self) -> Vec<String> {
        self.lock().history.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("environment mutex poisoned")
    }
}

impl Environment for MemoryEnvironment {
    fn location(&self) -> Location {
        self.lock().location.clone()
    }

    fn push_location(&self, href: &str, replace: bool) {
        let mut state = self.lock();
        state.location = Location::parse(href);
        let href = state.location.href();
        if replace {
            state.history.pop();
        }
        state.history.push(href);
    }

    fn scroll_position(&self) -> (f64, f64) {
        self.lock().scroll
    }

    fn scroll_to(&self, target: ScrollTarget) {
        let mut state = self.lock();
        state.scroll = (target.left, target.top);
        state.scrolls.push(target);
    }

    fn find_element(&self, id: &str) -> Option<ElementRect> {
        self.lock().elements.get(id).copied()
    }

    fn scroll_fixer(&self) -> Option<ScrollFixer> {
        self.fixer
    }
}
