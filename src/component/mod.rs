//! Component model.
//!
//! # Data Flow
//! ```text
//! Module source
//!     → ModuleExports { default: Export }
//!     → Export::as_component() (plausibility check)
//!     → Renderable (Arc<dyn Component>)
//!     → Element { component, props, slot } → String
//! ```
//!
//! # Design Decisions
//! - The router never inspects a component beyond `name` and `render`
//! - A default export that is plain data is an invalid component, not an error
//! - Render errors are values; the composition boundary turns them into text

pub mod fallback;
pub mod template;

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::routing::RouterUrl;

pub use fallback::{DefaultNotFound, MissingComponent};
pub use template::TemplateComponent;

/// Props passed to a component.
pub type Props = Map<String, Value>;

/// Error raised while rendering a component.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("component `{component}` failed to render: {message}")]
    Failed { component: String, message: String },
}

/// Opaque renderable capability.
pub trait Component: Send + Sync + fmt::Debug {
    /// Display name, used in logs and diagnostics.
    fn name(&self) -> &str;

    /// Render the component to markup.
    fn render(&self, cx: &RenderContext<'_>) -> Result<String, RenderError>;
}

/// Shared handle to a component.
pub type Renderable = Arc<dyn Component>;

/// What a component sees while rendering.
pub struct RenderContext<'a> {
    /// Router URL provided by the enclosing router context.
    pub url: &'a RouterUrl,
    pub props: &'a Props,
    /// The wrapped element (the page for an app shell or a layout).
    pub slot: Option<&'a Element>,
}

impl RenderContext<'_> {
    /// Render the wrapped element, or nothing when there is none.
    pub fn render_slot(&self) -> Result<String, RenderError> {
        match self.slot {
            Some(el) => el.render(self.url),
            None => Ok(String::new()),
        }
    }
}

/// A component instantiated with props, optionally wrapping another element.
#[derive(Debug, Clone)]
pub struct Element {
    pub component: Renderable,
    pub props: Props,
    pub slot: Option<Box<Element>>,
}

impl Element {
    pub fn new(component: Renderable, props: Props) -> Self {
        Self {
            component,
            props,
            slot: None,
        }
    }

    pub fn wrapping(mut self, child: Element) -> Self {
        self.slot = Some(Box::new(child));
        self
    }

    pub fn name(&self) -> &str {
        self.component.name()
    }

    pub fn render(&self, url: &RouterUrl) -> Result<String, RenderError> {
        let cx = RenderContext {
            url,
            props: &self.props,
            slot: self.slot.as_deref(),
        };
        self.component.render(&cx)
    }
}

/// Escape text for inclusion in markup.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// A module's default export.
#[derive(Debug, Clone)]
pub enum Export {
    Component(Renderable),
    /// Plain data; never a valid component.
    Value(Value),
}

impl Export {
    /// The component, if this export is plausibly one.
    pub fn as_component(&self) -> Option<Renderable> {
        match self {
            Export::Component(c) => Some(c.clone()),
            Export::Value(_) => None,
        }
    }
}

/// A loaded module.
#[derive(Debug, Clone)]
pub struct ModuleExports {
    pub default: Export,
}

impl ModuleExports {
    pub fn component(component: Renderable) -> Self {
        Self {
            default: Export::Component(component),
        }
    }

    pub fn value(value: Value) -> Self {
        Self {
            default: Export::Value(value),
        }
    }
}
