//! Route state and shell overrides held by the controller.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::component::{
    DefaultNotFound, Element, Export, MissingComponent, Props, Renderable,
};
use crate::routing::RouterUrl;

/// One entry of a page component tree.
#[derive(Debug, Clone)]
pub struct PageSlot {
    /// Module URL of this slot.
    pub url: String,
    /// The loaded component; `None` while unresolved or when loading failed.
    pub component: Option<Renderable>,
}

impl PageSlot {
    pub fn new(url: impl Into<String>, component: Option<Renderable>) -> Self {
        Self {
            url: url.into(),
            component,
        }
    }
}

/// Ordered module chain of a route, outer layout first, page last.
pub type PageComponentTree = Vec<PageSlot>;

/// The committed route.
///
/// `page` is `None` iff the URL did not match any route.
#[derive(Debug, Clone)]
pub struct RouteState {
    pub page: Option<Renderable>,
    pub page_props: Props,
    /// Layouts wrapping the page, outermost first.
    pub layouts: Vec<Element>,
    pub url: RouterUrl,
}

impl RouteState {
    pub fn not_found(url: RouterUrl) -> Self {
        Self {
            page: None,
            page_props: Props::new(),
            layouts: Vec::new(),
            url,
        }
    }

    /// Build the state from a resolved tree. Unresolved slots degrade to a
    /// diagnostic naming the module.
    pub fn from_tree(tree: &[PageSlot], url: RouterUrl, data: Option<Value>) -> Self {
        let Some((page_slot, layout_slots)) = tree.split_last() else {
            return Self::not_found(url);
        };
        if !url.is_match() {
            return Self::not_found(url);
        }

        let base = page_props(&url, data);
        let layouts = layout_slots
            .iter()
            .map(|slot| {
                let (component, props) = slot_component(slot, &base);
                Element::new(component, props)
            })
            .collect();
        let (page, page_props) = slot_component(page_slot, &base);

        Self {
            page: Some(page),
            page_props,
            layouts,
            url,
        }
    }
}

fn slot_component(slot: &PageSlot, base: &Props) -> (Renderable, Props) {
    match &slot.component {
        Some(c) => (c.clone(), base.clone()),
        None => {
            let mut props = base.clone();
            props.extend(MissingComponent::props(format!("Page: {}", slot.url)));
            (Arc::new(MissingComponent), props)
        }
    }
}

/// Props every page and layout receives: route params, query and page data.
pub fn page_props(url: &RouterUrl, data: Option<Value>) -> Props {
    let params: Map<String, Value> = url
        .params
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();
    let query: Map<String, Value> = url
        .query
        .iter()
        .map(|(k, vs)| {
            (
                k.clone(),
                Value::Array(vs.iter().cloned().map(Value::String).collect()),
            )
        })
        .collect();

    let mut props = Props::new();
    props.insert("params".into(), Value::Object(params));
    props.insert("query".into(), Value::Object(query));
    if let Some(data) = data {
        props.insert("data".into(), data);
    }
    props
}

/// Custom shells supplied at mount time.
#[derive(Debug, Clone, Default)]
pub struct CustomComponents {
    pub e404: Option<Export>,
    pub app: Option<Export>,
}

/// An installed shell: a component plus the props it renders with.
#[derive(Debug, Clone)]
pub struct Shell {
    pub component: Renderable,
    pub props: Props,
}

impl Shell {
    fn new(component: Renderable) -> Self {
        Self {
            component,
            props: Props::new(),
        }
    }

    fn missing(name: &str) -> Self {
        Self {
            component: Arc::new(MissingComponent),
            props: MissingComponent::props(name),
        }
    }

    /// The built-in not-found page.
    pub fn default_not_found() -> Self {
        Self::new(Arc::new(DefaultNotFound))
    }

    /// Not-found shell for an optional custom export.
    pub fn not_found(custom: Option<&Export>) -> Self {
        match custom {
            None => Self::default_not_found(),
            Some(export) => Self::checked(export, "Custom 404 Page"),
        }
    }

    /// App shell for an optional custom export; `None` means no wrapper.
    pub fn app(custom: Option<&Export>) -> Option<Self> {
        custom.map(|export| Self::checked(export, "Custom App"))
    }

    /// Install the export if it is a component, else a diagnostic naming `name`.
    pub fn checked(export: &Export, name: &str) -> Self {
        match export.as_component() {
            Some(component) => Self::new(component),
            None => {
                tracing::warn!(shell = %name, "Custom shell does not export a component");
                Self::missing(name)
            }
        }
    }

    /// Diagnostic shell for a failed import.
    pub fn failed(name: &str) -> Self {
        Self::missing(name)
    }

    pub fn element(&self) -> Element {
        Element::new(self.component.clone(), self.props.clone())
    }
}

/// Everything the render step reads.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub route: Arc<RouteState>,
    pub e404: Shell,
    pub app: Option<Shell>,
    /// Sequence number of the trigger that produced `route` (0 = initial).
    pub seq: u64,
}
