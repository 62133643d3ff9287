//! Render composition.
//!
//! # Responsibilities
//! - Pick exactly one root element: app-wrapped page, bare page, or 404 shell
//! - Provide the router URL as context to every component
//! - Isolate render errors (rendered in place, never returned)

use crate::component::{escape_html, Element};
use crate::controller::state::ViewState;
use crate::routing::RouterUrl;

/// One render cycle's output: an error boundary and a router context
/// provider around a single root element.
#[derive(Debug, Clone)]
pub struct Composition {
    /// Value of the router context.
    pub url: RouterUrl,
    pub child: Element,
}

impl Composition {
    /// Render through the error boundary.
    pub fn render_to_string(&self) -> String {
        match self.child.render(&self.url) {
            Ok(html) => html,
            Err(e) => {
                tracing::error!(pathname = %self.url.pathname, error = %e, "Render failed");
                format!("<pre class=\"router-error\">{}</pre>", escape_html(&e.to_string()))
            }
        }
    }
}

/// Compose the root element for the current view.
pub fn compose(view: &ViewState) -> Composition {
    let route = &view.route;
    let child = match (&route.page, &view.app) {
        (Some(page), app) => {
            let mut el = Element::new(page.clone(), route.page_props.clone());
            for layout in route.layouts.iter().rev() {
                el = layout.clone().wrapping(el);
            }
            match app {
                Some(app) => app.element().wrapping(el),
                None => el,
            }
        }
        (None, _) => view.e404.element(),
    };

    Composition {
        url: route.url.clone(),
        child,
    }
}
