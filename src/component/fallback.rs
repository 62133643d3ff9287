//! Built-in fallback components.

use serde_json::Value;

use crate::component::{escape_html, Component, Props, RenderContext, RenderError};

/// Props key naming the piece that failed.
pub const NAME_PROP: &str = "name";

/// Diagnostic shown in place of a missing or invalid component.
///
/// Reads the failing piece from the `name` prop, e.g. `"Custom App"`.
#[derive(Debug, Default)]
pub struct MissingComponent;

impl MissingComponent {
    /// Props naming the failed piece.
    pub fn props(name: impl Into<String>) -> Props {
        let mut props = Props::new();
        props.insert(NAME_PROP.to_string(), Value::String(name.into()));
        props
    }
}

impl Component for MissingComponent {
    fn name(&self) -> &str {
        "MissingComponent"
    }

    fn render(&self, cx: &RenderContext<'_>) -> Result<String, RenderError> {
        let name = cx
            .props
            .get(NAME_PROP)
            .and_then(Value::as_str)
            .unwrap_or("Component");
        Ok(format!(
            "<p class=\"router-error\"><code>400</code> - {} is missing or does not export a component</p>",
            escape_html(name)
        ))
    }
}

/// Built-in not-found page.
#[derive(Debug, Default)]
pub struct DefaultNotFound;

impl Component for DefaultNotFound {
    fn name(&self) -> &str {
        "DefaultNotFound"
    }

    fn render(&self, _cx: &RenderContext<'_>) -> Result<String, RenderError> {
        Ok("<p class=\"router-error\"><code>404</code> - page not found</p>".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::RouterUrl;

    #[test]
    fn test_missing_component_names_shell() {
        let url = RouterUrl::default();
        let props = MissingComponent::props("Custom App");
        let cx = RenderContext {
            url: &url,
            props: &props,
            slot: None,
        };
        let html = MissingComponent.render(&cx).unwrap();
        assert!(html.contains("Custom App"));
    }
}
