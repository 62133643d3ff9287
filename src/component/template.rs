//! Text template components.
//!
//! Placeholders are written `{{path}}`:
//! - `{{slot}}` renders the wrapped element
//! - `{{url.pathname}}` / `{{url.pagePath}}` read the router context
//! - anything else is a dotted path into the props (`{{params.slug}}`,
//!   `{{data.title}}`); query values render their first entry
//!
//! Every value except `{{slot}}` is HTML-escaped. The slot is markup already
//! produced by the wrapped element.

use serde_json::Value;

use crate::component::{escape_html, Component, RenderContext, RenderError};

#[derive(Debug, Clone)]
pub struct TemplateComponent {
    name: String,
    template: String,
}

impl TemplateComponent {
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
        }
    }

    fn resolve(&self, path: &str, cx: &RenderContext<'_>) -> Result<String, RenderError> {
        match path {
            "slot" => return cx.render_slot(),
            "url.pathname" => return Ok(escape_html(&cx.url.pathname)),
            "url.pagePath" => return Ok(escape_html(&cx.url.page_path)),
            _ => {}
        }

        let mut parts = path.split('.');
        let mut current = parts
            .next()
            .and_then(|head| cx.props.get(head))
            .ok_or_else(|| self.missing(path))?;
        for part in parts {
            current = current.get(part).ok_or_else(|| self.missing(path))?;
        }

        let text = match current {
            Value::String(s) => s.clone(),
            Value::Array(items) => match items.first() {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => String::new(),
            },
            Value::Null => String::new(),
            other => other.to_string(),
        };
        Ok(escape_html(&text))
    }

    fn missing(&self, path: &str) -> RenderError {
        RenderError::Failed {
            component: self.name.clone(),
            message: format!("missing prop `{}`", path),
        }
    }
}

impl Component for TemplateComponent {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self, cx: &RenderContext<'_>) -> Result<String, RenderError> {
        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();
        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find("}}") {
                Some(end) => {
                    out.push_str(&self.resolve(after[..end].trim(), cx)?);
                    rest = &after[end + 2..];
                }
                None => {
                    // Unterminated placeholder, emit verbatim.
                    out.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Props;
    use crate::routing::RouterUrl;
    use serde_json::json;

    fn render(template: &str, props: Props) -> Result<String, RenderError> {
        let url = RouterUrl {
            page_path: "/blog/[slug]".into(),
            pathname: "/blog/hello".into(),
            ..Default::default()
        };
        let cx = RenderContext {
            url: &url,
            props: &props,
            slot: None,
        };
        TemplateComponent::new("T", template).render(&cx)
    }

    #[test]
    fn test_placeholders() {
        let props = json!({
            "params": { "slug": "hello" },
            "query": { "tab": ["2", "3"] },
            "data": { "views": 7 }
        });
        let Value::Object(props) = props else { unreachable!() };
        let html = render(
            "{{url.pagePath}} {{params.slug}} {{query.tab}} {{ data.views }}",
            props,
        )
        .unwrap();
        assert_eq!(html, "/blog/[slug] hello 2 7");
    }

    #[test]
    fn test_missing_prop_is_error() {
        let err = render("{{data.title}}", Props::new()).unwrap_err();
        assert!(err.to_string().contains("data.title"));
    }

    #[test]
    fn test_values_are_escaped_but_slot_is_not() {
        let props = json!({
            "params": { "slug": "<script>alert(1)</script>" },
            "query": { "q": ["\"x\" & y"] }
        });
        let Value::Object(props) = props else { unreachable!() };
        let html = render("<h1>{{params.slug}}</h1><p>{{query.q}}</p>", props).unwrap();
        assert_eq!(
            html,
            "<h1>&lt;script&gt;alert(1)&lt;/script&gt;</h1><p>&quot;x&quot; &amp; y</p>"
        );

        let url = RouterUrl {
            pathname: "/a<b".into(),
            ..Default::default()
        };
        let page = crate::component::Element::new(
            std::sync::Arc::new(TemplateComponent::new("Page", "<b>{{url.pathname}}</b>")),
            Props::new(),
        );
        let layout = crate::component::Element::new(
            std::sync::Arc::new(TemplateComponent::new("Layout", "<main>{{slot}}</main>")),
            Props::new(),
        );
        let html = layout.wrapping(page).render(&url).unwrap();
        assert_eq!(html, "<main><b>/a&lt;b</b></main>");
    }

    #[test]
    fn test_unterminated_placeholder() {
        assert_eq!(render("a {{b", Props::new()).unwrap(), "a {{b");
    }
}
