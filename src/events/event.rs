//! Event names and payloads shared by the router and its adapters.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::routing::{ModuleRole, RouteModule};

/// Event channel names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PopState,
    AddModule,
    RemoveModule,
    FetchPageModule,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::PopState => "popstate",
            EventKind::AddModule => "add-module",
            EventKind::RemoveModule => "remove-module",
            EventKind::FetchPageModule => "fetch-page-module",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Navigation trigger payload: `{ type: 'popstate', forceRefetch?, resetScroll? }`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "popstate", rename_all = "camelCase")]
pub struct PopState {
    #[serde(default)]
    pub force_refetch: bool,
    #[serde(default)]
    pub reset_scroll: bool,
}

impl PopState {
    /// Re-resolution after a hot update: bypass the module cache.
    pub fn refetch() -> Self {
        Self {
            force_refetch: true,
            reset_scroll: false,
        }
    }

    /// Programmatic navigation: scroll to top once committed.
    pub fn navigate() -> Self {
        Self {
            force_refetch: false,
            reset_scroll: true,
        }
    }
}

/// Prefetch hint payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchPageModule {
    pub href: String,
}

/// A module together with its role, decoded once when the event is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RouteModule", into = "RouteModule")]
pub struct TaggedModule {
    pub role: ModuleRole,
    pub module: RouteModule,
}

impl From<RouteModule> for TaggedModule {
    fn from(module: RouteModule) -> Self {
        Self {
            role: module.role(),
            module,
        }
    }
}

impl From<TaggedModule> for RouteModule {
    fn from(tagged: TaggedModule) -> Self {
        tagged.module
    }
}

/// A removed module URL together with its role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TaggedUrl {
    pub role: ModuleRole,
    pub url: String,
}

impl From<String> for TaggedUrl {
    fn from(url: String) -> Self {
        Self {
            role: ModuleRole::classify(&url),
            url,
        }
    }
}

impl From<TaggedUrl> for String {
    fn from(tagged: TaggedUrl) -> Self {
        tagged.url
    }
}

/// Everything that travels over the bus.
///
/// On the wire: `{ "event": "<name>", "payload": <payload> }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload")]
pub enum RouterEvent {
    #[serde(rename = "popstate")]
    PopState(PopState),
    #[serde(rename = "add-module")]
    AddModule(TaggedModule),
    #[serde(rename = "remove-module")]
    RemoveModule(TaggedUrl),
    #[serde(rename = "fetch-page-module")]
    FetchPageModule(FetchPageModule),
}

impl RouterEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            RouterEvent::PopState(_) => EventKind::PopState,
            RouterEvent::AddModule(_) => EventKind::AddModule,
            RouterEvent::RemoveModule(_) => EventKind::RemoveModule,
            RouterEvent::FetchPageModule(_) => EventKind::FetchPageModule,
        }
    }

    pub fn add_module(module: RouteModule) -> Self {
        RouterEvent::AddModule(module.into())
    }

    pub fn remove_module(url: impl Into<String>) -> Self {
        RouterEvent::RemoveModule(TaggedUrl::from(url.into()))
    }

    pub fn fetch_page_module(href: impl Into<String>) -> Self {
        RouterEvent::FetchPageModule(FetchPageModule { href: href.into() })
    }

    /// Decode an event from its JSON wire form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_popstate_wire_shape() {
        let event = RouterEvent::PopState(PopState::refetch());
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({
                "event": "popstate",
                "payload": { "type": "popstate", "forceRefetch": true, "resetScroll": false }
            })
        );

        let decoded =
            RouterEvent::from_json(r#"{"event":"popstate","payload":{"type":"popstate"}}"#).unwrap();
        assert_eq!(decoded, RouterEvent::PopState(PopState::default()));
    }

    #[test]
    fn test_module_events_tag_role_on_decode() {
        let add = RouterEvent::from_json(
            r#"{"event":"add-module","payload":{"url":"/app.js","hash":"1"}}"#,
        )
        .unwrap();
        match add {
            RouterEvent::AddModule(tagged) => assert_eq!(tagged.role, ModuleRole::App),
            other => panic!("unexpected event {:?}", other),
        }

        let remove =
            RouterEvent::from_json(r#"{"event":"remove-module","payload":"/pages/a.js"}"#).unwrap();
        assert_eq!(remove.kind(), EventKind::RemoveModule);
        match remove {
            RouterEvent::RemoveModule(tagged) => assert_eq!(tagged.role, ModuleRole::Page),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_fetch_page_module_round_trip_shape() {
        let value = serde_json::to_value(RouterEvent::fetch_page_module("/blog/x")).unwrap();
        assert_eq!(
            value,
            json!({ "event": "fetch-page-module", "payload": { "href": "/blog/x" } })
        );
    }
}
