//! Publish/subscribe bus.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use dashmap::DashMap;
use thiserror::Error;

use crate::events::event::{EventKind, RouterEvent};

/// Error surfaced by `emit`.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("handler for `{event}` failed: {message}")]
    Handler { event: EventKind, message: String },

    #[error("malformed event: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Event handler. Returning an error stops the dispatch.
pub type Handler = Arc<dyn Fn(&RouterEvent) -> Result<(), EventError> + Send + Sync>;

/// Identifies one registration, used to unregister it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

/// A constructed pub/sub channel, shared by reference between the router,
/// the hot-reload channel and the browser adapters.
#[derive(Default)]
pub struct EventBus {
    next_id: AtomicU64,
    handlers: DashMap<EventKind, Vec<(HandlerId, Handler)>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. Handlers for one kind run in insertion order.
    pub fn on(&self, kind: EventKind, handler: Handler) -> HandlerId {
        let id = HandlerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers.entry(kind).or_default().push((id, handler));
        tracing::trace!(event = %kind, id = id.0, "Handler registered");
        id
    }

    /// Unregister a handler. Returns false if it was not registered.
    pub fn off(&self, kind: EventKind, id: HandlerId) -> bool {
        let Some(mut entry) = self.handlers.get_mut(&kind) else {
            return false;
        };
        let before = entry.len();
        entry.retain(|(h, _)| *h != id);
        let removed = entry.len() != before;
        if removed {
            tracing::trace!(event = %kind, id = id.0, "Handler removed");
        }
        removed
    }

    /// Register a handler and get a guard that unregisters it on drop.
    pub fn subscribe(self: &Arc<Self>, kind: EventKind, handler: Handler) -> Subscription {
        let id = self.on(kind, handler);
        Subscription {
            bus: Arc::downgrade(self),
            kind,
            id,
        }
    }

    /// Dispatch synchronously to the handlers registered right now.
    ///
    /// Handlers added during the dispatch do not see this event. The first
    /// handler error aborts the dispatch and is returned.
    pub fn emit(&self, event: &RouterEvent) -> Result<(), EventError> {
        let kind = event.kind();
        let handlers: Vec<Handler> = match self.handlers.get(&kind) {
            Some(entry) => entry.iter().map(|(_, h)| h.clone()).collect(),
            None => return Ok(()),
        };
        tracing::trace!(event = %kind, handlers = handlers.len(), "Dispatching event");
        for handler in handlers {
            handler(event)?;
        }
        Ok(())
    }

    /// Decode a JSON wire message and dispatch it.
    pub fn emit_json(&self, json: &str) -> Result<(), EventError> {
        let event = RouterEvent::from_json(json)?;
        self.emit(&event)
    }

    /// Number of handlers registered for a kind.
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map(|e| e.len()).unwrap_or(0)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: Vec<(EventKind, usize)> = self
            .handlers
            .iter()
            .map(|e| (*e.key(), e.value().len()))
            .collect();
        f.debug_struct("EventBus").field("handlers", &counts).finish()
    }
}

/// RAII registration on an `EventBus`.
#[derive(Debug)]
pub struct Subscription {
    bus: Weak<EventBus>,
    kind: EventKind,
    id: HandlerId,
}

impl Subscription {
    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.off(self.kind, self.id);
        }
    }
}
