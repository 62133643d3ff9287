//! Route table: lookup of module chains for a location.
//!
//! # Responsibilities
//! - Store compiled page routes keyed by module URL
//! - Resolve a location into a `RouterUrl` and its ordered module chain
//! - Apply incremental updates from the hot-reload channel
//!
//! # Design Decisions
//! - Routes live in an immutable snapshot swapped atomically (`ArcSwap`);
//!   an update only affects lookups that start after it
//! - Explicit no-match (`page_path` empty, empty chain) rather than a default
//! - Deterministic: same location and same snapshot always yield same match

use std::cmp::Ordering;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::routing::matcher::{split_path, RoutePattern};
use crate::routing::module::RouteModule;
use crate::routing::location::{parse_query, Location, RouterUrl};

#[derive(Debug, Clone)]
struct CompiledRoute {
    module: RouteModule,
    pattern: RoutePattern,
}

/// The compiled set of page routes.
#[derive(Debug)]
pub struct Routing {
    base_url: String,
    routes: ArcSwap<Vec<CompiledRoute>>,
}

impl Routing {
    /// Build a route table from page modules.
    ///
    /// Modules outside the pages namespace are ignored with a warning.
    pub fn new(base_url: impl Into<String>, modules: Vec<RouteModule>) -> Self {
        let mut routes = Vec::with_capacity(modules.len());
        for module in modules {
            match RoutePattern::compile(&module.url) {
                Some(pattern) => routes.push(CompiledRoute { module, pattern }),
                None => tracing::warn!(url = %module.url, "Ignoring non-page module in route table"),
            }
        }

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            base_url,
            routes: ArcSwap::from_pointee(routes),
        }
    }

    /// Base path the application is mounted under (no trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Number of compiled routes.
    pub fn len(&self) -> usize {
        self.routes.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve a location into its router URL and module chain
    /// (outer layouts first, the matched page last).
    pub fn create_router(&self, location: &Location) -> (RouterUrl, Vec<RouteModule>) {
        let routes = self.routes.load();
        let pathname = self.strip_base(&location.pathname);
        let query = parse_query(&location.search);
        let segments = split_path(&pathname);

        let mut best: Option<(&CompiledRoute, std::collections::HashMap<String, String>)> = None;
        for route in routes.iter() {
            let Some(params) = route.pattern.matches(&segments) else {
                continue;
            };
            let wins = match &best {
                None => true,
                Some((current, _)) => match route.pattern.specificity(&current.pattern) {
                    Ordering::Greater => true,
                    Ordering::Less => false,
                    Ordering::Equal => route.module.url < current.module.url,
                },
            };
            if wins {
                best = Some((route, params));
            }
        }

        let Some((matched, params)) = best else {
            tracing::debug!(pathname = %pathname, "No route matched");
            return (RouterUrl::not_found(pathname, query), Vec::new());
        };

        let mut layouts: Vec<&CompiledRoute> = routes
            .iter()
            .filter(|r| r.pattern.is_layout_of(&matched.pattern))
            .collect();
        layouts.sort_by_key(|r| r.pattern.depth());

        let mut chain: Vec<RouteModule> = layouts.iter().map(|r| r.module.clone()).collect();
        chain.push(matched.module.clone());

        let url = RouterUrl {
            page_path: matched.pattern.page_path().to_string(),
            pathname,
            params,
            query,
        };
        (url, chain)
    }

    /// Insert or replace the route for `module.url`.
    pub fn update(&self, module: RouteModule) {
        let Some(pattern) = RoutePattern::compile(&module.url) else {
            tracing::warn!(url = %module.url, "Refusing to route a non-page module");
            return;
        };
        let route = CompiledRoute { module, pattern };
        self.routes.rcu(|current| {
            let mut next: Vec<CompiledRoute> = current.iter().cloned().collect();
            match next.iter_mut().find(|r| r.module.url == route.module.url) {
                Some(existing) => *existing = route.clone(),
                None => next.push(route.clone()),
            }
            next
        });
        tracing::debug!(url = %route.module.url, hash = %route.module.hash, "Route updated");
    }

    /// Delete the route for a module URL. Returns false if it was unknown.
    pub fn remove_route(&self, url: &str) -> bool {
        let mut removed = false;
        self.routes.rcu(|current| {
            let next: Vec<CompiledRoute> = current
                .iter()
                .filter(|r| r.module.url != url)
                .cloned()
                .collect();
            removed = next.len() != current.len();
            next
        });
        if removed {
            tracing::debug!(url = %url, "Route removed");
        }
        removed
    }

    /// Current page modules, in table order.
    pub fn modules(&self) -> Vec<RouteModule> {
        self.routes.load().iter().map(|r| r.module.clone()).collect()
    }

    fn strip_base(&self, pathname: &str) -> String {
        let rest = if self.base_url.is_empty() {
            pathname
        } else {
            match pathname.strip_prefix(self.base_url.as_str()) {
                Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
                _ => pathname,
            }
        };
        let trimmed = rest.trim_end_matches('/');
        if trimmed.is_empty() {
            "/".to_string()
        } else if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{}", trimmed)
        }
    }
}

impl Default for Routing {
    fn default() -> Self {
        Self::new("/", Vec::new())
    }
}

/// Shared handle to a route table.
pub type SharedRouting = Arc<Routing>;
