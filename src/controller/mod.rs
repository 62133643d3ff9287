//! Router controller.
//!
//! # Responsibilities
//! - Own the committed route, the 404 shell and the app shell
//! - Resolve navigation triggers into a committed route
//! - Apply hot-module updates and prefetch hints arriving on the bus
//!
//! # Data Flow
//! ```text
//! popstate ──► seq = next ──► routing.create_router(location)
//!                               ├─ no match ──► commit (not found)
//!                               └─ chain ──► imports + page data ──► commit if seq is latest
//!
//! add-module / remove-module ──► shell swap, or routing update + popstate
//! fetch-page-module ──► warm importer and data caches, no state change
//! ```
//!
//! # Design Decisions
//! - Every trigger takes a sequence number; only the latest may commit
//! - State is published through a `watch` channel
//! - Bus handlers return immediately and spawn their async work

pub mod render;
pub mod scroll;
pub mod state;

pub use render::{compose, Composition};
pub use state::{CustomComponents, PageComponentTree, PageSlot, RouteState, Shell, ViewState};

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures_util::future::join_all;
use tokio::sync::watch;

use crate::env::Environment;
use crate::events::{
    EventBus, EventError, EventKind, PopState, RouterEvent, Subscription, TaggedModule,
};
use crate::loader::{ModuleImporter, PageDataLoader};
use crate::observability::metrics;
use crate::routing::{Location, ModuleRole, RouteModule, RouterUrl, Routing};

/// Services the controller drives.
#[derive(Clone)]
pub struct RouterServices {
    pub bus: Arc<EventBus>,
    pub importer: Arc<ModuleImporter>,
    pub data: Arc<PageDataLoader>,
    pub env: Arc<dyn Environment>,
}

/// Outcome of one navigation resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Committed,
    NotFound,
    /// A newer trigger started before this one finished.
    Superseded,
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Committed => "committed",
            Resolution::NotFound => "not_found",
            Resolution::Superseded => "superseded",
        }
    }
}

/// Client-side router state machine.
pub struct RouterController {
    inner: Arc<Inner>,
    subscriptions: Vec<Subscription>,
}

struct Inner {
    services: RouterServices,
    routing: Arc<Routing>,
    view: watch::Sender<ViewState>,
    latest: AtomicU64,
    not_found_gen: AtomicU64,
    app_gen: AtomicU64,
    /// Shell imports started by `add-module` that have not finished yet.
    pending_shells: watch::Sender<usize>,
}

impl RouterController {
    /// Create an unmounted controller.
    ///
    /// `url` and `tree` describe the route the host already rendered.
    pub fn new(
        services: RouterServices,
        routing: Arc<Routing>,
        url: RouterUrl,
        custom: CustomComponents,
        tree: PageComponentTree,
    ) -> Self {
        let data = services.data.get(&url);
        let view = ViewState {
            route: Arc::new(RouteState::from_tree(&tree, url, data)),
            e404: Shell::not_found(custom.e404.as_ref()),
            app: Shell::app(custom.app.as_ref()),
            seq: 0,
        };
        let (view, _) = watch::channel(view);

        Self {
            inner: Arc::new(Inner {
                services,
                routing,
                view,
                latest: AtomicU64::new(0),
                not_found_gen: AtomicU64::new(0),
                app_gen: AtomicU64::new(0),
                pending_shells: watch::channel(0).0,
            }),
            subscriptions: Vec::new(),
        }
    }

    /// Register one handler per event channel. Mounting twice is a no-op.
    pub fn mount(&mut self) {
        if self.is_mounted() {
            return;
        }
        let bus = self.inner.services.bus.clone();

        let inner = self.inner.clone();
        self.subscriptions.push(bus.subscribe(
            EventKind::PopState,
            Arc::new(move |event: &RouterEvent| match event {
                RouterEvent::PopState(trigger) => inner.on_popstate(*trigger),
                _ => Ok(()),
            }),
        ));

        let inner = self.inner.clone();
        self.subscriptions.push(bus.subscribe(
            EventKind::AddModule,
            Arc::new(move |event: &RouterEvent| match event {
                RouterEvent::AddModule(tagged) => inner.on_add_module(tagged),
                _ => Ok(()),
            }),
        ));

        let inner = self.inner.clone();
        self.subscriptions.push(bus.subscribe(
            EventKind::RemoveModule,
            Arc::new(move |event: &RouterEvent| match event {
                RouterEvent::RemoveModule(tagged) => inner.on_remove_module(tagged.role, &tagged.url),
                _ => Ok(()),
            }),
        ));

        let inner = self.inner.clone();
        self.subscriptions.push(bus.subscribe(
            EventKind::FetchPageModule,
            Arc::new(move |event: &RouterEvent| match event {
                RouterEvent::FetchPageModule(hint) => inner.on_fetch_page_module(&hint.href),
                _ => Ok(()),
            }),
        ));

        tracing::debug!("Router mounted");
    }

    /// Remove every handler this controller registered.
    pub fn unmount(&mut self) {
        if self.subscriptions.is_empty() {
            return;
        }
        self.subscriptions.clear();
        tracing::debug!("Router unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    /// Watch committed state changes.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.inner.view.subscribe()
    }

    /// Snapshot of the current view.
    pub fn view(&self) -> ViewState {
        self.inner.view.borrow().clone()
    }

    pub fn route(&self) -> Arc<RouteState> {
        self.inner.view.borrow().route.clone()
    }

    pub fn routing(&self) -> &Arc<Routing> {
        &self.inner.routing
    }

    pub fn composition(&self) -> Composition {
        compose(&self.inner.view.borrow())
    }

    /// Render the current view through the error boundary.
    pub fn render(&self) -> String {
        self.composition().render_to_string()
    }

    /// Resolve the environment's current location, as a `popstate` would.
    ///
    /// The sequence number and location are taken when this is called, not
    /// when the returned future is first polled.
    pub fn navigate(&self, trigger: PopState) -> impl Future<Output = Resolution> + '_ {
        let seq = self.inner.next_seq();
        let location = self.inner.services.env.location();
        async move { self.inner.resolve(seq, location, trigger).await }
    }

    /// Wait until every shell announced through `add-module` so far has been
    /// installed or dropped.
    pub async fn shells_settled(&self) {
        let mut pending = self.inner.pending_shells.subscribe();
        // The sender lives in `inner`, so the channel cannot close here.
        let _ = pending.wait_for(|n| *n == 0).await;
    }

    /// Warm the caches for `href` and wait for the loads to settle.
    pub async fn prefetch(&self, href: &str) {
        self.inner.prefetch(href).await
    }
}

impl std::fmt::Debug for RouterController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let view = self.inner.view.borrow();
        f.debug_struct("RouterController")
            .field("mounted", &self.is_mounted())
            .field("page_path", &view.route.url.page_path)
            .field("seq", &view.seq)
            .finish()
    }
}

fn spawn<F>(kind: EventKind, task: F) -> Result<(), EventError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let handle = tokio::runtime::Handle::try_current().map_err(|e| EventError::Handler {
        event: kind,
        message: e.to_string(),
    })?;
    handle.spawn(task);
    Ok(())
}

impl Inner {
    fn next_seq(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn shell_gen(&self, role: ModuleRole) -> Option<&AtomicU64> {
        match role {
            ModuleRole::NotFound => Some(&self.not_found_gen),
            ModuleRole::App => Some(&self.app_gen),
            _ => None,
        }
    }

    fn on_popstate(self: &Arc<Self>, trigger: PopState) -> Result<(), EventError> {
        let seq = self.next_seq();
        let location = self.services.env.location();
        let inner = self.clone();
        spawn(EventKind::PopState, async move {
            inner.resolve(seq, location, trigger).await;
        })
    }

    fn on_add_module(self: &Arc<Self>, tagged: &TaggedModule) -> Result<(), EventError> {
        metrics::record_hot_update(tagged.role.as_str());
        tracing::debug!(url = %tagged.module.url, hash = %tagged.module.hash, "Module added");

        match tagged.role {
            ModuleRole::NotFound | ModuleRole::App => {
                let gen = match self.shell_gen(tagged.role) {
                    Some(counter) => counter.fetch_add(1, Ordering::SeqCst) + 1,
                    None => return Ok(()),
                };
                self.pending_shells.send_modify(|n| *n += 1);
                let inner = self.clone();
                let tagged = tagged.clone();
                let spawned = spawn(EventKind::AddModule, async move {
                    inner.install_shell(tagged, gen).await;
                    inner.pending_shells.send_modify(|n| *n -= 1);
                });
                if spawned.is_err() {
                    self.pending_shells.send_modify(|n| *n -= 1);
                }
                spawned
            }
            ModuleRole::Page => {
                self.routing.update(tagged.module.clone());
                self.services
                    .bus
                    .emit(&RouterEvent::PopState(PopState::refetch()))
            }
            ModuleRole::Other => Ok(()),
        }
    }

    fn on_remove_module(&self, role: ModuleRole, url: &str) -> Result<(), EventError> {
        metrics::record_hot_update(role.as_str());
        tracing::debug!(url = %url, "Module removed");

        if let Some(counter) = self.shell_gen(role) {
            counter.fetch_add(1, Ordering::SeqCst);
        }
        match role {
            ModuleRole::NotFound => {
                self.view
                    .send_modify(|view| view.e404 = Shell::default_not_found());
                Ok(())
            }
            ModuleRole::App => {
                self.view.send_modify(|view| view.app = None);
                Ok(())
            }
            ModuleRole::Page => {
                if self.routing.remove_route(url) {
                    self.services.importer.evict(url);
                }
                self.services
                    .bus
                    .emit(&RouterEvent::PopState(PopState::default()))
            }
            ModuleRole::Other => Ok(()),
        }
    }

    fn on_fetch_page_module(self: &Arc<Self>, href: &str) -> Result<(), EventError> {
        metrics::record_prefetch();
        let inner = self.clone();
        let href = href.to_string();
        spawn(EventKind::FetchPageModule, async move {
            inner.prefetch(&href).await;
        })
    }

    async fn install_shell(&self, tagged: TaggedModule, gen: u64) {
        let role = tagged.role;
        let name = role.shell_name().unwrap_or_default();
        let shell = match self
            .services
            .importer
            .import_module(&tagged.module, true)
            .await
        {
            Ok(exports) => Shell::checked(&exports.default, name),
            Err(e) => {
                tracing::warn!(shell = %name, error = %e, "Custom shell import failed");
                Shell::failed(name)
            }
        };

        let installed = self.view.send_if_modified(|view| {
            let current = self
                .shell_gen(role)
                .map(|counter| counter.load(Ordering::SeqCst));
            if current != Some(gen) {
                return false;
            }
            match role {
                ModuleRole::NotFound => view.e404 = shell,
                ModuleRole::App => view.app = Some(shell),
                _ => return false,
            }
            true
        });
        if installed {
            tracing::info!(shell = %name, "Custom shell installed");
        }
    }

    async fn resolve(&self, seq: u64, location: Location, trigger: PopState) -> Resolution {
        let (url, chain) = self.routing.create_router(&location);
        tracing::debug!(
            seq,
            pathname = %url.pathname,
            page_path = %url.page_path,
            force_refetch = trigger.force_refetch,
            "Resolving route"
        );

        let route = if url.is_match() {
            let imports = join_all(
                chain
                    .iter()
                    .map(|module| self.import_slot(module, trigger.force_refetch)),
            );
            let data = self.load_data(&url, &chain, trigger.force_refetch);
            let (tree, data) = tokio::join!(imports, data);
            RouteState::from_tree(&tree, url, data)
        } else {
            RouteState::not_found(url)
        };

        self.commit(seq, route, trigger)
    }

    async fn import_slot(&self, module: &RouteModule, force: bool) -> PageSlot {
        let component = match self.services.importer.import_module(module, force).await {
            Ok(exports) => exports.default.as_component(),
            Err(e) => {
                tracing::warn!(url = %module.url, error = %e, "Page module unavailable");
                None
            }
        };
        PageSlot::new(module.url.clone(), component)
    }

    async fn load_data(
        &self,
        url: &RouterUrl,
        chain: &[RouteModule],
        force: bool,
    ) -> Option<serde_json::Value> {
        if !chain.iter().any(RouteModule::needs_data) {
            return None;
        }
        if let Err(e) = self.services.data.load_page_data(url, force).await {
            tracing::warn!(pathname = %url.pathname, error = %e, "Page data unavailable");
        }
        self.services.data.get(url)
    }

    fn commit(&self, seq: u64, route: RouteState, trigger: PopState) -> Resolution {
        let outcome = if route.page.is_some() {
            Resolution::Committed
        } else {
            Resolution::NotFound
        };
        let pathname = route.url.pathname.clone();
        let route = Arc::new(route);

        let committed = self.view.send_if_modified(|view| {
            if self.latest.load(Ordering::SeqCst) != seq {
                return false;
            }
            view.route = route;
            view.seq = seq;
            true
        });

        if !committed {
            tracing::debug!(seq, pathname = %pathname, "Discarding superseded resolution");
            metrics::record_navigation(Resolution::Superseded.as_str());
            return Resolution::Superseded;
        }

        tracing::info!(seq, pathname = %pathname, outcome = outcome.as_str(), "Route committed");
        metrics::record_navigation(outcome.as_str());

        let env = self.services.env.as_ref();
        if trigger.reset_scroll {
            scroll::reset_scroll(env);
        }
        scroll::scroll_to_anchor(env);
        outcome
    }

    async fn prefetch(&self, href: &str) {
        let location = Location::parse(href);
        let (url, chain) = self.routing.create_router(&location);
        if !url.is_match() {
            tracing::trace!(href = %href, "Prefetch target has no route");
            return;
        }

        let imports = join_all(chain.iter().map(|module| async move {
            if let Err(e) = self.services.importer.import_module(module, false).await {
                tracing::debug!(url = %module.url, error = %e, "Prefetch import failed");
            }
        }));
        let data = async {
            if chain.iter().any(RouteModule::needs_data) {
                if let Err(e) = self.services.data.load_page_data(&url, false).await {
                    tracing::debug!(href = %href, error = %e, "Prefetch data failed");
                }
            }
        };
        tokio::join!(imports, data);
    }
}
