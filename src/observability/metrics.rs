//! Router metrics.
//!
//! # Metrics
//! - `router_navigations_total` (counter): resolutions by outcome
//!   (`committed`, `not_found`, `superseded`)
//! - `router_module_imports_total` (counter): source loads by result
//! - `router_module_cache_hits_total` (counter): imports served from cache
//! - `router_page_data_loads_total` (counter): data fetches by result
//! - `router_hot_updates_total` (counter): add/remove notifications by role
//! - `router_prefetches_total` (counter): prefetch hints handled
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; the host installs the recorder
//! - Without a recorder every call is a no-op

use metrics::counter;

fn result_label(ok: bool) -> &'static str {
    if ok {
        "ok"
    } else {
        "error"
    }
}

/// Record the outcome of one navigation resolution.
pub fn record_navigation(outcome: &'static str) {
    counter!("router_navigations_total", "outcome" => outcome).increment(1);
}

/// Record a module load that reached the source.
pub fn record_module_import(ok: bool) {
    counter!("router_module_imports_total", "result" => result_label(ok)).increment(1);
}

/// Record an import answered from the module cache.
pub fn record_module_cache_hit() {
    counter!("router_module_cache_hits_total").increment(1);
}

/// Record a page data fetch.
pub fn record_page_data_load(ok: bool) {
    counter!("router_page_data_loads_total", "result" => result_label(ok)).increment(1);
}

/// Record a hot-reload notification.
pub fn record_hot_update(role: &'static str) {
    counter!("router_hot_updates_total", "role" => role).increment(1);
}

/// Record a prefetch hint.
pub fn record_prefetch() {
    counter!("router_prefetches_total").increment(1);
}
