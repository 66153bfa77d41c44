//! Middleware functions wiring the monitor into an axum router with
//! `axum::middleware::from_fn_with_state`, e.g.:
//!
//! ```rust,no_run
//! use axum::{middleware::from_fn_with_state, routing::get, Router};
//! use axum_console_monitor::{monitor::middleware, ConsoleMonitor, MonitorConfig};
//!
//! let monitor = ConsoleMonitor::new(MonitorConfig::default());
//! let app: Router = Router::new()
//!     .route("/v1/items", get(|| async { "items" }))
//!     .layer(from_fn_with_state(monitor.clone(), middleware::observe));
//! ```
//!
//! [`observe`] covers the full lifecycle on its own. Stacking [`record`]
//! outside it adds an earlier entry firing (before any auth middleware
//! layered in between), whose buffer the later firing overwrites.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use super::capture::{self, RequestTag};
use super::ConsoleMonitor;

/// Entry-only middleware: tags the request, records its line buffer and
/// passes it through untouched.
pub async fn record(
    State(monitor): State<ConsoleMonitor>,
    mut request: Request,
    next: Next,
) -> Response {
    let tag = ensure_tag(&mut request);
    let (snapshot, request) =
        capture::snapshot_request(request, tag, monitor.captures_request_payload()).await;
    monitor.record_entry(&snapshot);
    next.run(request).await
}

/// Full-lifecycle middleware: records the entry, runs the inner service,
/// then completes and flushes the request's buffer.
pub async fn observe(
    State(monitor): State<ConsoleMonitor>,
    mut request: Request,
    next: Next,
) -> Response {
    let tag = ensure_tag(&mut request);
    let (snapshot, request) =
        capture::snapshot_request(request, tag, monitor.captures_request_payload()).await;
    monitor.record_entry(&snapshot);

    let response = next.run(request).await;

    let (snapshot, response) =
        capture::snapshot_response(response, tag.id, monitor.captures_response_source()).await;
    monitor.complete(tag.id, &snapshot);
    response
}

/// Reuses the correlation tag left by an outer monitor layer, or creates
/// one for this request.
fn ensure_tag(request: &mut Request) -> RequestTag {
    if let Some(tag) = request.extensions().get::<RequestTag>() {
        return *tag;
    }
    let tag = RequestTag::new();
    request.extensions_mut().insert(tag);
    tag
}
