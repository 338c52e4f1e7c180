//! Dashboard router.
//!
//! Browser routes (HTML, session cookie) at the root, JSON under `/api/`.
//!
//! Middleware stack (outermost → innermost):
//! 1. Access logger → 2. Extension(AppContext) → 3. Session (browser routes)

use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::AppContext;

// ═══════════════════════════════════════════════════════════
// Router assembly
// ═══════════════════════════════════════════════════════════

/// Build the full dashboard router.
///
/// Middleware uses `Extension<AppContext>` (injected as the outermost layer
/// of each group). Handlers use `State<AppContext>` via `with_state`.
pub fn build_router(ctx: AppContext) -> Router {
    // Routes that read or move the caller's current view.
    let pages = Router::new()
        .route("/", get(endpoints::pages::index))
        .route(
            "/view/:slug",
            get(endpoints::pages::select_view).post(endpoints::pages::select_view),
        )
        .route("/predict", post(endpoints::pages::submit_prediction))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::session::attach_session))
        .layer(axum::Extension(ctx.clone()));

    let media = Router::new()
        .route("/charts/:index", get(endpoints::media::chart))
        .route("/illustration.png", get(endpoints::media::illustration))
        .with_state(ctx.clone());

    let no_store = || {
        SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        )
    };

    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/predict", post(endpoints::predict::predict))
        .route("/dataset", get(endpoints::data::dataset))
        .with_state(ctx.clone())
        .layer(no_store());

    let session_api = Router::new()
        .route("/session", get(endpoints::data::session))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::session::attach_session))
        .layer(axum::Extension(ctx))
        .layer(no_store());

    Router::new()
        .merge(pages)
        .merge(media)
        .nest("/api", api)
        .nest("/api", session_api)
        .layer(axum::middleware::from_fn(middleware::access::log_access))
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
