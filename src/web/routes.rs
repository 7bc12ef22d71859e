//! Web page route configuration.

use crate::api::middleware::rate_limit::{self, RateLimit};
use crate::state::AppState;
use crate::web::handlers::{dashboard_handler, index_handler, submit_handler};
use axum::{
    Router,
    routing::{MethodRouter, get, post},
};

/// Public generator page.
///
/// # Endpoints
///
/// - `GET /` - Form and counter
/// - `POST /` - Generate a QR code (rate limited when `rate_limit` is set)
pub fn public_routes(rate_limit: Option<RateLimit>, behind_proxy: bool) -> Router<AppState> {
    Router::new().route(
        "/",
        get(index_handler).merge(submit_route(rate_limit, behind_proxy)),
    )
}

/// Admin pages. Callers attach [`crate::api::middleware::admin_auth`].
///
/// # Endpoints
///
/// - `GET /admin/dashboard` - All records newest first
pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/admin/dashboard", get(dashboard_handler))
}

fn submit_route(limit: Option<RateLimit>, behind_proxy: bool) -> MethodRouter<AppState> {
    let route = post(submit_handler);

    let Some(limit) = limit else {
        return route;
    };

    if behind_proxy {
        if let Some(governor) = rate_limit::proxy_layer(limit) {
            return route.layer(governor);
        }
    } else if let Some(governor) = rate_limit::layer(limit) {
        return route.layer(governor);
    }

    tracing::warn!(?limit, "Invalid rate limit quota, submissions are not rate limited");
    route
}
