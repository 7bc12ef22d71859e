//! Top-level router configuration combining page, redirect and image routes.
//!
//! # Route Structure
//!
//! - `GET  /`                - Generator form and counter (public)
//! - `POST /`                - Generate a labelled QR code (public, rate limited)
//! - `GET  /qr/{filename}`   - Generated PNG (public)
//! - `GET  /r/{code}`        - Short code redirect (public)
//! - `GET  /admin/dashboard` - All records (Bearer token when `ADMIN_TOKEN` is set)
//! - `GET  /health`          - Health check: storage, counter, images (public)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on submissions
//! - **Authentication** - Bearer token on admin pages
//! - **Path normalization** - Trailing slash handling

use crate::api::handlers::{health_handler, qr_image_handler, redirect_handler};
use crate::api::middleware::rate_limit::RateLimit;
use crate::api::middleware::{admin_auth, tracing};
use crate::state::AppState;
use crate::web;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Router construction options taken from configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouterOptions {
    /// When `true`, rate limiting reads the client IP from `X-Forwarded-For` /
    /// `X-Real-IP` instead of the peer socket address. Enable only behind a
    /// trusted reverse proxy.
    pub behind_proxy: bool,
    /// Submission quota; `None` disables rate limiting.
    pub rate_limit: Option<RateLimit>,
}

/// Constructs the router with all routes and middleware except path normalization.
pub fn router(state: AppState, options: RouterOptions) -> Router {
    let admin_router = web::routes::admin_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        admin_auth::layer,
    ));

    Router::new()
        .merge(web::routes::public_routes(
            options.rate_limit,
            options.behind_proxy,
        ))
        .merge(admin_router)
        .route("/qr/{filename}", get(qr_image_handler))
        .route("/r/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application router, trimming trailing slashes before routing.
pub fn app_router(state: AppState, options: RouterOptions) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state, options))
}
