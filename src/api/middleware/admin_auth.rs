//! Bearer token guard for the admin dashboard.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;

use crate::{error::AppError, state::AppState};

/// Requires `Authorization: Bearer <ADMIN_TOKEN>` when an admin token is configured.
///
/// Without a configured token every request passes through.
///
/// # Errors
///
/// Returns `401 Unauthorized` with `WWW-Authenticate: Bearer` if the header
/// is missing, malformed, or carries the wrong token.
///
/// # Example
///
/// ```rust,ignore
/// let admin = Router::new()
///     .route("/admin/dashboard", get(dashboard_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), admin_auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !st.settings.admin_protected() {
        return Ok(next.run(req).await);
    }

    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                serde_json::json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    if !st.settings.admin_token_matches(&token) {
        tracing::warn!("Rejected admin request with invalid token");
        return Err(AppError::unauthorized(
            "Unauthorized",
            serde_json::json!({"reason": "Invalid token"}),
        ));
    }

    Ok(next.run(Request::from_parts(parts, body)).await)
}
