//! Handler for short code redirects.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its destination URL.
///
/// # Endpoint
///
/// `GET /r/{code}`
///
/// Returns `302 Found` with `Location` set to the stored destination.
///
/// # Errors
///
/// Returns 404 Not Found if the code is malformed, unknown or expired.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let record = state.redirect_service.resolve(&code).await?;

    tracing::debug!(code = %record.code, "Redirecting");

    Ok((
        StatusCode::FOUND,
        [(header::LOCATION, record.destination_url)],
    ))
}
