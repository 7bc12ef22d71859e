//! Handler serving generated QR images.

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};

use crate::error::AppError;
use crate::state::AppState;

/// Serves a stored QR PNG by filename.
///
/// # Endpoint
///
/// `GET /qr/{filename}`
///
/// # Errors
///
/// Returns 404 Not Found if the name is not a generated filename or the
/// file does not exist. Path traversal attempts fail the name check.
pub async fn qr_image_handler(
    Path(filename): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let bytes = state.images().read(&filename).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "public, max-age=86400"),
        ],
        bytes,
    ))
}
