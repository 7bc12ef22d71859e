//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Storage**: Counts redirect records
/// 2. **Counter**: Reads the generation counter
/// 3. **Images**: Checks the image directory exists
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "storage": { "status": "ok", "message": "file, 12 records" },
///     "counter": { "status": "ok", "message": "Count: 12" },
///     "images":  { "status": "ok", "message": "qr_codes" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let storage_check = check_storage(&state).await;

    let counter_check = check_counter(&state).await;

    let images_check = check_images(&state).await;

    let all_healthy = storage_check.is_ok() && counter_check.is_ok() && images_check.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            storage: storage_check,
            counter: counter_check,
            images: images_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_storage(state: &AppState) -> CheckStatus {
    match state.redirect_service.count().await {
        Ok(count) => CheckStatus::ok(format!("{}, {} records", state.settings.storage, count)),
        Err(e) => CheckStatus::error(format!("Storage error: {}", e)),
    }
}

async fn check_counter(state: &AppState) -> CheckStatus {
    match state.generation_service.current_count().await {
        Ok(count) => CheckStatus::ok(format!("Count: {}", count)),
        Err(e) => CheckStatus::error(format!("Counter error: {}", e)),
    }
}

async fn check_images(state: &AppState) -> CheckStatus {
    let root = state.images().root();
    match tokio::fs::metadata(root).await {
        Ok(meta) if meta.is_dir() => CheckStatus::ok(root.display().to_string()),
        Ok(_) => CheckStatus::error(format!("{} is not a directory", root.display())),
        Err(e) => CheckStatus::error(format!("Image directory unavailable: {}", e)),
    }
}
