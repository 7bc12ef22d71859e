//! Application error type and HTTP error responses.
//!
//! Every fallible operation in the service returns [`AppError`]. Handlers
//! convert it into a JSON body of the form:
//!
//! ```json
//! { "error": { "code": "not_found", "message": "Short code not found", "details": {} } }
//! ```

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload shared by JSON responses and templates.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Error taxonomy of the service.
///
/// - `Validation` - a required form field is missing or malformed
/// - `NotFound` - unknown short code or image filename
/// - `DuplicateCode` - the store already holds the code (recovered by regeneration)
/// - `ExhaustedRetries` - no free code could be drawn within the attempt budget
/// - `Unauthorized` - admin endpoint accessed without a valid token
/// - `Internal` - storage, rendering or I/O failure
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },
    #[error("{message}")]
    NotFound { message: String, details: Value },
    #[error("{message}")]
    DuplicateCode { message: String, details: Value },
    #[error("{message}")]
    ExhaustedRetries { message: String, details: Value },
    #[error("{message}")]
    Unauthorized { message: String, details: Value },
    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn duplicate_code(code: &str) -> Self {
        Self::DuplicateCode {
            message: "Short code already exists".to_string(),
            details: json!({ "code": code }),
        }
    }

    pub fn exhausted_retries(message: impl Into<String>, details: Value) -> Self {
        Self::ExhaustedRetries {
            message: message.into(),
            details,
        }
    }

    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Stable machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation_error",
            AppError::NotFound { .. } => "not_found",
            AppError::DuplicateCode { .. } => "duplicate_code",
            AppError::ExhaustedRetries { .. } => "exhausted_retries",
            AppError::Unauthorized { .. } => "unauthorized",
            AppError::Internal { .. } => "internal_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::DuplicateCode { .. } => StatusCode::CONFLICT,
            AppError::ExhaustedRetries { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        let (message, details) = match self {
            AppError::Validation { message, details }
            | AppError::NotFound { message, details }
            | AppError::DuplicateCode { message, details }
            | AppError::ExhaustedRetries { message, details }
            | AppError::Unauthorized { message, details }
            | AppError::Internal { message, details } => (message.clone(), details.clone()),
        };

        ErrorInfo {
            code: self.code(),
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(code = self.code(), "{}", self);
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e)
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::internal("I/O error", json!({ "reason": e.to_string() }))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::internal("Corrupt store file", json!({ "reason": e.to_string() }))
    }
}

impl From<image::ImageError> for AppError {
    fn from(e: image::ImageError) -> Self {
        AppError::internal("Image encoding failed", json!({ "reason": e.to_string() }))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields: serde_json::Map<String, Value> = errors
            .field_errors()
            .iter()
            .map(|(field, errs)| {
                let messages: Vec<String> = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                (field.to_string(), json!(messages))
            })
            .collect();

        let message = fields
            .values()
            .filter_map(Value::as_array)
            .flatten()
            .find_map(Value::as_str)
            .unwrap_or("Invalid form input")
            .to_string();

        AppError::bad_request(message, Value::Object(fields))
    }
}

/// Maps SQLx errors onto the service taxonomy.
///
/// Unique violations on the redirect key surface as [`AppError::DuplicateCode`].
pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error()
        && db.is_unique_violation()
    {
        return AppError::DuplicateCode {
            message: "Short code already exists".to_string(),
            details: json!({ "constraint": db.constraint() }),
        };
    }

    if matches!(e, sqlx::Error::RowNotFound) {
        return AppError::not_found("Row not found", json!({}));
    }

    tracing::error!("Database error: {}", e);
    AppError::internal("Database error", json!({}))
}
