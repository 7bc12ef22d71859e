//! Generator page: form, counter and the freshly generated code.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use validator::Validate;

use crate::application::services::{Generated, Submission};
use crate::error::AppError;
use crate::state::AppState;

/// Form fields posted by the generator page.
///
/// Missing fields deserialize as empty strings so they are reported as
/// validation errors on the page rather than as a form rejection.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SubmitForm {
    #[serde(default)]
    #[validate(length(max = 2048, message = "Destination URL is too long"))]
    pub qr_data: String,

    #[serde(default)]
    #[validate(length(max = 200, message = "Name is too long"))]
    pub qr_name: String,
}

impl From<SubmitForm> for Submission {
    fn from(form: SubmitForm) -> Self {
        Self {
            destination: form.qr_data,
            display_name: form.qr_name,
        }
    }
}

/// The generated image shown under the form.
#[derive(Debug, Clone)]
pub struct GeneratedView {
    pub image_url: String,
    pub short_url: String,
    pub display_name: String,
    pub destination_url: String,
}

impl From<Generated> for GeneratedView {
    fn from(generated: Generated) -> Self {
        Self {
            image_url: format!("/qr/{}", generated.record.filename),
            short_url: generated.short_url,
            display_name: generated.record.display_name,
            destination_url: generated.record.destination_url,
        }
    }
}

/// Renders `templates/index.html`.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub count: u64,
    pub error: Option<String>,
    pub qr_data: String,
    pub qr_name: String,
    pub generated: Option<GeneratedView>,
}

/// Renders the empty form with the current counter.
///
/// # Endpoint
///
/// `GET /`
pub async fn index_handler(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let count = state.generation_service.current_count().await?;

    Ok(IndexTemplate {
        count,
        error: None,
        qr_data: String::new(),
        qr_name: String::new(),
        generated: None,
    })
}

/// Generates a labelled QR code for the submitted destination.
///
/// # Endpoint
///
/// `POST /` (`application/x-www-form-urlencoded`: `qr_data`, `qr_name`)
///
/// # Responses
///
/// - **200 OK**: page with the image, short URL and updated counter
/// - **422 Unprocessable Entity**: page with the error message, inputs kept,
///   counter unchanged
///
/// Storage and rendering failures propagate as JSON [`AppError`] responses.
pub async fn submit_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    Form(form): Form<SubmitForm>,
) -> Result<Response, AppError> {
    match generate(&state, &headers, &uri, form.clone()).await {
        Ok(generated) => Ok(IndexTemplate {
            count: generated.count,
            error: None,
            qr_data: String::new(),
            qr_name: String::new(),
            generated: Some(generated.into()),
        }
        .into_response()),
        Err(err @ AppError::Validation { .. }) => {
            tracing::debug!("Rejected submission: {}", err);
            let count = state.generation_service.current_count().await?;

            let page = IndexTemplate {
                count,
                error: Some(err.to_string()),
                qr_data: form.qr_data,
                qr_name: form.qr_name,
                generated: None,
            };
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
        Err(err) => Err(err),
    }
}

async fn generate(
    state: &AppState,
    headers: &HeaderMap,
    uri: &Uri,
    form: SubmitForm,
) -> Result<Generated, AppError> {
    form.validate()?;
    let base_url = state.settings.base_url(headers, uri)?;

    state
        .generation_service
        .submit(form.into(), &base_url)
        .await
}
