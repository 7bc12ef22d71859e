//! QR generation workflow.
//!
//! A submission is validated, assigned a fresh short code, rendered to a
//! labelled PNG, persisted as a redirect record and counted. Validation
//! failures have no side effects.

use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

use crate::application::services::RedirectService;
use crate::domain::entities::{NewRedirect, RedirectRecord};
use crate::domain::repositories::CounterRepository;
use crate::error::AppError;
use crate::infrastructure::rendering::{ImageStore, QrRenderer};
use crate::utils::base_url::redirect_url;
use crate::utils::url_normalizer::normalize_url;

/// Raw submission fields as posted by the form.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub destination: String,
    pub display_name: String,
}

/// Result of a successful submission.
#[derive(Debug, Clone)]
pub struct Generated {
    pub record: RedirectRecord,
    /// URL encoded in the QR symbol (`<base>/r/<code>`).
    pub short_url: String,
    /// Counter value after this generation.
    pub count: u64,
}

/// Orchestrates validation, code allocation, rendering and persistence.
pub struct GenerationService {
    redirects: Arc<RedirectService>,
    counter: Arc<dyn CounterRepository>,
    renderer: Arc<dyn QrRenderer>,
    images: ImageStore,
    default_display_name: Option<String>,
    max_insert_attempts: usize,
}

impl GenerationService {
    pub fn new(
        redirects: Arc<RedirectService>,
        counter: Arc<dyn CounterRepository>,
        renderer: Arc<dyn QrRenderer>,
        images: ImageStore,
    ) -> Self {
        Self {
            redirects,
            counter,
            renderer,
            images,
            default_display_name: None,
            max_insert_attempts: 3,
        }
    }

    /// Substitutes `name` for blank display names instead of rejecting them.
    pub fn with_default_display_name(mut self, name: Option<String>) -> Self {
        self.default_display_name = name.filter(|n| !n.trim().is_empty());
        self
    }

    pub fn images(&self) -> &ImageStore {
        &self.images
    }

    pub async fn current_count(&self) -> Result<u64, AppError> {
        self.counter.current().await
    }

    /// Processes one submission.
    ///
    /// # Flow
    ///
    /// 1. Validate fields and normalize the destination
    /// 2. Allocate a code not present in the store
    /// 3. Render `<base_url>/r/<code>` with the display name as label
    /// 4. Write the PNG, then insert the record (atomic insert-if-absent)
    /// 5. Increment the counter
    ///
    /// If the insert loses a race for the code, the image is removed and
    /// steps 2-4 repeat a bounded number of times.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] - empty or malformed fields (no side effects)
    /// - [`AppError::ExhaustedRetries`] - no free code could be found
    /// - [`AppError::Internal`] - rendering or storage failure
    pub async fn submit(
        &self,
        submission: Submission,
        base_url: &str,
    ) -> Result<Generated, AppError> {
        let (destination_url, display_name) = self.validate(&submission)?;

        let mut last_conflict = None;
        for _ in 0..self.max_insert_attempts {
            let code = self.redirects.allocate_code().await?;
            let short_url = redirect_url(base_url, &code);
            let created_at = Utc::now();
            let filename = ImageStore::filename_for(&code, created_at);

            let png = self.render(&short_url, &display_name).await?;
            self.images.write(&filename, &png).await?;

            let new_redirect = NewRedirect {
                code: code.clone(),
                destination_url: destination_url.clone(),
                display_name: display_name.clone(),
                filename: filename.clone(),
                created_at,
            };

            match self.redirects.insert(new_redirect).await {
                Ok(record) => {
                    let count = self.counter.increment().await?;
                    tracing::info!(
                        code = %record.code,
                        filename = %record.filename,
                        count,
                        "Generated QR code"
                    );
                    return Ok(Generated {
                        record,
                        short_url,
                        count,
                    });
                }
                Err(err @ AppError::DuplicateCode { .. }) => {
                    tracing::debug!(code = %code, "Lost insert race for code, retrying");
                    self.images.remove(&filename).await?;
                    last_conflict = Some(err);
                }
                Err(err) => {
                    if let Err(cleanup) = self.images.remove(&filename).await {
                        tracing::warn!(filename = %filename, "Failed to remove orphaned image: {cleanup}");
                    }
                    return Err(err);
                }
            }
        }

        Err(AppError::exhausted_retries(
            "Failed to store redirect record",
            json!({
                "attempts": self.max_insert_attempts,
                "reason": last_conflict.map(|e| e.to_string()),
            }),
        ))
    }

    fn validate(&self, submission: &Submission) -> Result<(String, String), AppError> {
        let destination = submission.destination.trim();
        if destination.is_empty() {
            return Err(AppError::bad_request(
                "Please enter the URL or text to encode",
                json!({ "field": "qr_data" }),
            ));
        }

        let display_name = match (submission.display_name.trim(), &self.default_display_name) {
            ("", Some(placeholder)) => placeholder.clone(),
            ("", None) => {
                return Err(AppError::bad_request(
                    "Please enter a name for the QR code",
                    json!({ "field": "qr_name" }),
                ));
            }
            (name, _) => name.to_string(),
        };

        let destination_url = normalize_url(destination).map_err(|e| {
            AppError::bad_request(
                "Destination must be a valid http(s) URL",
                json!({ "field": "qr_data", "reason": e.to_string() }),
            )
        })?;

        Ok((destination_url, display_name))
    }

    async fn render(&self, payload: &str, label: &str) -> Result<Vec<u8>, AppError> {
        let renderer = self.renderer.clone();
        let payload = payload.to_string();
        let label = label.to_string();

        tokio::task::spawn_blocking(move || renderer.render_png(&payload, &label))
            .await
            .map_err(|e| {
                AppError::internal("Rendering task failed", json!({ "reason": e.to_string() }))
            })?
    }
}
