//! Short code allocation, redirect resolution and retention.

use chrono::{DateTime, Utc};
use serde_json::json;
use std::sync::Arc;

use crate::domain::entities::{NewRedirect, RedirectRecord, RetentionPolicy};
use crate::domain::repositories::RedirectRepository;
use crate::error::AppError;
use crate::utils::code_generator::{CodeSource, DEFAULT_CODE_LENGTH, RandomCodeSource, is_valid_code};

/// Default number of draws per code length before widening.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;

/// Tunables for code allocation.
#[derive(Debug, Clone, Copy)]
pub struct CodePolicy {
    pub length: usize,
    pub max_attempts: usize,
}

impl Default for CodePolicy {
    fn default() -> Self {
        Self {
            length: DEFAULT_CODE_LENGTH,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Service owning the short code → record mapping.
pub struct RedirectService {
    redirects: Arc<dyn RedirectRepository>,
    codes: Arc<dyn CodeSource>,
    code_policy: CodePolicy,
    retention: RetentionPolicy,
}

impl RedirectService {
    /// Creates a service drawing codes from the thread-local RNG.
    pub fn new(redirects: Arc<dyn RedirectRepository>) -> Self {
        Self {
            redirects,
            codes: Arc::new(RandomCodeSource),
            code_policy: CodePolicy::default(),
            retention: RetentionPolicy::Permanent,
        }
    }

    pub fn with_code_source(mut self, codes: Arc<dyn CodeSource>) -> Self {
        self.codes = codes;
        self
    }

    pub fn with_code_policy(mut self, code_policy: CodePolicy) -> Self {
        self.code_policy = code_policy;
        self
    }

    pub fn with_retention(mut self, retention: RetentionPolicy) -> Self {
        self.retention = retention;
        self
    }

    pub fn retention(&self) -> RetentionPolicy {
        self.retention
    }

    /// Draws a code not currently present in the store.
    ///
    /// # Collision Handling
    ///
    /// - Up to `max_attempts` draws at the configured length
    /// - Then one more round of `max_attempts` draws one character longer
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ExhaustedRetries`] when both rounds collide.
    pub async fn allocate_code(&self) -> Result<String, AppError> {
        let base = self.code_policy.length;
        let attempts = self.code_policy.max_attempts.max(1);

        for length in [base, base + 1] {
            for _ in 0..attempts {
                let code = self.codes.next_code(length);

                if !self.redirects.exists(&code).await? {
                    return Ok(code);
                }
                tracing::debug!(code = %code, length, "Short code collision, redrawing");
            }
            tracing::warn!(length, attempts, "Short code space crowded, widening");
        }

        Err(AppError::exhausted_retries(
            "Failed to generate unique code",
            json!({ "length": base + 1, "attempts": attempts * 2 }),
        ))
    }

    /// Inserts a record under an already allocated code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DuplicateCode`] if another writer claimed the code
    /// between allocation and insert.
    pub async fn insert(&self, new_redirect: NewRedirect) -> Result<RedirectRecord, AppError> {
        self.redirects.insert(new_redirect).await
    }

    /// Resolves a short code to its record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is malformed, unknown, or
    /// older than the retention policy allows.
    pub async fn resolve(&self, code: &str) -> Result<RedirectRecord, AppError> {
        let not_found = || AppError::not_found("Short code not found", json!({ "code": code }));

        if !is_valid_code(code) {
            return Err(not_found());
        }

        let record = self.redirects.lookup(code).await?.ok_or_else(not_found)?;

        if self.retention.is_expired(record.created_at, Utc::now()) {
            return Err(not_found());
        }

        Ok(record)
    }

    /// Lists up to `limit` records, newest first.
    pub async fn recent(&self, limit: usize) -> Result<Vec<RedirectRecord>, AppError> {
        self.redirects.list_recent(limit, 0).await
    }

    /// One page of records, newest first. Pages are 1-based; 0 is read as 1.
    pub async fn page(
        &self,
        page: u32,
        page_size: usize,
    ) -> Result<Vec<RedirectRecord>, AppError> {
        let offset = (page.max(1) as usize - 1).saturating_mul(page_size);
        self.redirects.list_recent(page_size, offset).await
    }

    pub async fn count(&self) -> Result<u64, AppError> {
        self.redirects.count().await
    }

    /// Removes records the retention policy no longer keeps at `now`.
    ///
    /// Returns the removed records so their images can be deleted. Always
    /// empty under [`RetentionPolicy::Permanent`].
    pub async fn prune(&self, now: DateTime<Utc>) -> Result<Vec<RedirectRecord>, AppError> {
        match self.retention.cutoff(now) {
            Some(cutoff) => self.redirects.prune_created_before(cutoff).await,
            None => Ok(Vec::new()),
        }
    }
}
