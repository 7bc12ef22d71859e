//! Repository trait for redirect record storage.

use crate::domain::entities::{NewRedirect, RedirectRecord};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Storage contract for the short code → record mapping.
///
/// The mapping is total over inserted codes: point lookups, single-record
/// inserts and no in-place updates. Implementations must make
/// [`RedirectRepository::insert`] an atomic insert-if-absent so that two
/// concurrent submissions can never both claim the same code.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::JsonFileStore`] - flat keyed-record file
/// - [`crate::infrastructure::persistence::PgRedirectRepository`] - PostgreSQL table
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RedirectRepository: Send + Sync {
    /// Returns true if a record is stored under `code`.
    async fn exists(&self, code: &str) -> Result<bool, AppError>;

    /// Inserts a new record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DuplicateCode`] if the code is already present.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn insert(&self, new_redirect: NewRedirect) -> Result<RedirectRecord, AppError>;

    /// Finds a record by its short code.
    async fn lookup(&self, code: &str) -> Result<Option<RedirectRecord>, AppError>;

    /// Lists up to `limit` records, newest first, skipping the first `offset`.
    async fn list_recent(&self, limit: usize, offset: usize)
        -> Result<Vec<RedirectRecord>, AppError>;

    /// Total number of stored records.
    async fn count(&self) -> Result<u64, AppError>;

    /// Removes every record created strictly before `cutoff` and returns them.
    async fn prune_created_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<RedirectRecord>, AppError>;
}
