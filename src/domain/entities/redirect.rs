//! Redirect record entity mapping a short code to its destination.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted mapping from a short code to a destination URL.
///
/// Records are created once per successful submission and never mutated.
/// The only way a record leaves the store is a retention sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectRecord {
    pub code: String,
    pub destination_url: String,
    pub display_name: String,
    /// Name of the generated PNG under the QR image directory.
    pub filename: String,
    pub created_at: DateTime<Utc>,
}

impl RedirectRecord {
    /// Creates a new RedirectRecord instance.
    pub fn new(
        code: String,
        destination_url: String,
        display_name: String,
        filename: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            code,
            destination_url,
            display_name,
            filename,
            created_at,
        }
    }

    /// Path component under which the record is resolvable.
    pub fn redirect_path(&self) -> String {
        format!("/r/{}", self.code)
    }
}

/// Input data for inserting a redirect record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRedirect {
    pub code: String,
    pub destination_url: String,
    pub display_name: String,
    pub filename: String,
    pub created_at: DateTime<Utc>,
}

impl From<NewRedirect> for RedirectRecord {
    fn from(new: NewRedirect) -> Self {
        RedirectRecord::new(
            new.code,
            new.destination_url,
            new.display_name,
            new.filename,
            new.created_at,
        )
    }
}
