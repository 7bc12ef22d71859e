//! Storage of generated PNG files.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::error::AppError;

/// Accepted image filenames; anything else (including `..`) is treated as absent.
static FILENAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,128}\.png$").expect("valid filename regex"));

/// Directory of generated QR images, addressed by exact filename.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    /// Opens the image directory, creating it if needed.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, AppError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filename for a new image: creation timestamp plus code.
    pub fn filename_for(code: &str, created_at: DateTime<Utc>) -> String {
        format!("{}_{}.png", created_at.format("%Y%m%d%H%M%S"), code)
    }

    pub fn is_valid_filename(filename: &str) -> bool {
        FILENAME_REGEX.is_match(filename)
    }

    pub async fn write(&self, filename: &str, bytes: &[u8]) -> Result<(), AppError> {
        let path = self.resolve(filename)?;
        let tmp = path.with_extension("png.tmp");

        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;

        Ok(())
    }

    /// Reads an image by exact filename.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for malformed or unknown filenames.
    pub async fn read(&self, filename: &str) -> Result<Vec<u8>, AppError> {
        let path = self.resolve(filename)?;

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(not_found(filename)),
            Err(e) => Err(e.into()),
        }
    }

    /// Deletes an image; a missing file is not an error.
    pub async fn remove(&self, filename: &str) -> Result<(), AppError> {
        let path = self.resolve(filename)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn resolve(&self, filename: &str) -> Result<PathBuf, AppError> {
        if !Self::is_valid_filename(filename) {
            return Err(not_found(filename));
        }
        Ok(self.root.join(filename))
    }
}

fn not_found(filename: &str) -> AppError {
    AppError::not_found("QR image not found", json!({ "filename": filename }))
}
