//! Flat-file implementation of the redirect and counter repositories.
//!
//! Two JSON documents live under the data directory:
//!
//! ```text
//! redirects.json   { "<code>": { "url", "name", "filename", "created_at" }, ... }
//! qr_tracker.json  { "count": N }
//! ```
//!
//! Both are loaded once at open and written through on every mutation.
//! A single mutex spans "check + insert" and "read + increment + persist",
//! and each write lands in a temp file that is renamed over the original.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::domain::entities::{NewRedirect, RedirectRecord};
use crate::domain::repositories::{CounterRepository, RedirectRepository};
use crate::error::AppError;

pub const REDIRECTS_FILE: &str = "redirects.json";
pub const COUNTER_FILE: &str = "qr_tracker.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredRecord {
    url: String,
    name: String,
    filename: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredCounter {
    count: u64,
}

#[derive(Debug, Default)]
struct StoreState {
    redirects: BTreeMap<String, StoredRecord>,
    count: u64,
}

/// JSON file store holding both the redirect mapping and the counter.
pub struct JsonFileStore {
    redirects_path: PathBuf,
    counter_path: PathBuf,
    state: Mutex<StoreState>,
}

impl JsonFileStore {
    /// Opens (or initialises) the store under `data_dir`.
    ///
    /// Missing files start out as an empty mapping and a zero counter; they
    /// are created on the first write.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the directory cannot be created or a
    /// file exists but does not parse.
    pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self, AppError> {
        let data_dir = data_dir.as_ref();
        tokio::fs::create_dir_all(data_dir).await?;

        let redirects_path = data_dir.join(REDIRECTS_FILE);
        let counter_path = data_dir.join(COUNTER_FILE);

        let redirects: BTreeMap<String, StoredRecord> =
            read_json(&redirects_path).await?.unwrap_or_default();
        let counter: StoredCounter = read_json(&counter_path).await?.unwrap_or_default();

        tracing::info!(
            records = redirects.len(),
            count = counter.count,
            path = %data_dir.display(),
            "Opened JSON file store"
        );

        Ok(Self {
            redirects_path,
            counter_path,
            state: Mutex::new(StoreState {
                redirects,
                count: counter.count,
            }),
        })
    }
}

#[async_trait]
impl RedirectRepository for JsonFileStore {
    async fn exists(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.state.lock().await.redirects.contains_key(code))
    }

    async fn insert(&self, new_redirect: NewRedirect) -> Result<RedirectRecord, AppError> {
        let mut state = self.state.lock().await;

        if state.redirects.contains_key(&new_redirect.code) {
            return Err(AppError::duplicate_code(&new_redirect.code));
        }

        let record = RedirectRecord::from(new_redirect);
        state
            .redirects
            .insert(record.code.clone(), to_stored(&record));

        if let Err(e) = write_json(&self.redirects_path, &state.redirects).await {
            state.redirects.remove(&record.code);
            return Err(e);
        }

        Ok(record)
    }

    async fn lookup(&self, code: &str) -> Result<Option<RedirectRecord>, AppError> {
        let state = self.state.lock().await;
        Ok(state
            .redirects
            .get(code)
            .map(|stored| from_stored(code, stored)))
    }

    async fn list_recent(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<RedirectRecord>, AppError> {
        let state = self.state.lock().await;

        let mut records: Vec<RedirectRecord> = state
            .redirects
            .iter()
            .map(|(code, stored)| from_stored(code, stored))
            .collect();
        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.code.cmp(&b.code))
        });
        Ok(records.into_iter().skip(offset).take(limit).collect())
    }

    async fn count(&self) -> Result<u64, AppError> {
        Ok(self.state.lock().await.redirects.len() as u64)
    }

    async fn prune_created_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<RedirectRecord>, AppError> {
        let mut state = self.state.lock().await;

        let expired: Vec<String> = state
            .redirects
            .iter()
            .filter(|(_, stored)| stored.created_at < cutoff)
            .map(|(code, _)| code.clone())
            .collect();

        if expired.is_empty() {
            return Ok(Vec::new());
        }

        let mut remaining = state.redirects.clone();
        let removed: Vec<RedirectRecord> = expired
            .iter()
            .filter_map(|code| remaining.remove(code).map(|s| from_stored(code, &s)))
            .collect();

        write_json(&self.redirects_path, &remaining).await?;
        state.redirects = remaining;

        Ok(removed)
    }
}

#[async_trait]
impl CounterRepository for JsonFileStore {
    async fn increment(&self) -> Result<u64, AppError> {
        let mut state = self.state.lock().await;
        let next = state.count + 1;

        write_json(&self.counter_path, &StoredCounter { count: next }).await?;
        state.count = next;

        Ok(next)
    }

    async fn current(&self) -> Result<u64, AppError> {
        Ok(self.state.lock().await.count)
    }
}

fn to_stored(record: &RedirectRecord) -> StoredRecord {
    StoredRecord {
        url: record.destination_url.clone(),
        name: record.display_name.clone(),
        filename: record.filename.clone(),
        created_at: record.created_at,
    }
}

fn from_stored(code: &str, stored: &StoredRecord) -> RedirectRecord {
    RedirectRecord::new(
        code.to_string(),
        stored.url.clone(),
        stored.name.clone(),
        stored.filename.clone(),
        stored.created_at,
    )
}

async fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Option<T>, AppError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), AppError> {
    let bytes = serde_json::to_vec_pretty(value)?;
    let tmp = path.with_extension("json.tmp");

    tokio::fs::write(&tmp, &bytes).await?;
    tokio::fs::rename(&tmp, path).await?;

    Ok(())
}
