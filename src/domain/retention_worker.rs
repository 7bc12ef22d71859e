//! Background enforcement of the retention policy.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

use crate::application::services::RedirectService;
use crate::error::AppError;
use crate::infrastructure::rendering::ImageStore;

/// How often the sweeper runs when retention is enabled.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

/// Removes expired records and their images once.
///
/// Returns the number of records removed. Image deletion failures are
/// logged and do not abort the sweep.
pub async fn sweep_once(
    redirects: &RedirectService,
    images: &ImageStore,
) -> Result<usize, AppError> {
    let removed = redirects.prune(Utc::now()).await?;

    for record in &removed {
        if let Err(e) = images.remove(&record.filename).await {
            tracing::warn!(filename = %record.filename, "Failed to remove expired image: {e}");
        }
    }

    if !removed.is_empty() {
        tracing::info!(removed = removed.len(), "Pruned expired redirect records");
    }

    Ok(removed.len())
}

/// Runs [`sweep_once`] every `interval` until the task is dropped.
pub async fn run_retention_worker(
    redirects: Arc<RedirectService>,
    images: ImageStore,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);

    loop {
        ticker.tick().await;
        if let Err(e) = sweep_once(&redirects, &images).await {
            tracing::error!("Retention sweep failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{NewRedirect, RetentionPolicy};
    use crate::domain::repositories::RedirectRepository;
    use crate::infrastructure::persistence::JsonFileStore;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_sweep_removes_expired_records_and_images() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(JsonFileStore::open(dir.path().join("data")).await.unwrap());
        let images = ImageStore::open(dir.path().join("qr")).await.unwrap();

        let old_at = Utc::now() - chrono::Duration::days(10);
        let old_file = ImageStore::filename_for("old001", old_at);
        images.write(&old_file, b"png").await.unwrap();
        store
            .insert(NewRedirect {
                code: "old001".to_string(),
                destination_url: "https://example.com/".to_string(),
                display_name: "Old".to_string(),
                filename: old_file.clone(),
                created_at: old_at,
            })
            .await
            .unwrap();

        let fresh_file = ImageStore::filename_for("new001", Utc::now());
        images.write(&fresh_file, b"png").await.unwrap();
        store
            .insert(NewRedirect {
                code: "new001".to_string(),
                destination_url: "https://example.com/".to_string(),
                display_name: "New".to_string(),
                filename: fresh_file.clone(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();

        let service = RedirectService::new(store.clone())
            .with_retention(RetentionPolicy::from_days(Some(7)));

        let removed = sweep_once(&service, &images).await.unwrap();

        assert_eq!(removed, 1);
        assert!(images.read(&old_file).await.is_err());
        assert!(images.read(&fresh_file).await.is_ok());
        assert!(store.exists("new001").await.unwrap());
    }

    #[tokio::test]
    async fn test_sweep_permanent_keeps_everything() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(JsonFileStore::open(dir.path()).await.unwrap());
        let images = ImageStore::open(dir.path().join("qr")).await.unwrap();
        let service = RedirectService::new(store);

        assert_eq!(sweep_once(&service, &images).await.unwrap(), 0);
    }
}
