#![allow(dead_code)]

use axum_test::TestServer;
use qr_shortener::application::services::{GenerationService, RedirectService};
use qr_shortener::domain::entities::{NewRedirect, RetentionPolicy};
use qr_shortener::domain::repositories::RedirectRepository;
use qr_shortener::infrastructure::persistence::JsonFileStore;
use qr_shortener::infrastructure::rendering::{ImageStore, LabeledQrRenderer};
use qr_shortener::routes::{RouterOptions, router};
use qr_shortener::state::{AppState, WebSettings};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

pub const BASE_URL: &str = "http://qr.test";

/// Temporary data and image directories for one test.
pub struct TestDirs {
    pub data: TempDir,
    pub images: TempDir,
}

impl TestDirs {
    pub fn new() -> Self {
        Self {
            data: TempDir::new().unwrap(),
            images: TempDir::new().unwrap(),
        }
    }

    pub fn image_count(&self) -> usize {
        std::fs::read_dir(self.images.path()).unwrap().count()
    }
}

/// Writes `{"count": N}` so a store opens with an existing counter.
pub fn seed_counter(data_dir: &Path, count: u64) {
    std::fs::write(
        data_dir.join("qr_tracker.json"),
        format!("{{\"count\": {}}}", count),
    )
    .unwrap();
}

pub fn default_settings() -> WebSettings {
    WebSettings::new(Some(BASE_URL.to_string()), false, None, "file")
}

pub async fn create_test_state(dirs: &TestDirs, settings: WebSettings) -> AppState {
    create_test_state_with_retention(dirs, settings, RetentionPolicy::Permanent).await
}

pub async fn create_test_state_with_retention(
    dirs: &TestDirs,
    settings: WebSettings,
    retention: RetentionPolicy,
) -> AppState {
    let store = Arc::new(JsonFileStore::open(dirs.data.path()).await.unwrap());
    let images = ImageStore::open(dirs.images.path()).await.unwrap();

    let redirect_service =
        Arc::new(RedirectService::new(store.clone()).with_retention(retention));
    let generation_service = Arc::new(GenerationService::new(
        redirect_service.clone(),
        store,
        Arc::new(LabeledQrRenderer::new(None).with_module_px(4)),
        images,
    ));

    AppState::new(generation_service, redirect_service, settings)
}

pub fn test_server(state: AppState) -> TestServer {
    TestServer::new(router(state, RouterOptions::default())).unwrap()
}

pub async fn insert_record(
    state: &AppState,
    code: &str,
    url: &str,
    created_at: chrono::DateTime<chrono::Utc>,
) -> String {
    let filename = ImageStore::filename_for(code, created_at);
    state
        .images()
        .write(&filename, b"\x89PNG\r\n\x1a\nstub")
        .await
        .unwrap();
    state
        .redirect_service
        .insert(NewRedirect {
            code: code.to_string(),
            destination_url: url.to_string(),
            display_name: format!("Name {}", code),
            filename: filename.clone(),
            created_at,
        })
        .await
        .unwrap();
    filename
}

/// Reads the stored records straight from a reopened store.
pub async fn reopen_store(dirs: &TestDirs) -> JsonFileStore {
    JsonFileStore::open(dirs.data.path()).await.unwrap()
}

pub async fn stored_count(store: &JsonFileStore) -> u64 {
    store.count().await.unwrap()
}
