//! HTTP server initialization and runtime setup.
//!
//! Handles storage selection, renderer setup, worker spawning, and Axum server lifecycle.

use crate::application::services::{CodePolicy, GenerationService, RedirectService};
use crate::config::{Config, StorageBackend};
use crate::domain::repositories::{CounterRepository, RedirectRepository};
use crate::domain::retention_worker::{SWEEP_INTERVAL, run_retention_worker};
use crate::infrastructure::persistence::{JsonFileStore, PgCounterRepository, PgRedirectRepository};
use crate::infrastructure::rendering::font::load_font;
use crate::infrastructure::rendering::{ImageStore, LabeledQrRenderer};
use crate::routes::{RouterOptions, app_router};
use crate::state::{AppState, WebSettings};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;

/// Repository pair backing one deployment.
pub struct Storage {
    pub redirects: Arc<dyn RedirectRepository>,
    pub counter: Arc<dyn CounterRepository>,
    pub backend: &'static str,
}

impl Storage {
    /// Opens the configured storage backend.
    ///
    /// For PostgreSQL this connects the pool and applies pending migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created, a store
    /// file is corrupt, or the database is unreachable.
    pub async fn open(config: &Config) -> Result<Self> {
        match config.storage_backend {
            StorageBackend::File => {
                let store = Arc::new(
                    JsonFileStore::open(&config.data_dir)
                        .await
                        .with_context(|| {
                            format!("Failed to open data directory {}", config.data_dir.display())
                        })?,
                );
                tracing::info!("Using JSON file storage in {}", config.data_dir.display());

                Ok(Self {
                    redirects: store.clone(),
                    counter: store,
                    backend: "file",
                })
            }
            StorageBackend::Postgres => {
                let database_url = config
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL must be set when STORAGE_BACKEND=postgres")?;

                let pool = PgPoolOptions::new()
                    .max_connections(config.db_max_connections)
                    .connect(database_url)
                    .await
                    .context("Failed to connect to database")?;
                tracing::info!("Connected to database");

                sqlx::migrate!("./migrations")
                    .run(&pool)
                    .await
                    .context("Failed to migrate")?;

                let pool = Arc::new(pool);
                Ok(Self {
                    redirects: Arc::new(PgRedirectRepository::new(pool.clone())),
                    counter: Arc::new(PgCounterRepository::new(pool)),
                    backend: "postgres",
                })
            }
        }
    }

    /// Builds the redirect service with the configured code and retention policy.
    pub fn redirect_service(&self, config: &Config) -> RedirectService {
        RedirectService::new(self.redirects.clone())
            .with_code_policy(CodePolicy {
                length: config.code_length,
                max_attempts: config.code_max_attempts,
            })
            .with_retention(config.retention_policy())
    }
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Storage backend (JSON files or PostgreSQL with migrations)
/// - Label font and QR renderer
/// - Image directory
/// - Background retention sweeper (when `RETENTION_DAYS` is set)
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - Storage cannot be opened
/// - The image directory cannot be created
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let storage = Storage::open(&config).await?;

    let font = load_font(config.font_path.as_deref());
    let renderer = Arc::new(LabeledQrRenderer::new(font));

    let images = ImageStore::open(&config.qr_dir)
        .await
        .with_context(|| format!("Failed to open image directory {}", config.qr_dir.display()))?;

    let redirect_service = Arc::new(storage.redirect_service(&config));
    let generation_service = Arc::new(
        GenerationService::new(
            redirect_service.clone(),
            storage.counter.clone(),
            renderer,
            images.clone(),
        )
        .with_default_display_name(config.default_display_name.clone()),
    );

    if !redirect_service.retention().is_permanent() {
        tokio::spawn(run_retention_worker(
            redirect_service.clone(),
            images,
            SWEEP_INTERVAL,
        ));
        tracing::info!("Retention worker started");
    }

    let settings = WebSettings::new(
        config.public_base_url.clone(),
        config.behind_proxy,
        config.admin_token.as_deref(),
        storage.backend,
    );
    let state = AppState::new(generation_service, redirect_service, settings);

    let app = app_router(
        state,
        RouterOptions {
            behind_proxy: config.behind_proxy,
            rate_limit: config.rate_limit(),
        },
    );

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
