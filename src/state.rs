//! Shared application state injected into all handlers.

use axum::http::{HeaderMap, Uri};
use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::application::services::{GenerationService, RedirectService};
use crate::error::AppError;
use crate::infrastructure::rendering::ImageStore;
use crate::utils::base_url::base_url_from_headers;

/// Request-independent settings the web layer needs.
#[derive(Debug, Clone, Default)]
pub struct WebSettings {
    /// Fixed base URL for QR payloads; derived from the request when `None`.
    pub public_base_url: Option<String>,
    pub behind_proxy: bool,
    /// SHA-256 of the admin token. Only the digest is kept in memory.
    admin_token_digest: Option<[u8; 32]>,
    /// Storage backend name reported by `/health`.
    pub storage: &'static str,
}

impl WebSettings {
    pub fn new(
        public_base_url: Option<String>,
        behind_proxy: bool,
        admin_token: Option<&str>,
        storage: &'static str,
    ) -> Self {
        Self {
            public_base_url: public_base_url.map(|u| u.trim_end_matches('/').to_string()),
            behind_proxy,
            admin_token_digest: admin_token.map(digest),
            storage,
        }
    }

    /// Base URL for QR payloads built for this request.
    pub fn base_url(&self, headers: &HeaderMap, uri: &Uri) -> Result<String, AppError> {
        match self.public_base_url {
            Some(ref base) => Ok(base.clone()),
            None => base_url_from_headers(headers, uri, self.behind_proxy),
        }
    }

    pub fn admin_protected(&self) -> bool {
        self.admin_token_digest.is_some()
    }

    /// Compares `token` with the configured admin token by digest.
    /// Always true when no token is configured.
    pub fn admin_token_matches(&self, token: &str) -> bool {
        match self.admin_token_digest {
            Some(expected) => digest(token) == expected,
            None => true,
        }
    }
}

fn digest(token: &str) -> [u8; 32] {
    Sha256::digest(token.as_bytes()).into()
}

/// Application state shared across handlers.
///
/// Cloned cheaply for each request (all fields are `Arc`).
#[derive(Clone)]
pub struct AppState {
    pub generation_service: Arc<GenerationService>,
    pub redirect_service: Arc<RedirectService>,
    pub settings: Arc<WebSettings>,
}

impl AppState {
    pub fn new(
        generation_service: Arc<GenerationService>,
        redirect_service: Arc<RedirectService>,
        settings: WebSettings,
    ) -> Self {
        Self {
            generation_service,
            redirect_service,
            settings: Arc::new(settings),
        }
    }

    pub fn images(&self) -> &ImageStore {
        self.generation_service.images()
    }
}
