//! Admin dashboard listing every stored redirect.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use crate::domain::entities::RedirectRecord;
use crate::error::AppError;
use crate::state::AppState;

/// Records rendered per dashboard page.
pub const DASHBOARD_PAGE_SIZE: usize = 100;

/// `?page=N`, 1-based. Missing or 0 means the first page.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub page: Option<u32>,
}

/// One table row, pre-formatted for the template.
#[derive(Debug, Clone)]
pub struct DashboardRow {
    pub code: String,
    pub redirect_path: String,
    pub destination_url: String,
    pub display_name: String,
    pub image_url: String,
    pub created_at: String,
}

impl From<&RedirectRecord> for DashboardRow {
    fn from(record: &RedirectRecord) -> Self {
        Self {
            code: record.code.clone(),
            redirect_path: record.redirect_path(),
            destination_url: record.destination_url.clone(),
            display_name: record.display_name.clone(),
            image_url: format!("/qr/{}", record.filename),
            created_at: record.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        }
    }
}

/// Renders `templates/dashboard.html`.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub count: u64,
    pub total_records: u64,
    pub rows: Vec<DashboardRow>,
    pub page: u32,
    pub total_pages: u32,
}

impl DashboardTemplate {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Number of pages needed for `total` records; at least 1.
fn page_count(total: u64, page_size: usize) -> u32 {
    let pages = total.div_ceil(page_size.max(1) as u64).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Lists records newest first with the generation counter.
///
/// # Endpoint
///
/// `GET /admin/dashboard?page=N`
///
/// Every record is reachable through the page links. A page past the end
/// renders an empty table. Guarded by [`crate::api::middleware::admin_auth`]
/// when `ADMIN_TOKEN` is set.
pub async fn dashboard_handler(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = query.page.unwrap_or(1).max(1);
    let total_records = state.redirect_service.count().await?;
    let records = state
        .redirect_service
        .page(page, DASHBOARD_PAGE_SIZE)
        .await?;
    let count = state.generation_service.current_count().await?;

    Ok(DashboardTemplate {
        count,
        total_records,
        rows: records.iter().map(DashboardRow::from).collect(),
        page,
        total_pages: page_count(total_records, DASHBOARD_PAGE_SIZE),
    })
}
