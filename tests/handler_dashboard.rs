mod common;

use axum::http::{StatusCode, header};
use chrono::{Duration, Utc};
use qr_shortener::state::WebSettings;

fn protected_settings() -> WebSettings {
    WebSettings::new(
        Some(common::BASE_URL.to_string()),
        false,
        Some("admin-secret"),
        "file",
    )
}

#[tokio::test]
async fn test_dashboard_lists_records_newest_first() {
    let dirs = common::TestDirs::new();
    common::seed_counter(dirs.data.path(), 5);
    let state = common::create_test_state(&dirs, common::default_settings()).await;
    let now = Utc::now();
    common::insert_record(&state, "older1", "https://example.com/older", now - Duration::hours(2)).await;
    common::insert_record(&state, "newer1", "https://example.com/newer", now).await;
    let server = common::test_server(state);

    let response = server.get("/admin/dashboard").await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("<strong>5</strong>"));
    assert!(html.contains("https://example.com/older"));
    let newer = html.find("newer1").unwrap();
    let older = html.find("older1").unwrap();
    assert!(newer < older, "newest record should be listed first");
}

#[tokio::test]
async fn test_dashboard_empty_store() {
    let dirs = common::TestDirs::new();
    let state = common::create_test_state(&dirs, common::default_settings()).await;
    let server = common::test_server(state);

    let response = server.get("/admin/dashboard").await;

    response.assert_status_ok();
    assert!(response.text().contains("No QR codes yet"));
}

#[tokio::test]
async fn test_dashboard_requires_token_when_configured() {
    let dirs = common::TestDirs::new();
    let state = common::create_test_state(&dirs, protected_settings()).await;
    let server = common::test_server(state);

    let response = server.get("/admin/dashboard").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.header(header::WWW_AUTHENTICATE), "Bearer");
}

#[tokio::test]
async fn test_dashboard_rejects_wrong_token() {
    let dirs = common::TestDirs::new();
    let state = common::create_test_state(&dirs, protected_settings()).await;
    let server = common::test_server(state);

    let response = server
        .get("/admin/dashboard")
        .add_header(
            header::AUTHORIZATION,
            "Bearer not-the-secret",
        )
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_dashboard_accepts_valid_token() {
    let dirs = common::TestDirs::new();
    let state = common::create_test_state(&dirs, protected_settings()).await;
    let server = common::test_server(state);

    let response = server
        .get("/admin/dashboard")
        .add_header(
            header::AUTHORIZATION,
            "Bearer admin-secret",
        )
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_token_does_not_guard_public_pages() {
    let dirs = common::TestDirs::new();
    let state = common::create_test_state(&dirs, protected_settings()).await;
    let server = common::test_server(state);

    server.get("/").await.assert_status_ok();
    server.get("/health").await.assert_status_ok();
}

#[tokio::test]
async fn test_dashboard_pages_reach_every_record() {
    let dirs = common::TestDirs::new();
    let state = common::create_test_state(&dirs, common::default_settings()).await;
    let now = Utc::now();
    let total = qr_shortener::web::handlers::DASHBOARD_PAGE_SIZE + 1;
    for i in 0..total {
        let code = format!("c{:05}", i);
        common::insert_record(&state, &code, "https://example.com/", now - Duration::minutes(i as i64)).await;
    }
    let oldest = format!("c{:05}", total - 1);
    let server = common::test_server(state);

    let first = server.get("/admin/dashboard").await;
    first.assert_status_ok();
    let html = first.text();
    assert_eq!(html.matches("href=\"/r/").count(), total - 1);
    assert!(html.contains("c00000"));
    assert!(!html.contains(&oldest));
    assert!(html.contains("Page 1 of 2"));
    assert!(html.contains("/admin/dashboard?page=2"));

    let second = server.get("/admin/dashboard").add_query_param("page", 2).await;
    second.assert_status_ok();
    let html = second.text();
    assert_eq!(html.matches("href=\"/r/").count(), 1);
    assert!(html.contains(&oldest));
    assert!(html.contains("/admin/dashboard?page=1"));
}

#[tokio::test]
async fn test_dashboard_page_past_end_is_empty() {
    let dirs = common::TestDirs::new();
    let state = common::create_test_state(&dirs, common::default_settings()).await;
    common::insert_record(&state, "only01", "https://example.com/", Utc::now()).await;
    let server = common::test_server(state);

    let response = server.get("/admin/dashboard?page=9").await;

    response.assert_status_ok();
    let html = response.text();
    assert!(!html.contains("only01"));
    assert!(html.contains("No records on this page"));
}
