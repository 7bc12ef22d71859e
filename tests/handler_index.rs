mod common;

use axum::http::{StatusCode, header};
use qr_shortener::application::services::Submission;
use qr_shortener::domain::repositories::CounterRepository;
use qr_shortener::state::WebSettings;

#[tokio::test]
async fn test_index_shows_form_and_counter() {
    let dirs = common::TestDirs::new();
    common::seed_counter(dirs.data.path(), 7);
    let state = common::create_test_state(&dirs, common::default_settings()).await;
    let server = common::test_server(state);

    let response = server.get("/").await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("name=\"qr_data\""));
    assert!(html.contains("name=\"qr_name\""));
    assert!(html.contains("<strong>7</strong>"));
}

#[tokio::test]
async fn test_submit_end_to_end() {
    let dirs = common::TestDirs::new();
    common::seed_counter(dirs.data.path(), 3);
    let state = common::create_test_state(&dirs, common::default_settings()).await;
    let server = common::test_server(state.clone());

    let response = server
        .post("/")
        .form(&[("qr_data", "https://example.com"), ("qr_name", "Example")])
        .await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("<strong>4</strong>"));

    let records = state.redirect_service.recent(10).await.unwrap();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.destination_url, "https://example.com/");
    assert_eq!(record.display_name, "Example");
    assert_eq!(record.code.len(), 6);
    assert!(html.contains(&format!("/qr/{}", record.filename)));
    assert!(html.contains(&format!("{}/r/{}", common::BASE_URL, record.code)));

    let image = server.get(&format!("/qr/{}", record.filename)).await;
    image.assert_status_ok();
    assert!(image.as_bytes().starts_with(b"\x89PNG"));

    let redirect = server.get(&format!("/r/{}", record.code)).await;
    redirect.assert_status(StatusCode::FOUND);
    assert_eq!(redirect.header(header::LOCATION), "https://example.com/");
}

#[tokio::test]
async fn test_submit_uses_host_header_without_public_base_url() {
    let dirs = common::TestDirs::new();
    let settings = WebSettings::new(None, false, None, "file");
    let state = common::create_test_state(&dirs, settings).await;
    let server = common::test_server(state.clone());

    let response = server
        .post("/")
        .add_header(header::HOST, "localhost:5000")
        .form(&[("qr_data", "example.org/page"), ("qr_name", "Page")])
        .await;

    response.assert_status_ok();
    let record = state.redirect_service.recent(1).await.unwrap().remove(0);
    assert_eq!(record.destination_url, "https://example.org/page");
    assert!(
        response
            .text()
            .contains(&format!("http://localhost:5000/r/{}", record.code))
    );
}

#[tokio::test]
async fn test_submit_empty_destination_is_rejected_without_side_effects() {
    let dirs = common::TestDirs::new();
    common::seed_counter(dirs.data.path(), 3);
    let state = common::create_test_state(&dirs, common::default_settings()).await;
    let server = common::test_server(state);

    let response = server
        .post("/")
        .form(&[("qr_data", "   "), ("qr_name", "Example")])
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let html = response.text();
    assert!(html.contains("Please enter the URL or text to encode"));
    assert!(html.contains("<strong>3</strong>"));
    assert!(html.contains("value=\"Example\""));

    let store = common::reopen_store(&dirs).await;
    assert_eq!(common::stored_count(&store).await, 0);
    assert_eq!(store.current().await.unwrap(), 3);
    assert_eq!(dirs.image_count(), 0);
}

#[tokio::test]
async fn test_submit_missing_name_is_rejected() {
    let dirs = common::TestDirs::new();
    let state = common::create_test_state(&dirs, common::default_settings()).await;
    let server = common::test_server(state);

    let response = server
        .post("/")
        .form(&[("qr_data", "https://example.com")])
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.text().contains("Please enter a name for the QR code"));
    assert_eq!(dirs.image_count(), 0);
}

#[tokio::test]
async fn test_submit_unsupported_scheme_is_rejected() {
    let dirs = common::TestDirs::new();
    let state = common::create_test_state(&dirs, common::default_settings()).await;
    let server = common::test_server(state);

    let response = server
        .post("/")
        .form(&[("qr_data", "ftp://example.com/file"), ("qr_name", "File")])
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.text().contains("Destination must be a valid http(s) URL"));
}

#[tokio::test]
async fn test_records_and_counter_survive_restart() {
    let dirs = common::TestDirs::new();

    let code = {
        let state = common::create_test_state(&dirs, common::default_settings()).await;
        let server = common::test_server(state.clone());

        for name in ["First", "Second"] {
            server
                .post("/")
                .form(&[("qr_data", "https://example.com/a"), ("qr_name", name)])
                .await
                .assert_status_ok();
        }
        state.redirect_service.recent(1).await.unwrap().remove(0).code
    };

    let state = common::create_test_state(&dirs, common::default_settings()).await;
    let server = common::test_server(state.clone());

    assert_eq!(state.generation_service.current_count().await.unwrap(), 2);
    assert_eq!(state.redirect_service.count().await.unwrap(), 2);

    let redirect = server.get(&format!("/r/{}", code)).await;
    redirect.assert_status(StatusCode::FOUND);
    assert_eq!(redirect.header(header::LOCATION), "https://example.com/a");
}

#[tokio::test]
async fn test_concurrent_submissions_get_distinct_codes() {
    let dirs = common::TestDirs::new();
    let state = common::create_test_state(&dirs, common::default_settings()).await;

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let service = state.generation_service.clone();
            tokio::spawn(async move {
                service
                    .submit(
                        Submission {
                            destination: format!("https://example.com/{}", i),
                            display_name: format!("Item {}", i),
                        },
                        common::BASE_URL,
                    )
                    .await
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let records = state.redirect_service.recent(100).await.unwrap();
    let mut codes: Vec<_> = records.iter().map(|r| r.code.clone()).collect();
    codes.sort();
    codes.dedup();

    assert_eq!(codes.len(), 8);
    assert_eq!(state.generation_service.current_count().await.unwrap(), 8);
    assert_eq!(dirs.image_count(), 8);
}
