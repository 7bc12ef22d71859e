//! PostgreSQL repository tests.
//!
//! Require a database: `DATABASE_URL=postgres://... cargo test -- --ignored`.

use chrono::{Duration, Utc};
use qr_shortener::AppError;
use qr_shortener::domain::entities::NewRedirect;
use qr_shortener::domain::repositories::{CounterRepository, RedirectRepository};
use qr_shortener::infrastructure::persistence::{PgCounterRepository, PgRedirectRepository};
use sqlx::PgPool;
use std::sync::Arc;

fn new_redirect(code: &str, age: Duration) -> NewRedirect {
    NewRedirect {
        code: code.to_string(),
        destination_url: format!("https://example.com/{}", code),
        display_name: format!("Name {}", code),
        filename: format!("20250101000000_{}.png", code),
        created_at: Utc::now() - age,
    }
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_insert_and_lookup(pool: PgPool) {
    let repo = PgRedirectRepository::new(Arc::new(pool));

    let record = repo.insert(new_redirect("AB12cd", Duration::zero())).await.unwrap();
    assert_eq!(record.code, "AB12cd");

    let found = repo.lookup("AB12cd").await.unwrap().unwrap();
    assert_eq!(found.destination_url, "https://example.com/AB12cd");
    assert_eq!(found.display_name, "Name AB12cd");
    assert!(repo.exists("AB12cd").await.unwrap());

    assert!(repo.lookup("missing").await.unwrap().is_none());
    assert!(!repo.exists("missing").await.unwrap());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_insert_duplicate_code(pool: PgPool) {
    let repo = PgRedirectRepository::new(Arc::new(pool));

    repo.insert(new_redirect("dup001", Duration::zero())).await.unwrap();
    let result = repo.insert(new_redirect("dup001", Duration::zero())).await;

    assert!(matches!(result, Err(AppError::DuplicateCode { .. })));
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_list_recent_and_prune(pool: PgPool) {
    let repo = PgRedirectRepository::new(Arc::new(pool));

    repo.insert(new_redirect("old001", Duration::days(40))).await.unwrap();
    repo.insert(new_redirect("mid001", Duration::days(10))).await.unwrap();
    repo.insert(new_redirect("new001", Duration::zero())).await.unwrap();

    let recent = repo.list_recent(2, 0).await.unwrap();
    let codes: Vec<_> = recent.iter().map(|r| r.code.as_str()).collect();
    assert_eq!(codes, vec!["new001", "mid001"]);

    let rest = repo.list_recent(2, 2).await.unwrap();
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].code, "old001");

    let removed = repo
        .prune_created_before(Utc::now() - Duration::days(30))
        .await
        .unwrap();
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].code, "old001");
    assert_eq!(repo.count().await.unwrap(), 2);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_counter_increments(pool: PgPool) {
    let counter = PgCounterRepository::new(Arc::new(pool));

    assert_eq!(counter.current().await.unwrap(), 0);
    assert_eq!(counter.increment().await.unwrap(), 1);
    assert_eq!(counter.increment().await.unwrap(), 2);
    assert_eq!(counter.current().await.unwrap(), 2);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_counter_concurrent_increments(pool: PgPool) {
    let counter = Arc::new(PgCounterRepository::new(Arc::new(pool)));

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let counter = counter.clone();
            tokio::spawn(async move { counter.increment().await.unwrap() })
        })
        .collect();

    let mut values = Vec::new();
    for handle in handles {
        values.push(handle.await.unwrap());
    }
    values.sort();

    assert_eq!(values, (1..=10).collect::<Vec<u64>>());
}
