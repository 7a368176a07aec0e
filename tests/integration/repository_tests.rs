//! Service and repository tests against a real Postgres.
//!
//! `sqlx::test` creates a fresh database per test from `DATABASE_URL` and
//! applies `migrations/`. Run with: `cargo test --test repository_tests -- --ignored`

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use bookshelf_server::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{CatalogBook, Credentials, NewBook},
    repository::Repository,
    services::{auth::AuthService, books::BooksService, catalog::BookLookup},
};
use sqlx::PgPool;
use tower::ServiceExt;

use common::{get, location, TestApp};

/// Catalog double that knows a handful of Austen novels
struct AustenCatalog;

#[async_trait]
impl BookLookup for AustenCatalog {
    async fn lookup(&self, isbn: &str) -> AppResult<CatalogBook> {
        let title = match isbn {
            "9780141439518" => "Pride and Prejudice",
            "9780141439587" => "Emma",
            _ => return Err(AppError::Catalog(format!("no volume found for ISBN {}", isbn))),
        };
        Ok(CatalogBook {
            title: title.to_string(),
            isbn: isbn.to_string(),
            author: "Jane Austen".to_string(),
            date: Some("2003".to_string()),
            description: None,
            rating: Some(4.0),
            image: None,
        })
    }
}

fn auth(pool: &PgPool) -> AuthService {
    let config = AuthConfig {
        hash_memory_kib: 8,
        hash_iterations: 1,
        hash_parallelism: 1,
    };
    AuthService::new(Repository::new(pool.clone()), config)
}

fn books(pool: &PgPool) -> BooksService {
    BooksService::new(Repository::new(pool.clone()), Arc::new(AustenCatalog))
}

async fn users_with_email(pool: &PgPool, email: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind(email)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn authors_named(pool: &PgPool, name: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM authors WHERE name = $1")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

fn credentials(email: &str, password: &str) -> Credentials {
    Credentials {
        username: email.to_string(),
        password: password.to_string(),
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn registering_twice_keeps_one_user(pool: PgPool) {
    let auth = auth(&pool);

    auth.register(credentials("reader@example.com", "secret-password"))
        .await
        .unwrap();
    let second = auth
        .register(credentials("Reader@Example.com", "other-password"))
        .await;

    match second {
        Err(AppError::Conflict(msg)) => assert_eq!(msg, "User exists, login"),
        other => panic!("expected conflict, got {:?}", other),
    }
    assert_eq!(users_with_email(&pool, "reader@example.com").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn concurrent_registrations_keep_one_user(pool: PgPool) {
    let auth = auth(&pool);

    let (a, b) = tokio::join!(
        auth.register(credentials("race@example.com", "secret-password")),
        auth.register(credentials("race@example.com", "secret-password")),
    );

    assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
    assert_eq!(users_with_email(&pool, "race@example.com").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn verify_distinguishes_outcomes_internally(pool: PgPool) {
    use bookshelf_server::services::auth::AuthOutcome;

    let auth = auth(&pool);
    auth.register(credentials("reader@example.com", "secret-password"))
        .await
        .unwrap();

    assert!(matches!(
        auth.verify("reader@example.com", "secret-password").await.unwrap(),
        AuthOutcome::Authenticated(_)
    ));
    assert!(matches!(
        auth.verify("reader@example.com", "wrong-password").await.unwrap(),
        AuthOutcome::BadPassword
    ));
    assert!(matches!(
        auth.verify("nobody@example.com", "secret-password").await.unwrap(),
        AuthOutcome::UnknownUser
    ));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn ingestion_creates_book_and_reuses_author(pool: PgPool) {
    let books = books(&pool);

    let pride = books.add_by_isbn("978-0-14-143951-8").await.unwrap();
    let emma = books.add_by_isbn("9780141439587").await.unwrap();

    let detail = books.detail(pride).await.unwrap();
    assert_eq!(detail.book.title, "Pride and Prejudice");
    assert_eq!(detail.book.author_name, "Jane Austen");
    assert_eq!(detail.book.isbn, "9780141439518");

    let emma = books.detail(emma).await.unwrap();
    assert_eq!(emma.book.author_id, detail.book.author_id);
    assert_eq!(authors_named(&pool, "Jane Austen").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn failed_lookup_writes_nothing(pool: PgPool) {
    let books = books(&pool);

    assert!(matches!(
        books.add_by_isbn("9999999999").await,
        Err(AppError::Catalog(_))
    ));
    assert!(books.list().await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn concurrent_author_resolution_yields_one_row(pool: PgPool) {
    let repository = Repository::new(pool.clone());

    let (a, b) = tokio::join!(
        repository.authors.resolve("Mary Shelley"),
        repository.authors.resolve("  Mary   Shelley "),
    );

    assert_eq!(a.unwrap(), b.unwrap());
    assert_eq!(authors_named(&pool, "Mary Shelley").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn deleting_a_book_removes_its_reviews(pool: PgPool) {
    let books = books(&pool);
    let repository = Repository::new(pool);

    let author_id = repository.authors.resolve("Jane Austen").await.unwrap();
    let book_id = repository
        .books
        .create(&NewBook {
            title: "Persuasion".to_string(),
            isbn: "9780141439686".to_string(),
            description: None,
            date: None,
            image_url: None,
            rating: None,
            author_id,
        })
        .await
        .unwrap();

    books.add_review(book_id, "Anne deserved better").await.unwrap();
    books.add_review(book_id, "Wentworth's letter!").await.unwrap();
    assert_eq!(books.reviews_for(book_id).await.unwrap().len(), 2);

    books.delete(book_id).await.unwrap();

    assert!(books.reviews_for(book_id).await.unwrap().is_empty());
    assert!(matches!(books.detail(book_id).await, Err(AppError::NotFound(_))));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn review_for_missing_book_is_refused_by_the_store(pool: PgPool) {
    let books = books(&pool);

    assert!(matches!(
        books.add_review(4242, "orphan").await,
        Err(AppError::Database(_))
    ));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn session_for_a_deleted_user_goes_back_to_login(pool: PgPool) {
    let app = TestApp::with_pool(pool);
    let cookie = app.login_cookie(4242).await;

    let response = app.router.clone().oneshot(get("/", Some(&cookie))).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));
}
