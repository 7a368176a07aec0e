//! End-to-end tests against a running server.
//!
//! Start the server in development mode (session cookie not HTTPS-only)
//! with Postgres and Redis available, then:
//! `cargo test --test api_tests -- --ignored`

use reqwest::{header, redirect::Policy, Client, Response, StatusCode};

fn base_url() -> String {
    std::env::var("BOOKSHELF_TEST_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

fn client() -> Client {
    Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("Failed to build client")
}

fn unique_email() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("reader{}@example.com", nanos)
}

fn location(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// `name=value` part of the session cookie set by the response
fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

async fn register(client: &Client, email: &str, password: &str) -> Response {
    client
        .post(format!("{}/register", base_url()))
        .form(&[("username", email), ("password", password)])
        .send()
        .await
        .expect("Failed to send request")
}

async fn login(client: &Client, email: &str, password: &str) -> Response {
    client
        .post(format!("{}/login", base_url()))
        .form(&[("username", email), ("password", password)])
        .send()
        .await
        .expect("Failed to send request")
}

async fn logged_in_cookie(client: &Client) -> String {
    let email = unique_email();
    register(client, &email, "secret-password").await;
    let response = login(client, &email, "secret-password").await;
    session_cookie(&response).expect("No session cookie after login")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let response = client()
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_duplicate_registration_is_refused() {
    let client = client();
    let email = unique_email();

    let first = register(&client, &email, "secret-password").await;
    assert_eq!(first.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&first).as_deref(), Some("/login"));

    let second = register(&client, &email, "another-password").await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert!(second.text().await.unwrap().contains("User exists, login"));
}

#[tokio::test]
#[ignore]
async fn test_login_then_protected_page() {
    let client = client();
    let email = unique_email();
    register(&client, &email, "secret-password").await;

    let response = login(&client, &email, "secret-password").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response).as_deref(), Some("/"));
    let cookie = session_cookie(&response).expect("No session cookie");

    let response = client
        .get(format!("{}/", base_url()))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains(&email));
}

#[tokio::test]
#[ignore]
async fn test_protected_page_without_login() {
    let response = client()
        .get(format!("{}/", base_url()))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response).as_deref(), Some("/login"));
}

#[tokio::test]
#[ignore]
async fn test_bad_password_and_unknown_user_look_the_same() {
    let client = client();
    let email = unique_email();
    register(&client, &email, "secret-password").await;

    let bad_password = login(&client, &email, "wrong-password").await;
    let unknown_user = login(&client, &unique_email(), "wrong-password").await;

    for response in [bad_password, unknown_user] {
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response).as_deref(), Some("/login"));
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }
}

#[tokio::test]
#[ignore] // Also needs outbound access to the catalog API
async fn test_add_book_by_isbn() {
    let client = client();
    let cookie = logged_in_cookie(&client).await;

    let response = client
        .post(format!("{}/new", base_url()))
        .header(header::COOKIE, &cookie)
        .form(&[("isbn", "9780141439518")])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response).as_deref(), Some("/"));

    let body = client
        .get(format!("{}/", base_url()))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .expect("Failed to send request")
        .text()
        .await
        .unwrap();
    assert!(body.contains("Pride and Prejudice"));
    assert!(body.contains("Jane Austen"));
}

#[tokio::test]
#[ignore]
async fn test_logout_invalidates_cookie() {
    let client = client();
    let cookie = logged_in_cookie(&client).await;

    let response = client
        .post(format!("{}/logout", base_url()))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(location(&response).as_deref(), Some("/login"));

    let response = client
        .get(format!("{}/new", base_url()))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(location(&response).as_deref(), Some("/login"));
}
