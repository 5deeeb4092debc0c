use crate::router::create_router;
use crate::schemas::{ApiResponse, AppState};
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::Router;
use axum_test::TestServer;
use domain::NewAccount;
use migration::{Migrator, MigratorTrait};
use moka::future::Cache;
use sea_orm::{Database, DatabaseConnection};
use serde_json::json;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Create an in-memory SQLite database for testing
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Create AppState for testing
pub async fn setup_test_app_state() -> AppState {
    let db = setup_test_db().await;
    AppState::new(db, Cache::new(100))
}

/// Installs the process-wide test subscriber on first use.
///
/// The log level is taken from RUST_LOG and defaults to WARN. Output goes
/// through the test writer so it is captured per test.
fn init_test_tracing() {
    let log_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|level| level.parse::<Level>().ok())
        .unwrap_or(Level::WARN);

    // Err means another test already installed it
    let _ = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_test_writer()
        .try_init();
}

/// Create axum app for testing
pub async fn setup_test_app() -> Router {
    init_test_tracing();
    create_router(setup_test_app_state().await)
}

/// Test server plus the state behind it, for tests that seed data directly.
pub async fn setup_test_server() -> (TestServer, AppState) {
    init_test_tracing();
    let state = setup_test_app_state().await;
    let server = TestServer::new(create_router(state.clone())).unwrap();
    (server, state)
}

pub fn token_header(token: &str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("authorization"),
        HeaderValue::from_str(&format!("Token {}", token)).unwrap(),
    )
}

/// Registers an account through the API and returns its ID.
pub async fn register(server: &TestServer, email: &str, password: &str) -> i64 {
    let response = server
        .post("/api/v1/users")
        .json(&json!({ "email": email, "password": password }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: ApiResponse<serde_json::Value> = response.json();
    body.data["id"].as_i64().unwrap()
}

/// Exchanges credentials for a token through the API.
pub async fn login(server: &TestServer, email: &str, password: &str) -> String {
    let response = server
        .post("/api/v1/auth/token")
        .json(&json!({ "email": email, "password": password }))
        .await;
    response.assert_status_ok();
    let body: ApiResponse<serde_json::Value> = response.json();
    body.data["token"].as_str().unwrap().to_string()
}

/// Seeds a superuser directly and returns a token for it.
pub async fn superuser_token(server: &TestServer, state: &AppState) -> String {
    state
        .accounts
        .create_superuser(NewAccount::new("admin@example.com", "adminpass"))
        .await
        .unwrap();
    login(server, "admin@example.com", "adminpass").await
}
