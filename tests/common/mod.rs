// Common test utilities for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use base64::Engine;
use migration::{Migrator, MigratorTrait};
use poem::test::{TestClient, TestResponse};
use poem::Route;
use registry_accounts::api;
use registry_accounts::app_data::AppData;
use registry_accounts::providers::AuthorizationPolicy;
use registry_accounts::types::internal::account::AccountInsert;
use sea_orm::{Database, DatabaseConnection};
use serde_json::json;

pub const TEST_PASSWORD_PEPPER: &str = "test-pepper-for-integration";
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "Harbor12345";

/// Creates an in-memory accounts database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Creates AppData with one system admin (`admin` / `Harbor12345`)
///
/// Returns (app_data, admin_id)
pub async fn setup_app_data(policy: AuthorizationPolicy) -> (Arc<AppData>, i32) {
    let app_data = Arc::new(AppData::new(
        setup_test_db().await,
        TEST_PASSWORD_PEPPER.to_string(),
        policy,
    ));

    let admin_id = app_data
        .account_store
        .insert(AccountInsert {
            username: ADMIN_USERNAME.to_string(),
            email: "admin@example.com".to_string(),
            password_hash: app_data.password_provider.derive(ADMIN_PASSWORD).unwrap(),
            realname: "system admin".to_string(),
            comment: String::new(),
            is_system_admin: true,
        })
        .await
        .expect("Failed to seed admin");

    (app_data, admin_id)
}

/// HTTP test client over the full route tree
pub async fn setup_client(policy: AuthorizationPolicy) -> (TestClient<Route>, Arc<AppData>, i32) {
    let (app_data, admin_id) = setup_app_data(policy).await;
    let client = TestClient::new(api::routes(app_data.clone(), "http://localhost:3000"));
    (client, app_data, admin_id)
}

/// Value of an HTTP Basic Authorization header
pub fn basic_auth(username: &str, password: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(format!("{}:{}", username, password));
    format!("Basic {}", encoded)
}

/// Request body for a valid account whose password equals its username
pub fn account_body(username: &str) -> serde_json::Value {
    json!({
        "username": username,
        "email": format!("{}@mydomain.com", username),
        "password": username,
        "realname": username,
        "comment": "test user",
    })
}

/// Create an account as admin over HTTP and return its id
pub async fn create_via_api(client: &TestClient<Route>, username: &str) -> i32 {
    let resp = client
        .post("/api/users")
        .header("Authorization", basic_auth(ADMIN_USERNAME, ADMIN_PASSWORD))
        .body_json(&account_body(username))
        .send()
        .await;
    resp.assert_status(poem::http::StatusCode::CREATED);
    id_of(resp).await
}

/// Parse a response body as JSON
pub async fn body_json(resp: TestResponse) -> serde_json::Value {
    let body = resp.0.into_body().into_string().await.expect("Failed to read body");
    serde_json::from_str(&body).expect("Response body is not JSON")
}

/// Read the `id` field of a JSON response body
pub async fn id_of(resp: TestResponse) -> i32 {
    body_json(resp).await["id"].as_i64().expect("Response has no id") as i32
}
