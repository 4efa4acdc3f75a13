// Test utilities shared across unit tests
// Only compiled when running tests

use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::app_data::AppData;
use crate::coordinators::AccountCoordinator;
use crate::providers::AuthorizationPolicy;
use crate::stores::AccountStore;
use crate::types::internal::Identity;
use crate::types::internal::account::{AccountInsert, NewAccount};
use crate::types::internal::context::RequestContext;

pub const TEST_PASSWORD_PEPPER: &str = "test-pepper-for-unit-tests";

/// Password of every account created with `create_account`
pub const TEST_ADMIN_PASSWORD: &str = "Harbor12345";

/// Creates an in-memory database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Creates AppData over a fresh database with the given policy
pub async fn setup_test_app_data(policy: AuthorizationPolicy) -> Arc<AppData> {
    Arc::new(AppData::new(
        setup_test_db().await,
        TEST_PASSWORD_PEPPER.to_string(),
        policy,
    ))
}

/// Creates a coordinator with default policy and one system admin
///
/// Returns (coordinator, admin_id)
pub async fn setup_test_coordinator() -> (AccountCoordinator, i32) {
    let app_data = setup_test_app_data(AuthorizationPolicy::default()).await;
    let admin_id = create_account(&app_data, "admin", true).await;
    (AccountCoordinator::new(app_data), admin_id)
}

/// Inserts an account directly through the store, bypassing authorization
pub async fn create_account(app_data: &Arc<AppData>, username: &str, is_system_admin: bool) -> i32 {
    let password_hash = app_data
        .password_provider
        .derive(TEST_ADMIN_PASSWORD)
        .expect("Failed to hash test password");

    app_data
        .account_store
        .insert(AccountInsert {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password_hash,
            realname: username.to_string(),
            comment: String::new(),
            is_system_admin,
        })
        .await
        .expect("Failed to create test account")
}

/// A valid account request whose password equals its username
pub fn new_account(username: &str) -> NewAccount {
    NewAccount {
        username: username.to_string(),
        email: format!("{}@mydomain.com", username),
        password: username.to_string(),
        realname: username.to_string(),
        comment: "test user".to_string(),
    }
}

pub fn context_for(account_id: i32, username: &str, is_system_admin: bool) -> RequestContext {
    RequestContext::anonymous().with_identity(Identity {
        account_id,
        username: username.to_string(),
        is_system_admin,
    })
}

pub fn admin_context(admin_id: i32) -> RequestContext {
    context_for(admin_id, "admin", true)
}
