use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::Settings;
use crate::providers::{AuthorizationPolicy, PasswordProvider};
use crate::stores::{AccountStore, DbAccountStore};

/// Centralized application data following the main-owned stores pattern
///
/// Created once in main.rs and shared across coordinators and API handlers.
///
/// ```text
/// main.rs
///   ↓
/// AppData::init(db, settings)
///   ├─ db (DatabaseConnection)
///   ├─ account_store (Arc<dyn AccountStore>)
///   ├─ password_provider (Arc<PasswordProvider>)
///   └─ authorization_policy (AuthorizationPolicy)
///   ↓ wrapped in Arc<AppData>
///   ├─ AccountCoordinator::new(app_data)
///   └─ AccountApi::new(app_data)
/// ```
pub struct AppData {
    pub db: DatabaseConnection,
    pub account_store: Arc<dyn AccountStore>,
    pub password_provider: Arc<PasswordProvider>,
    pub authorization_policy: AuthorizationPolicy,
}

impl AppData {
    /// Build application data from a migrated connection and loaded settings
    pub fn init(db: DatabaseConnection, settings: &Settings) -> Self {
        tracing::info!("Initializing AppData...");
        Self::new(
            db,
            settings.password_pepper().to_string(),
            settings.authorization_policy(),
        )
    }

    pub fn new(db: DatabaseConnection, password_pepper: String, authorization_policy: AuthorizationPolicy) -> Self {
        let account_store: Arc<dyn AccountStore> = Arc::new(DbAccountStore::new(db.clone()));
        let password_provider = Arc::new(PasswordProvider::new(password_pepper));

        tracing::debug!(
            self_registration = authorization_policy.self_registration,
            auth_mode = %authorization_policy.auth_mode,
            "AppData initialized"
        );

        Self {
            db,
            account_store,
            password_provider,
            authorization_policy,
        }
    }
}
