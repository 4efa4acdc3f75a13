use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::config::Settings;
use crate::errors::InternalError;
use crate::errors::internal::DatabaseError;

/// Connect to the accounts database
///
/// Does NOT run migrations - call `migrate_database()` separately.
pub async fn init_database(settings: &Settings) -> Result<DatabaseConnection, InternalError> {
    let database_url = settings.database_url();

    let db = Database::connect(database_url)
        .await
        .map_err(|e| InternalError::database("connect_database", e))?;

    tracing::debug!("Connected to accounts database: {}", database_url);

    Ok(db)
}

/// Run all pending migrations on the accounts database
pub async fn migrate_database(db: &DatabaseConnection) -> Result<(), InternalError> {
    Migrator::up(db, None)
        .await
        .map_err(|source| DatabaseError::Migration { source })?;

    tracing::debug!("Accounts database migrations completed");

    Ok(())
}
