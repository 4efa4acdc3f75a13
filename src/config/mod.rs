// Configuration layer - environment settings, logging and database setup

pub mod database;
pub mod env_provider;
pub mod errors;
pub mod logging;
pub mod settings;

pub use database::{init_database, migrate_database};
pub use env_provider::{EnvironmentProvider, SystemEnvironment};
#[cfg(test)]
pub use env_provider::MockEnvironment;
pub use errors::ConfigError;
pub use logging::init_logging;
pub use settings::{AuthMode, Settings};
