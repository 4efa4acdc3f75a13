// CLI module for server startup and administrative operations

pub mod seed_admin;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::app_data::AppData;
use crate::config::Settings;
use crate::types::internal::context::RequestContext;

/// Registry accounts service
#[derive(Parser, Debug)]
#[command(name = "registry-accounts")]
#[command(about = "User account management service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// The selected command; `serve` when none is given
    pub fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Serve)
    }
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Seed the administrator and start the HTTP server (default)
    Serve,

    /// Apply pending database migrations and exit
    Migrate,

    /// Create the configured administrator account if it does not exist
    SeedAdmin,
}

/// Execute a one-shot CLI command
///
/// Migrations have already run by the time any command executes, so
/// `migrate` only reports success. `serve` is handled by main.
///
/// # Returns
/// * `Ok(())` - Command executed successfully
/// * `Err(...)` - Command execution failed
pub async fn execute_command(
    command: Commands,
    app_data: Arc<AppData>,
    settings: &Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Migrate => {
            println!("Database migrations are up to date");
        }
        Commands::SeedAdmin => match seed_admin::seed_admin(app_data, settings, &RequestContext::for_cli("seed-admin")).await? {
            Some(id) => println!("Administrator '{}' created with id {}", settings.admin_username(), id),
            None => println!("Administrator '{}' already exists", settings.admin_username()),
        },
        Commands::Serve => {
            tracing::warn!("serve is not a one-shot command");
        }
    }

    Ok(())
}
