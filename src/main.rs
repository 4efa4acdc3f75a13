use std::sync::Arc;

use clap::Parser;
use poem::{listener::TcpListener, Server};

use registry_accounts::api;
use registry_accounts::app_data::AppData;
use registry_accounts::cli::{self, Cli, Commands};
use registry_accounts::config::{self, Settings};
use registry_accounts::types::internal::context::RequestContext;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    config::init_logging()?;

    let cli = Cli::parse();
    let settings = Settings::from_env()?;
    tracing::debug!("Loaded settings: {:?}", settings);

    // Connect and bring the schema up to date before any command runs
    let db = config::init_database(&settings).await?;
    config::migrate_database(&db).await?;

    let app_data = Arc::new(AppData::init(db, &settings));

    let command = cli.command();
    if command != Commands::Serve {
        return cli::execute_command(command, app_data, &settings).await;
    }

    match cli::seed_admin::seed_admin(app_data.clone(), &settings, &RequestContext::for_system("startup")).await? {
        Some(id) => tracing::info!("Seed administrator '{}' created with id {}", settings.admin_username(), id),
        None => tracing::debug!("Seed administrator '{}' already present", settings.admin_username()),
    }

    let public_url = format!("http://localhost:{}", settings.server_port());
    let app = api::routes(app_data, &public_url);

    tracing::info!("Starting server on http://{}", settings.server_address());
    tracing::info!("Swagger UI available at {}/swagger", public_url);

    Server::new(TcpListener::bind(settings.server_address()))
        .run(app)
        .await?;

    Ok(())
}
