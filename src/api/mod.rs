// API layer - HTTP endpoints

pub mod account;
pub mod health;

use std::sync::Arc;

use poem::Route;
use poem_openapi::OpenApiService;

pub use account::AccountApi;
pub use health::HealthApi;

use crate::app_data::AppData;

/// Build the HTTP routes: the API under `/api` and Swagger UI under `/swagger`
///
/// # Arguments
/// * `app_data` - Shared application data
/// * `server_url` - Public base URL advertised in the OpenAPI document
pub fn routes(app_data: Arc<AppData>, server_url: &str) -> Route {
    let api_service = OpenApiService::new(
        (HealthApi::new(app_data.db.clone()), AccountApi::new(app_data)),
        "Registry Accounts API",
        env!("CARGO_PKG_VERSION"),
    )
    .server(format!("{}/api", server_url));

    let ui = api_service.swagger_ui();

    Route::new().nest("/api", api_service).nest("/swagger", ui)
}
