// Seed administrator: creates the configured admin account on first start

use std::sync::Arc;

use crate::app_data::AppData;
use crate::config::Settings;
use crate::coordinators::AccountCoordinator;
use crate::errors::InternalError;
use crate::types::internal::context::RequestContext;

/// Ensure the administrator named in the settings exists
///
/// # Arguments
/// * `app_data` - Application data
/// * `settings` - Source of `ADMIN_USERNAME`, `ADMIN_PASSWORD` and `ADMIN_EMAIL`
/// * `ctx` - CLI or system context recorded as the actor
///
/// # Returns
/// * `Ok(Some(id))` - Administrator created
/// * `Ok(None)` - Account already existed and was left untouched
pub async fn seed_admin(
    app_data: Arc<AppData>,
    settings: &Settings,
    ctx: &RequestContext,
) -> Result<Option<i32>, InternalError> {
    let coordinator = AccountCoordinator::new(app_data);

    coordinator
        .ensure_seed_admin(
            ctx,
            settings.admin_username(),
            settings.admin_password(),
            settings.admin_email(),
        )
        .await
}
