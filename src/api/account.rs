use std::sync::Arc;

use poem::Request;
use poem_openapi::param::{Path, Query};
use poem_openapi::payload::Json;
use poem_openapi::{OpenApi, Tags};

use crate::app_data::AppData;
use crate::coordinators::AccountCoordinator;
use crate::errors::AccountApiError;
use crate::providers::AuthenticationProvider;
use crate::types::dto::account::{
    AccountResponse, ChangePasswordRequest, CreateAccountApiResponse, CreateAccountRequest,
    CreatedAccountResponse, TogglePrivilegeRequest, UpdateProfileRequest,
};
use crate::types::dto::common::MessageResponse;
use crate::types::internal::context::RequestContext;

/// Account management API endpoints
///
/// Callers authenticate with HTTP Basic credentials. Requests without an
/// Authorization header run as anonymous.
pub struct AccountApi {
    coordinator: AccountCoordinator,
    authentication_provider: Arc<AuthenticationProvider>,
}

impl AccountApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        let authentication_provider = Arc::new(AuthenticationProvider::new(
            app_data.account_store.clone(),
            app_data.password_provider.clone(),
        ));

        Self {
            coordinator: AccountCoordinator::new(app_data),
            authentication_provider,
        }
    }

    async fn context(&self, req: &Request) -> Result<RequestContext, AccountApiError> {
        RequestContext::validate_request(req, &self.authentication_provider)
            .await
            .map_err(AccountApiError::from)
    }
}

/// API tags for account endpoints
#[derive(Tags)]
enum AccountTags {
    /// Account management endpoints
    Accounts,
}

#[OpenApi]
impl AccountApi {
    /// Create an account
    #[oai(path = "/users", method = "post", tag = "AccountTags::Accounts")]
    async fn create(
        &self,
        req: &Request,
        body: Json<CreateAccountRequest>,
    ) -> Result<CreateAccountApiResponse, AccountApiError> {
        let ctx = self.context(req).await?;
        let id = self.coordinator.create(&ctx, body.0.into()).await?;

        Ok(CreateAccountApiResponse::Created(Json(CreatedAccountResponse { id })))
    }

    /// List accounts, optionally by exact username
    #[oai(path = "/users", method = "get", tag = "AccountTags::Accounts")]
    async fn list(
        &self,
        req: &Request,
        username: Query<Option<String>>,
    ) -> Result<Json<Vec<AccountResponse>>, AccountApiError> {
        let ctx = self.context(req).await?;
        let accounts = self.coordinator.list(&ctx, username.0.as_deref()).await?;

        Ok(Json(accounts.into_iter().map(AccountResponse::from).collect()))
    }

    /// Get an account by id
    #[oai(path = "/users/:id", method = "get", tag = "AccountTags::Accounts")]
    async fn get(&self, req: &Request, id: Path<i32>) -> Result<Json<AccountResponse>, AccountApiError> {
        let ctx = self.context(req).await?;
        let account = self.coordinator.get(&ctx, id.0).await?;

        Ok(Json(account.into()))
    }

    /// Update email, real name and comment
    #[oai(path = "/users/:id", method = "put", tag = "AccountTags::Accounts")]
    async fn update_profile(
        &self,
        req: &Request,
        id: Path<i32>,
        body: Json<UpdateProfileRequest>,
    ) -> Result<Json<AccountResponse>, AccountApiError> {
        let ctx = self.context(req).await?;
        let account = self.coordinator.update_profile(&ctx, id.0, body.0.into()).await?;

        Ok(Json(account.into()))
    }

    /// Grant or revoke the system admin flag
    #[oai(path = "/users/:id/sysadmin", method = "put", tag = "AccountTags::Accounts")]
    async fn toggle_privilege(
        &self,
        req: &Request,
        id: Path<i32>,
        body: Json<TogglePrivilegeRequest>,
    ) -> Result<Json<AccountResponse>, AccountApiError> {
        let ctx = self.context(req).await?;
        let account = self
            .coordinator
            .toggle_privilege(&ctx, id.0, body.is_system_admin)
            .await?;

        Ok(Json(account.into()))
    }

    /// Change the password of an account
    #[oai(path = "/users/:id/password", method = "put", tag = "AccountTags::Accounts")]
    async fn change_password(
        &self,
        req: &Request,
        id: Path<i32>,
        body: Json<ChangePasswordRequest>,
    ) -> Result<Json<MessageResponse>, AccountApiError> {
        let ctx = self.context(req).await?;
        self.coordinator
            .change_password(&ctx, id.0, &body.old_password, &body.new_password)
            .await?;

        Ok(Json(MessageResponse {
            message: "Password changed".to_string(),
        }))
    }

    /// Delete an account permanently
    #[oai(path = "/users/:id", method = "delete", tag = "AccountTags::Accounts")]
    async fn delete(&self, req: &Request, id: Path<i32>) -> Result<Json<MessageResponse>, AccountApiError> {
        let ctx = self.context(req).await?;
        self.coordinator.delete(&ctx, id.0).await?;

        Ok(Json(MessageResponse {
            message: format!("Account {} deleted", id.0),
        }))
    }
}
