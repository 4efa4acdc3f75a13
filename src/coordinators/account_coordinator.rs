use std::sync::Arc;

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::errors::internal::AccountError;
use crate::providers::{AccountOperation, AuthorizationProvider, PasswordProvider, ValidatorProvider};
use crate::stores::AccountStore;
use crate::types::db::account;
use crate::types::internal::account::{AccountField, AccountInsert, AccountMutation, NewAccount, ProfileUpdate};
use crate::types::internal::context::RequestContext;

/// Real name given to the seeded administrator
const SEED_ADMIN_REALNAME: &str = "system admin";

/// Orchestrates the account management workflows
///
/// Every operation runs the same stage order:
/// authorize, validate, uniqueness, existence, mutate.
/// A request stops at the first stage that fails, so an unauthorized caller
/// never learns whether its input was valid or whether the target exists.
pub struct AccountCoordinator {
    store: Arc<dyn AccountStore>,
    validator: ValidatorProvider,
    password_provider: Arc<PasswordProvider>,
    authorization_provider: AuthorizationProvider,
}

impl AccountCoordinator {
    /// Create AccountCoordinator from AppData
    ///
    /// # Arguments
    /// * `app_data` - Application data containing the store and configuration
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            store: app_data.account_store.clone(),
            validator: ValidatorProvider::new(),
            password_provider: app_data.password_provider.clone(),
            authorization_provider: AuthorizationProvider::new(app_data.authorization_policy),
        }
    }

    fn authorize(
        &self,
        ctx: &RequestContext,
        operation: AccountOperation,
        target: Option<i32>,
    ) -> Result<(), InternalError> {
        self.authorization_provider
            .authorize(ctx.identity.as_ref(), operation, target)
            .map_err(InternalError::from)
    }

    /// Register a new account
    ///
    /// # Returns
    /// * `Ok(i32)` - Id of the new account
    /// * `Err(InternalError)` - Forbidden, Validation, Conflict or an infrastructure failure
    pub async fn create(&self, ctx: &RequestContext, new_account: NewAccount) -> Result<i32, InternalError> {
        // Step 1: Authorize
        self.authorize(ctx, AccountOperation::Create, None)?;

        // Step 2: Validate every field, reject on the first failure
        ValidatorProvider::first_failure(self.validator.validate_new_account(&new_account))?;

        // Step 3: Hash the password; uniqueness is checked inside the insert transaction
        let password_hash = self.password_provider.derive(&new_account.password)?;

        // Step 4: Insert; new accounts never carry the admin flag
        let id = self
            .store
            .insert(AccountInsert {
                username: new_account.username,
                email: new_account.email,
                password_hash,
                realname: new_account.realname,
                comment: new_account.comment,
                is_system_admin: false,
            })
            .await?;

        tracing::info!(
            request_id = %ctx.request_id,
            actor = %ctx.actor_id,
            account_id = id,
            "Account created"
        );

        Ok(id)
    }

    /// List accounts, optionally filtered by exact username
    pub async fn list(
        &self,
        ctx: &RequestContext,
        username: Option<&str>,
    ) -> Result<Vec<account::Model>, InternalError> {
        self.authorize(ctx, AccountOperation::List, None)?;

        match username {
            Some(username) => Ok(self.store.find_by_username(username).await?.into_iter().collect()),
            None => self.store.list().await,
        }
    }

    /// Fetch one account by id
    pub async fn get(&self, ctx: &RequestContext, id: i32) -> Result<account::Model, InternalError> {
        self.authorize(ctx, AccountOperation::Get, Some(id))?;

        self.store.find_by_id(id).await
    }

    /// Replace the profile fields (email, realname, comment) of an account
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        id: i32,
        profile: ProfileUpdate,
    ) -> Result<account::Model, InternalError> {
        // Step 1: Authorize
        self.authorize(ctx, AccountOperation::UpdateProfile, Some(id))?;

        // Step 2: Validate the profile fields
        ValidatorProvider::first_failure(self.validator.validate_profile(&profile))?;

        // Step 3: Email uniqueness, existence and write in one store transaction
        let updated = self.store.update(id, AccountMutation::Profile(profile)).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            actor = %ctx.actor_id,
            account_id = id,
            "Account profile updated"
        );

        Ok(updated)
    }

    /// Grant or revoke the system administrator flag
    pub async fn toggle_privilege(
        &self,
        ctx: &RequestContext,
        id: i32,
        is_system_admin: bool,
    ) -> Result<account::Model, InternalError> {
        self.authorize(ctx, AccountOperation::TogglePrivilege, Some(id))?;

        let updated = self
            .store
            .update(id, AccountMutation::SystemAdmin(is_system_admin))
            .await?;

        tracing::info!(
            request_id = %ctx.request_id,
            actor = %ctx.actor_id,
            account_id = id,
            is_system_admin,
            "System admin flag changed"
        );

        Ok(updated)
    }

    /// Change an account password after verifying the old one
    ///
    /// Coordinates the sequence of operations:
    /// 1. Authorize (admin or the account itself)
    /// 2. Validate old (present) and new (present and strong)
    /// 3. Load the account
    /// 4. Verify the old password, Forbidden on mismatch
    /// 5. Skip the write when the new password equals the old one
    /// 6. Hash and store the new password
    pub async fn change_password(
        &self,
        ctx: &RequestContext,
        id: i32,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), InternalError> {
        // Step 1: Authorize
        self.authorize(ctx, AccountOperation::ChangePassword, Some(id))?;

        // Step 2: Validate both fields
        ValidatorProvider::first_failure(self.validator.validate_password_change(old_password, new_password))?;

        // Step 3: Load the account
        let current = self.store.find_by_id(id).await?;

        // Step 4: Verify the old password
        if !self.password_provider.verify(&current.password_hash, old_password)? {
            tracing::warn!(
                request_id = %ctx.request_id,
                actor = %ctx.actor_id,
                account_id = id,
                "Password change rejected: old password mismatch"
            );
            return Err(AccountError::forbidden("old password is incorrect").into());
        }

        // Step 5: Nothing to write when the password is unchanged
        if old_password == new_password {
            tracing::debug!(account_id = id, "Password unchanged, skipping write");
            return Ok(());
        }

        // Step 6: Hash and store
        let password_hash = self.password_provider.derive(new_password)?;
        self.store.update(id, AccountMutation::PasswordHash(password_hash)).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            actor = %ctx.actor_id,
            account_id = id,
            "Password changed"
        );

        Ok(())
    }

    /// Permanently remove an account
    pub async fn delete(&self, ctx: &RequestContext, id: i32) -> Result<(), InternalError> {
        self.authorize(ctx, AccountOperation::Delete, Some(id))?;

        // Caller privilege and the last-admin rule are re-checked on the writing transaction
        let requested_by = ctx.caller().map(|identity| identity.account_id);
        self.store.delete(requested_by, id).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            actor = %ctx.actor_id,
            account_id = id,
            "Account deleted"
        );

        Ok(())
    }

    /// Make sure the configured administrator account exists
    ///
    /// Runs without authorization; callers are startup and the CLI. An
    /// existing account with the same username is left untouched.
    ///
    /// # Returns
    /// * `Ok(Some(id))` - Administrator created
    /// * `Ok(None)` - An account with this username already exists
    pub async fn ensure_seed_admin(
        &self,
        ctx: &RequestContext,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<Option<i32>, InternalError> {
        // Step 1: Nothing to do when the account already exists
        if let Some(existing) = self.store.find_by_username(username).await? {
            tracing::debug!(account_id = existing.id, "Seed admin already exists");
            return Ok(None);
        }

        // Step 2: Validate the configured credentials like any other account
        let seed = NewAccount {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            realname: SEED_ADMIN_REALNAME.to_string(),
            comment: String::new(),
        };
        ValidatorProvider::first_failure(self.validator.validate_new_account(&seed))?;

        // Step 3: Insert with the admin flag set
        let password_hash = self.password_provider.derive(&seed.password)?;
        let result = self
            .store
            .insert(AccountInsert {
                username: seed.username,
                email: seed.email,
                password_hash,
                realname: seed.realname,
                comment: seed.comment,
                is_system_admin: true,
            })
            .await;

        match result {
            Ok(id) => {
                tracing::info!(actor = %ctx.actor_id, account_id = id, "Seed admin created");
                Ok(Some(id))
            }
            // Another process seeded it between the lookup and the insert
            Err(InternalError::Account(AccountError::Conflict {
                field: AccountField::Username,
            })) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
