use std::sync::Arc;

use crate::errors::InternalError;
use crate::errors::internal::AccountError;
use crate::providers::PasswordProvider;
use crate::stores::AccountStore;
use crate::types::internal::Identity;

/// Resolves HTTP Basic credentials to the caller's identity
pub struct AuthenticationProvider {
    store: Arc<dyn AccountStore>,
    password_provider: Arc<PasswordProvider>,
}

impl AuthenticationProvider {
    pub fn new(store: Arc<dyn AccountStore>, password_provider: Arc<PasswordProvider>) -> Self {
        Self {
            store,
            password_provider,
        }
    }

    /// Verify a username/password pair against the stored hash
    ///
    /// # Returns
    /// * `Ok(Identity)` - Credentials are valid; privilege flag is read fresh from the store
    /// * `Err(InternalError::Account(InvalidCredentials))` - Unknown username or wrong password
    /// * `Err(InternalError)` - Store or hashing failure
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Identity, InternalError> {
        let Some(account) = self.store.find_by_username(username).await? else {
            // Unknown usernames pay the same Argon2 cost as a wrong password
            self.password_provider.derive(password)?;
            tracing::debug!("Authentication failed: unknown username");
            return Err(AccountError::InvalidCredentials.into());
        };

        if !self.password_provider.verify(&account.password_hash, password)? {
            tracing::debug!(account_id = account.id, "Authentication failed: wrong password");
            return Err(AccountError::InvalidCredentials.into());
        }

        Ok(Identity::from(&account))
    }
}

impl std::fmt::Debug for AuthenticationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticationProvider")
            .field("password_provider", &self.password_provider)
            .finish()
    }
}
