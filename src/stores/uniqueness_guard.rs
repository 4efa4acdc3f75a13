use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};

use crate::errors::InternalError;
use crate::errors::internal::AccountError;
use crate::types::db::account::{self, Entity as Account};
use crate::types::internal::account::AccountField;

/// Username/email collision checks
///
/// Always run on the transaction that performs the subsequent write, so the
/// check and the insert/update commit or roll back together. The unique
/// indexes on both columns back this up for writers that race past it.
#[derive(Debug, Default, Clone, Copy)]
pub struct UniquenessGuard;

impl UniquenessGuard {
    pub fn new() -> Self {
        Self
    }

    /// Fail with `Conflict` if `username` or `email` is used by another account
    ///
    /// # Arguments
    /// * `conn` - Connection or transaction to query on
    /// * `username` - Username to check; `None` for profile updates where it is immutable
    /// * `email` - Email to check
    /// * `exclude_id` - Account being updated, ignored when looking for collisions
    pub async fn check_unique<C>(
        &self,
        conn: &C,
        username: Option<&str>,
        email: &str,
        exclude_id: Option<i32>,
    ) -> Result<(), InternalError>
    where
        C: ConnectionTrait,
    {
        if let Some(username) = username {
            if self.is_taken(conn, account::Column::Username, username, exclude_id).await? {
                tracing::debug!("Username already taken: {}", username);
                return Err(AccountError::Conflict { field: AccountField::Username }.into());
            }
        }

        if self.is_taken(conn, account::Column::Email, email, exclude_id).await? {
            tracing::debug!("Email already taken: {}", email);
            return Err(AccountError::Conflict { field: AccountField::Email }.into());
        }

        Ok(())
    }

    async fn is_taken<C>(
        &self,
        conn: &C,
        column: account::Column,
        value: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, InternalError>
    where
        C: ConnectionTrait,
    {
        let mut query = Account::find().filter(column.eq(value));
        if let Some(id) = exclude_id {
            query = query.filter(account::Column::Id.ne(id));
        }

        let count = query
            .count(conn)
            .await
            .map_err(|e| InternalError::database("check_unique", e))?;

        Ok(count > 0)
    }
}
