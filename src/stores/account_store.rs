use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};

use crate::errors::InternalError;
use crate::errors::internal::AccountError;
use crate::stores::UniquenessGuard;
use crate::types::db::account::{self, ActiveModel, Entity as Account};
use crate::types::internal::account::{AccountField, AccountInsert, AccountMutation};

/// Persistent map of account records
///
/// Every method is atomic. Writes that must respect the username/email
/// uniqueness constraints run the check and the write in one transaction.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert a new account, returning its id; `Conflict` on a duplicate username or email
    async fn insert(&self, account: AccountInsert) -> Result<i32, InternalError>;

    /// Look up an account by id; `NotFound` if absent
    async fn find_by_id(&self, id: i32) -> Result<account::Model, InternalError>;

    /// Look up an account by exact username
    async fn find_by_username(&self, username: &str) -> Result<Option<account::Model>, InternalError>;

    /// All accounts ordered by id
    async fn list(&self) -> Result<Vec<account::Model>, InternalError>;

    /// Apply a read-modify-write to one account and return the new record
    async fn update(&self, id: i32, mutation: AccountMutation) -> Result<account::Model, InternalError>;

    /// Remove an account permanently; `NotFound` if absent
    ///
    /// `requested_by` is the deleting admin. It must still exist and still be
    /// a system admin when the delete is written, and the last system admin
    /// is never removed.
    async fn delete(&self, requested_by: Option<i32>, id: i32) -> Result<(), InternalError>;

    /// Number of accounts holding the system admin flag
    async fn count_system_admins(&self) -> Result<u64, InternalError>;
}

/// SeaORM backed AccountStore
pub struct DbAccountStore {
    db: DatabaseConnection,
    uniqueness_guard: UniquenessGuard,
}

impl DbAccountStore {
    /// Create a new DbAccountStore with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            uniqueness_guard: UniquenessGuard::new(),
        }
    }

    async fn count_admins_on<C>(conn: &C) -> Result<u64, InternalError>
    where
        C: ConnectionTrait,
    {
        Account::find()
            .filter(account::Column::IsSystemAdmin.eq(true))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_system_admins", e))
    }
}

/// Map a write failure, turning unique index violations into `Conflict`
fn map_write_error(operation: &str, e: DbErr) -> InternalError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message)) => {
            let field = if message.contains("email") {
                AccountField::Email
            } else {
                AccountField::Username
            };
            tracing::debug!("Unique constraint rejected {}: {}", operation, message);
            AccountError::Conflict { field }.into()
        }
        _ => InternalError::database(operation, e),
    }
}

#[async_trait]
impl AccountStore for DbAccountStore {
    async fn insert(&self, new_account: AccountInsert) -> Result<i32, InternalError> {
        let txn = self.db.begin().await.map_err(InternalError::transaction_begin)?;

        self.uniqueness_guard
            .check_unique(&txn, Some(&new_account.username), &new_account.email, None)
            .await?;

        let now = Utc::now().timestamp();
        let active = ActiveModel {
            id: NotSet,
            username: Set(new_account.username),
            email: Set(new_account.email),
            password_hash: Set(new_account.password_hash),
            realname: Set(new_account.realname),
            comment: Set(new_account.comment),
            is_system_admin: Set(new_account.is_system_admin),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active
            .insert(&txn)
            .await
            .map_err(|e| map_write_error("insert_account", e))?;

        txn.commit().await.map_err(InternalError::transaction_commit)?;

        Ok(model.id)
    }

    async fn find_by_id(&self, id: i32) -> Result<account::Model, InternalError> {
        Account::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_account_by_id", e))?
            .ok_or_else(|| AccountError::NotFound { id }.into())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<account::Model>, InternalError> {
        Account::find()
            .filter(account::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_account_by_username", e))
    }

    async fn list(&self) -> Result<Vec<account::Model>, InternalError> {
        Account::find()
            .order_by_asc(account::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_accounts", e))
    }

    async fn update(&self, id: i32, mutation: AccountMutation) -> Result<account::Model, InternalError> {
        let operation = mutation.name();
        let txn = self.db.begin().await.map_err(InternalError::transaction_begin)?;

        // Uniqueness precedes the existence check
        if let AccountMutation::Profile(profile) = &mutation {
            self.uniqueness_guard
                .check_unique(&txn, None, &profile.email, Some(id))
                .await?;
        }

        let current = Account::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| InternalError::database(operation, e))?
            .ok_or(AccountError::NotFound { id })?;

        let was_admin = current.is_system_admin;
        let mut active: ActiveModel = current.into();

        match mutation {
            AccountMutation::Profile(profile) => {
                active.email = Set(profile.email);
                active.realname = Set(profile.realname);
                active.comment = Set(profile.comment);
            }
            AccountMutation::SystemAdmin(flag) => {
                if was_admin && !flag && Self::count_admins_on(&txn).await? <= 1 {
                    return Err(AccountError::forbidden("cannot remove the last system admin").into());
                }
                active.is_system_admin = Set(flag);
            }
            AccountMutation::PasswordHash(hash) => {
                active.password_hash = Set(hash);
            }
        }
        active.updated_at = Set(Utc::now().timestamp());

        let updated = active
            .update(&txn)
            .await
            .map_err(|e| map_write_error(operation, e))?;

        txn.commit().await.map_err(InternalError::transaction_commit)?;

        Ok(updated)
    }

    async fn delete(&self, requested_by: Option<i32>, id: i32) -> Result<(), InternalError> {
        let txn = self.db.begin().await.map_err(InternalError::transaction_begin)?;

        // The caller's privilege may have changed since authentication
        if let Some(caller_id) = requested_by {
            let caller = Account::find_by_id(caller_id)
                .one(&txn)
                .await
                .map_err(|e| InternalError::database("delete_account", e))?;
            if !caller.is_some_and(|c| c.is_system_admin) {
                return Err(AccountError::forbidden("caller is no longer a system admin").into());
            }
        }

        let target = Account::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| InternalError::database("delete_account", e))?
            .ok_or(AccountError::NotFound { id })?;

        if target.is_system_admin && Self::count_admins_on(&txn).await? <= 1 {
            return Err(AccountError::forbidden("cannot remove the last system admin").into());
        }

        Account::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| InternalError::database("delete_account", e))?;

        txn.commit().await.map_err(InternalError::transaction_commit)?;

        Ok(())
    }

    async fn count_system_admins(&self) -> Result<u64, InternalError> {
        Self::count_admins_on(&self.db).await
    }
}

impl std::fmt::Debug for DbAccountStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbAccountStore")
            .field("db", &"<connection>")
            .finish()
    }
}
