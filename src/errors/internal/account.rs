use thiserror::Error;

use crate::types::internal::account::AccountField;

/// Domain errors raised by account operations
///
/// Every variant is terminal for the operation. The API layer maps each
/// variant to exactly one status code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    /// Malformed or missing input
    #[error("Invalid {field}: {reason}")]
    Validation { field: AccountField, reason: String },

    /// Caller is not allowed to perform the operation
    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    /// Target account does not exist
    #[error("Account not found: {id}")]
    NotFound { id: i32 },

    /// Username or email already taken
    #[error("{field} already exists")]
    Conflict { field: AccountField },

    /// Supplied credentials do not match any account
    #[error("Invalid credentials")]
    InvalidCredentials,
}

impl AccountError {
    pub fn validation(field: AccountField, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden {
            reason: reason.into(),
        }
    }
}
