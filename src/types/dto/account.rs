use poem_openapi::payload::Json;
use poem_openapi::{ApiResponse, Object};

use crate::types::db::account;
use crate::types::internal::account::{NewAccount, ProfileUpdate};

/// Request body for account creation
///
/// Every field defaults to empty so that missing values reach the
/// validator and are reported per field instead of as a parse failure.
#[derive(Object, Debug, Clone)]
pub struct CreateAccountRequest {
    #[oai(default)]
    pub username: String,
    #[oai(default)]
    pub email: String,
    #[oai(default)]
    pub password: String,
    #[oai(default)]
    pub realname: String,
    #[oai(default)]
    pub comment: String,
}

impl From<CreateAccountRequest> for NewAccount {
    fn from(req: CreateAccountRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            password: req.password,
            realname: req.realname,
            comment: req.comment,
        }
    }
}

/// Request body for profile updates
#[derive(Object, Debug, Clone)]
pub struct UpdateProfileRequest {
    #[oai(default)]
    pub email: String,
    #[oai(default)]
    pub realname: String,
    #[oai(default)]
    pub comment: String,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            email: req.email,
            realname: req.realname,
            comment: req.comment,
        }
    }
}

/// Request body for the system admin toggle
#[derive(Object, Debug, Clone)]
pub struct TogglePrivilegeRequest {
    /// Desired value of the system admin flag
    pub is_system_admin: bool,
}

/// Request body for password changes
#[derive(Object, Debug, Clone)]
pub struct ChangePasswordRequest {
    #[oai(default)]
    pub old_password: String,
    #[oai(default)]
    pub new_password: String,
}

/// Public view of an account. Never carries credential material.
#[derive(Object, Debug, Clone, PartialEq)]
pub struct AccountResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub realname: String,
    pub comment: String,
    pub is_system_admin: bool,
    /// Unix timestamp (seconds)
    pub created_at: i64,
    /// Unix timestamp (seconds)
    pub updated_at: i64,
}

impl From<account::Model> for AccountResponse {
    fn from(model: account::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            realname: model.realname,
            comment: model.comment,
            is_system_admin: model.is_system_admin,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Returned after a successful create
#[derive(Object, Debug, Clone)]
pub struct CreatedAccountResponse {
    pub id: i32,
}

#[derive(ApiResponse)]
pub enum CreateAccountApiResponse {
    /// Account created
    #[oai(status = 201)]
    Created(Json<CreatedAccountResponse>),
}
