use crate::errors::internal::{AccountError, InternalError};
use crate::types::dto::common::ErrorResponse;
use poem_openapi::{ApiResponse, payload::Json};
use std::fmt;

/// Account operation error types
#[derive(ApiResponse, Debug)]
pub enum AccountApiError {
    /// Request failed field validation
    #[oai(status = 400)]
    ValidationFailed(Json<ErrorResponse>),

    /// Credentials supplied but not valid
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),

    /// Caller may not perform this operation
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    /// Account not found
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    /// Username or email already in use
    #[oai(status = 409)]
    Conflict(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

fn body(error: &str, message: String, status_code: u16) -> Json<ErrorResponse> {
    Json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code,
    })
}

impl AccountApiError {
    /// Create a ValidationFailed error
    pub fn validation_failed(message: String) -> Self {
        AccountApiError::ValidationFailed(body("validation_failed", message, 400))
    }

    /// Create an Unauthorized error
    pub fn unauthorized() -> Self {
        AccountApiError::Unauthorized(body(
            "unauthorized",
            "Invalid username or password".to_string(),
            401,
        ))
    }

    /// Create a Forbidden error
    pub fn forbidden(message: String) -> Self {
        AccountApiError::Forbidden(body("forbidden", message, 403))
    }

    /// Create a NotFound error
    pub fn not_found(id: i32) -> Self {
        AccountApiError::NotFound(body("not_found", format!("Account not found: {}", id), 404))
    }

    /// Create a Conflict error
    pub fn conflict(message: String) -> Self {
        AccountApiError::Conflict(body("conflict", message, 409))
    }

    /// Create an InternalError
    pub fn internal_error(message: String) -> Self {
        AccountApiError::InternalError(body("internal_error", message, 500))
    }

    /// Convert InternalError to AccountApiError
    ///
    /// Domain errors keep their message; infrastructure failures are logged
    /// and replaced with a generic message so no internals leak.
    pub fn from_internal_error(err: InternalError) -> Self {
        match err {
            InternalError::Account(account_err) => match account_err {
                AccountError::Validation { .. } => {
                    AccountApiError::validation_failed(account_err.to_string())
                }
                AccountError::Forbidden { reason } => AccountApiError::forbidden(reason),
                AccountError::NotFound { id } => AccountApiError::not_found(id),
                AccountError::Conflict { .. } => AccountApiError::conflict(account_err.to_string()),
                AccountError::InvalidCredentials => AccountApiError::unauthorized(),
            },
            other => {
                tracing::error!("Internal error while handling account request: {}", other);
                AccountApiError::internal_error("An internal error occurred".to_string())
            }
        }
    }

    /// HTTP status code of this error
    pub fn status_code(&self) -> u16 {
        self.body().status_code
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        self.body().message.clone()
    }

    fn body(&self) -> &ErrorResponse {
        match self {
            AccountApiError::ValidationFailed(json) => &json.0,
            AccountApiError::Unauthorized(json) => &json.0,
            AccountApiError::Forbidden(json) => &json.0,
            AccountApiError::NotFound(json) => &json.0,
            AccountApiError::Conflict(json) => &json.0,
            AccountApiError::InternalError(json) => &json.0,
        }
    }
}

impl From<InternalError> for AccountApiError {
    fn from(err: InternalError) -> Self {
        AccountApiError::from_internal_error(err)
    }
}

impl fmt::Display for AccountApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
