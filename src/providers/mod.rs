// Providers layer - Work performers
//
// Providers hold the account rules that coordinators orchestrate: field
// validation, access decisions, password hashing and credential checks.

pub mod authentication_provider;
pub mod authorization_provider;
pub mod password_provider;
pub mod validator_provider;

pub use authentication_provider::AuthenticationProvider;
pub use authorization_provider::{AccountOperation, AuthorizationPolicy, AuthorizationProvider};
pub use password_provider::PasswordProvider;
pub use validator_provider::{FieldError, ValidatorProvider};
