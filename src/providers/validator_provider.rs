use crate::errors::internal::AccountError;
use crate::types::internal::account::{AccountField, NewAccount, ProfileUpdate};

/// Maximum length of a username
pub const USERNAME_MAX_LENGTH: usize = 255;
/// Maximum length of an email address
pub const EMAIL_MAX_LENGTH: usize = 255;
/// Maximum length of a real name
pub const REALNAME_MAX_LENGTH: usize = 20;
/// Maximum length of the free-form comment
pub const COMMENT_MAX_LENGTH: usize = 30;
/// Password length bounds (inclusive)
pub const PASSWORD_MIN_LENGTH: usize = 8;
pub const PASSWORD_MAX_LENGTH: usize = 20;

const USERNAME_ILLEGAL_CHARS: &[char] = &[',', '"', '~', '#', '%', '$', '@'];
const REALNAME_ILLEGAL_CHARS: &[char] = &[',', '"', '~', '#', '%', '$'];
const EMAIL_LOCAL_ILLEGAL_CHARS: &[char] = &['<', '>', '(', ')', '[', ']', '\\', ',', ';', ':', '"'];

/// A single failed field check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: AccountField,
    pub reason: String,
}

impl FieldError {
    fn new(field: AccountField, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl From<FieldError> for AccountError {
    fn from(e: FieldError) -> Self {
        AccountError::validation(e.field, e.reason)
    }
}

/// Field-level validation for account input
///
/// Pure and stateless. Every check runs independently so callers can see
/// all violations; coordinators reject on the first one.
#[derive(Debug, Default, Clone, Copy)]
pub struct ValidatorProvider;

impl ValidatorProvider {
    pub fn new() -> Self {
        Self
    }

    /// Validate all fields of a new account
    ///
    /// Order: username, password, email, realname, comment.
    pub fn validate_new_account(&self, account: &NewAccount) -> Vec<FieldError> {
        [
            self.check_username(&account.username),
            self.check_password(AccountField::Password, &account.password),
            self.check_email(&account.email),
            self.check_realname(&account.realname),
            self.check_comment(&account.comment),
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect()
    }

    /// Validate the mutable profile fields
    pub fn validate_profile(&self, profile: &ProfileUpdate) -> Vec<FieldError> {
        [
            self.check_email(&profile.email),
            self.check_realname(&profile.realname),
            self.check_comment(&profile.comment),
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect()
    }

    /// Validate a password change request
    ///
    /// The old password only needs to be present; its correctness is an
    /// authorization question decided later against the stored hash.
    pub fn validate_password_change(&self, old_password: &str, new_password: &str) -> Vec<FieldError> {
        let old = if old_password.is_empty() {
            Err(FieldError::new(AccountField::OldPassword, "is required"))
        } else {
            Ok(())
        };

        [old, self.check_password(AccountField::NewPassword, new_password)]
            .into_iter()
            .filter_map(Result::err)
            .collect()
    }

    /// Turn a list of field errors into the first failure, if any
    pub fn first_failure(errors: Vec<FieldError>) -> Result<(), AccountError> {
        match errors.into_iter().next() {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    pub fn check_username(&self, username: &str) -> Result<(), FieldError> {
        let field = AccountField::Username;
        if username.is_empty() {
            return Err(FieldError::new(field, "is required"));
        }
        if username.chars().count() > USERNAME_MAX_LENGTH {
            return Err(FieldError::new(
                field,
                format!("must be at most {} characters", USERNAME_MAX_LENGTH),
            ));
        }
        if username
            .chars()
            .any(|c| USERNAME_ILLEGAL_CHARS.contains(&c) || c.is_whitespace() || c.is_control())
        {
            return Err(FieldError::new(field, "contains illegal characters"));
        }
        Ok(())
    }

    pub fn check_email(&self, email: &str) -> Result<(), FieldError> {
        let field = AccountField::Email;
        if email.is_empty() {
            return Err(FieldError::new(field, "is required"));
        }
        if email.chars().count() > EMAIL_MAX_LENGTH {
            return Err(FieldError::new(
                field,
                format!("must be at most {} characters", EMAIL_MAX_LENGTH),
            ));
        }
        if !is_valid_email(email) {
            return Err(FieldError::new(field, "is not a valid email address"));
        }
        Ok(())
    }

    pub fn check_realname(&self, realname: &str) -> Result<(), FieldError> {
        let field = AccountField::Realname;
        if realname.is_empty() {
            return Err(FieldError::new(field, "is required"));
        }
        if realname.chars().count() > REALNAME_MAX_LENGTH {
            return Err(FieldError::new(
                field,
                format!("must be at most {} characters", REALNAME_MAX_LENGTH),
            ));
        }
        if realname
            .chars()
            .any(|c| REALNAME_ILLEGAL_CHARS.contains(&c) || c.is_control())
        {
            return Err(FieldError::new(field, "contains illegal characters"));
        }
        Ok(())
    }

    pub fn check_comment(&self, comment: &str) -> Result<(), FieldError> {
        if comment.chars().count() > COMMENT_MAX_LENGTH {
            return Err(FieldError::new(
                AccountField::Comment,
                format!("must be at most {} characters", COMMENT_MAX_LENGTH),
            ));
        }
        Ok(())
    }

    /// Presence and strength check shared by create and password change
    ///
    /// Policy: 8-20 characters with at least one uppercase letter, one
    /// lowercase letter and one digit.
    pub fn check_password(&self, field: AccountField, password: &str) -> Result<(), FieldError> {
        if password.is_empty() {
            return Err(FieldError::new(field, "is required"));
        }
        let length = password.chars().count();
        if !(PASSWORD_MIN_LENGTH..=PASSWORD_MAX_LENGTH).contains(&length) {
            return Err(FieldError::new(
                field,
                format!(
                    "must be between {} and {} characters",
                    PASSWORD_MIN_LENGTH, PASSWORD_MAX_LENGTH
                ),
            ));
        }
        let has_upper = password.chars().any(|c| c.is_uppercase());
        let has_lower = password.chars().any(|c| c.is_lowercase());
        let has_digit = password.chars().any(|c| c.is_ascii_digit());
        if !(has_upper && has_lower && has_digit) {
            return Err(FieldError::new(
                field,
                "must contain an uppercase letter, a lowercase letter and a digit",
            ));
        }
        Ok(())
    }
}

/// Syntactic email check: `local@domain.tld` with no empty dot segments
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }

    if local.split('.').any(str::is_empty) || local.contains(EMAIL_LOCAL_ILLEGAL_CHARS) {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    labels.iter().all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_alphanumeric() || c == '-')
    })
}
