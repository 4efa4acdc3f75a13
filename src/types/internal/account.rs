/// Input for account creation, before validation
#[derive(Debug, Clone, Default)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
    pub realname: String,
    pub comment: String,
}

/// Validated account ready to be persisted; the password is already hashed
#[derive(Clone)]
pub struct AccountInsert {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub realname: String,
    pub comment: String,
    pub is_system_admin: bool,
}

impl std::fmt::Debug for AccountInsert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountInsert")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("is_system_admin", &self.is_system_admin)
            .finish()
    }
}

/// Mutable profile fields
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub email: String,
    pub realname: String,
    pub comment: String,
}

/// A single read-modify-write applied to a stored account
#[derive(Clone)]
pub enum AccountMutation {
    Profile(ProfileUpdate),
    SystemAdmin(bool),
    PasswordHash(String),
}

impl AccountMutation {
    /// Short name used in logs and error context
    pub fn name(&self) -> &'static str {
        match self {
            AccountMutation::Profile(_) => "update_profile",
            AccountMutation::SystemAdmin(_) => "set_system_admin",
            AccountMutation::PasswordHash(_) => "set_password_hash",
        }
    }
}

impl std::fmt::Debug for AccountMutation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountMutation::Profile(p) => f.debug_tuple("Profile").field(p).finish(),
            AccountMutation::SystemAdmin(flag) => f.debug_tuple("SystemAdmin").field(flag).finish(),
            AccountMutation::PasswordHash(_) => f.debug_tuple("PasswordHash").field(&"<redacted>").finish(),
        }
    }
}

/// Account fields that can fail validation or uniqueness checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountField {
    Username,
    Email,
    Password,
    OldPassword,
    NewPassword,
    Realname,
    Comment,
}

impl AccountField {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountField::Username => "username",
            AccountField::Email => "email",
            AccountField::Password => "password",
            AccountField::OldPassword => "old_password",
            AccountField::NewPassword => "new_password",
            AccountField::Realname => "realname",
            AccountField::Comment => "comment",
        }
    }
}

impl std::fmt::Display for AccountField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
