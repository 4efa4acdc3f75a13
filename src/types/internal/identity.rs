use crate::types::db::account;

/// Authenticated caller resolved from request credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub account_id: i32,
    pub username: String,
    pub is_system_admin: bool,
}

impl Identity {
    pub fn is_account(&self, account_id: i32) -> bool {
        self.account_id == account_id
    }
}

impl From<&account::Model> for Identity {
    fn from(model: &account::Model) -> Self {
        Self {
            account_id: model.id,
            username: model.username.clone(),
            is_system_admin: model.is_system_admin,
        }
    }
}
