use crate::config::AuthMode;
use crate::errors::internal::AccountError;
use crate::types::internal::Identity;

/// Operations subject to authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountOperation {
    Create,
    List,
    Get,
    UpdateProfile,
    ChangePassword,
    TogglePrivilege,
    Delete,
}

impl AccountOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountOperation::Create => "create",
            AccountOperation::List => "list",
            AccountOperation::Get => "get",
            AccountOperation::UpdateProfile => "update_profile",
            AccountOperation::ChangePassword => "change_password",
            AccountOperation::TogglePrivilege => "toggle_privilege",
            AccountOperation::Delete => "delete",
        }
    }
}

/// Deployment-wide authorization settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorizationPolicy {
    /// Whether callers that are not system admins may create accounts
    pub self_registration: bool,
    /// Where credentials live; only local database auth can create accounts
    pub auth_mode: AuthMode,
}

impl Default for AuthorizationPolicy {
    fn default() -> Self {
        Self {
            self_registration: false,
            auth_mode: AuthMode::Database,
        }
    }
}

/// Decides whether a caller may perform an operation on a target account
///
/// | Operation        | Allowed callers                               |
/// |------------------|-----------------------------------------------|
/// | Create           | admin, or anyone when self-registration is on |
/// | List             | admin                                         |
/// | Get              | admin or the target itself                    |
/// | UpdateProfile    | admin or the target itself                    |
/// | ChangePassword   | admin or the target itself                    |
/// | TogglePrivilege  | admin                                         |
/// | Delete           | admin, never the caller's own account         |
///
/// Create is refused for everyone when accounts are managed externally.
/// Decisions never look at the store, so unauthorized callers learn
/// nothing about which ids exist.
#[derive(Debug, Clone)]
pub struct AuthorizationProvider {
    policy: AuthorizationPolicy,
}

impl AuthorizationProvider {
    pub fn new(policy: AuthorizationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> AuthorizationPolicy {
        self.policy
    }

    /// Authorize `operation` for `caller` against the optional `target` account id
    pub fn authorize(
        &self,
        caller: Option<&Identity>,
        operation: AccountOperation,
        target: Option<i32>,
    ) -> Result<(), AccountError> {
        let is_admin = caller.is_some_and(|c| c.is_system_admin);
        let is_self = match (caller, target) {
            (Some(c), Some(id)) => c.is_account(id),
            _ => false,
        };

        let decision = match operation {
            AccountOperation::Create => {
                if self.policy.auth_mode != AuthMode::Database {
                    Err("accounts are managed by an external authentication provider")
                } else if is_admin || self.policy.self_registration {
                    Ok(())
                } else {
                    Err("system admin role required to create accounts")
                }
            }
            AccountOperation::List | AccountOperation::TogglePrivilege => {
                if is_admin {
                    Ok(())
                } else {
                    Err("system admin role required")
                }
            }
            AccountOperation::Get | AccountOperation::UpdateProfile | AccountOperation::ChangePassword => {
                if is_admin || is_self {
                    Ok(())
                } else {
                    Err("only the account owner or a system admin may access this account")
                }
            }
            AccountOperation::Delete => {
                if !is_admin {
                    Err("system admin role required")
                } else if is_self {
                    Err("cannot delete your own account")
                } else {
                    Ok(())
                }
            }
        };

        decision.map_err(|reason| {
            tracing::warn!(
                operation = operation.as_str(),
                caller = caller.map(|c| c.account_id),
                target = target,
                "Authorization denied: {}",
                reason
            );
            AccountError::forbidden(reason)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> Identity {
        Identity {
            account_id: 1,
            username: "admin".to_string(),
            is_system_admin: true,
        }
    }

    fn user(id: i32) -> Identity {
        Identity {
            account_id: id,
            username: format!("user{}", id),
            is_system_admin: false,
        }
    }

    fn guard() -> AuthorizationProvider {
        AuthorizationProvider::new(AuthorizationPolicy::default())
    }

    fn is_forbidden(result: Result<(), AccountError>) -> bool {
        matches!(result, Err(AccountError::Forbidden { .. }))
    }

    #[test]
    fn test_create_requires_admin_without_self_registration() {
        let guard = guard();

        assert!(guard.authorize(Some(&admin()), AccountOperation::Create, None).is_ok());
        assert!(is_forbidden(guard.authorize(Some(&user(2)), AccountOperation::Create, None)));
        assert!(is_forbidden(guard.authorize(None, AccountOperation::Create, None)));
    }

    #[test]
    fn test_create_open_with_self_registration() {
        let guard = AuthorizationProvider::new(AuthorizationPolicy {
            self_registration: true,
            auth_mode: AuthMode::Database,
        });

        assert!(guard.authorize(None, AccountOperation::Create, None).is_ok());
        assert!(guard.authorize(Some(&user(2)), AccountOperation::Create, None).is_ok());
    }

    #[test]
    fn test_create_disabled_for_everyone_in_external_mode() {
        let guard = AuthorizationProvider::new(AuthorizationPolicy {
            self_registration: true,
            auth_mode: AuthMode::External,
        });

        assert!(is_forbidden(guard.authorize(Some(&admin()), AccountOperation::Create, None)));
        assert!(is_forbidden(guard.authorize(None, AccountOperation::Create, None)));
    }

    #[test]
    fn test_admin_only_operations() {
        let guard = guard();

        for op in [AccountOperation::List, AccountOperation::TogglePrivilege] {
            assert!(guard.authorize(Some(&admin()), op, Some(2)).is_ok());
            assert!(is_forbidden(guard.authorize(Some(&user(2)), op, Some(2))));
            assert!(is_forbidden(guard.authorize(None, op, Some(2))));
        }
    }

    #[test]
    fn test_admin_may_toggle_own_privilege() {
        assert!(guard().authorize(Some(&admin()), AccountOperation::TogglePrivilege, Some(1)).is_ok());
    }

    #[test]
    fn test_self_or_admin_operations() {
        let guard = guard();

        for op in [
            AccountOperation::Get,
            AccountOperation::UpdateProfile,
            AccountOperation::ChangePassword,
        ] {
            assert!(guard.authorize(Some(&admin()), op, Some(2)).is_ok());
            assert!(guard.authorize(Some(&user(2)), op, Some(2)).is_ok());
            assert!(is_forbidden(guard.authorize(Some(&user(3)), op, Some(2))));
            assert!(is_forbidden(guard.authorize(None, op, Some(2))));
        }
    }

    #[test]
    fn test_non_admin_probing_unknown_id_is_forbidden() {
        assert!(is_forbidden(guard().authorize(Some(&user(2)), AccountOperation::Get, Some(1000))));
    }

    #[test]
    fn test_delete_rules() {
        let guard = guard();

        assert!(guard.authorize(Some(&admin()), AccountOperation::Delete, Some(2)).is_ok());
        assert!(is_forbidden(guard.authorize(Some(&admin()), AccountOperation::Delete, Some(1))));
        assert!(is_forbidden(guard.authorize(Some(&user(2)), AccountOperation::Delete, Some(3))));
        assert!(is_forbidden(guard.authorize(Some(&user(2)), AccountOperation::Delete, Some(2))));
    }
}
