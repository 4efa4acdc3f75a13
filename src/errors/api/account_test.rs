#[cfg(test)]
mod tests {
    use crate::errors::AccountApiError;
    use crate::errors::internal::{AccountError, InternalError};
    use crate::types::internal::account::AccountField;
    use sea_orm::DbErr;

    #[test]
    fn test_validation_error_converts_to_bad_request() {
        let internal_err = InternalError::from(AccountError::validation(
            AccountField::Username,
            "must not be empty",
        ));
        let api_err = AccountApiError::from_internal_error(internal_err);

        assert_eq!(api_err.status_code(), 400);
        assert_eq!(api_err.message(), "Invalid username: must not be empty");
    }

    #[test]
    fn test_forbidden_converts_with_reason() {
        let internal_err = InternalError::from(AccountError::forbidden("cannot delete yourself"));
        let api_err = AccountApiError::from_internal_error(internal_err);

        assert!(matches!(api_err, AccountApiError::Forbidden(_)));
        assert_eq!(api_err.message(), "cannot delete yourself");
    }

    #[test]
    fn test_not_found_converts_correctly() {
        let internal_err = InternalError::from(AccountError::NotFound { id: 1000 });
        let api_err = AccountApiError::from_internal_error(internal_err);

        assert_eq!(api_err.status_code(), 404);
        assert_eq!(api_err.message(), "Account not found: 1000");
    }

    #[test]
    fn test_conflict_names_field() {
        let internal_err = InternalError::from(AccountError::Conflict {
            field: AccountField::Email,
        });
        let api_err = AccountApiError::from_internal_error(internal_err);

        assert_eq!(api_err.status_code(), 409);
        assert_eq!(api_err.message(), "email already exists");
    }

    #[test]
    fn test_invalid_credentials_converts_to_unauthorized() {
        let api_err =
            AccountApiError::from_internal_error(InternalError::from(AccountError::InvalidCredentials));

        assert_eq!(api_err.status_code(), 401);
    }

    #[test]
    fn test_database_error_converts_to_internal_server_error() {
        let db_err = DbErr::RecordNotFound("test".to_string());
        let internal_err = InternalError::database("find_account", db_err);
        let api_err = AccountApiError::from_internal_error(internal_err);

        assert_eq!(api_err.status_code(), 500);
        assert_eq!(api_err.message(), "An internal error occurred");
    }

    #[test]
    fn test_crypto_error_is_never_masked_as_domain_error() {
        let internal_err = InternalError::crypto("password_hash", "invalid secret");
        let api_err = AccountApiError::from_internal_error(internal_err);

        assert!(matches!(api_err, AccountApiError::InternalError(_)));
    }
}
