use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::config::errors::ConfigError;
use crate::config::{EnvironmentProvider, SystemEnvironment};
use crate::providers::AuthorizationPolicy;

/// Minimum length of the password pepper
pub const PASSWORD_PEPPER_MIN_LENGTH: usize = 16;

/// Where account credentials are managed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// Accounts and passwords live in the local database
    #[default]
    Database,
    /// Accounts come from an external identity provider; local creation is disabled
    External,
}

impl FromStr for AuthMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "db_auth" => Ok(AuthMode::Database),
            "external" => Ok(AuthMode::External),
            other => Err(format!("expected 'db_auth' or 'external', got '{}'", other)),
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMode::Database => write!(f, "db_auth"),
            AuthMode::External => write!(f, "external"),
        }
    }
}

/// Application settings loaded from the environment
pub struct Settings {
    database_url: String,
    server_host: String,
    server_port: u16,
    self_registration: bool,
    auth_mode: AuthMode,
    password_pepper: String,
    admin_username: String,
    admin_password: String,
    admin_email: String,
}

impl Settings {
    /// Load settings through the given environment provider
    ///
    /// # Errors
    /// Returns a `ConfigError` naming the first setting that is missing or invalid.
    pub fn from_env_provider(env_provider: Arc<dyn EnvironmentProvider + Send + Sync>) -> Result<Self, ConfigError> {
        let env = env_provider.as_ref();

        let database_url = optional(env, "DATABASE_URL", "sqlite://accounts.db?mode=rwc");
        if database_url.is_empty() {
            return Err(ConfigError::invalid("DATABASE_URL", "must not be empty"));
        }

        let server_host = optional(env, "HOST", "0.0.0.0");
        validate_host_address(&server_host).map_err(|reason| ConfigError::invalid("HOST", reason))?;

        let server_port = parse_port(&optional(env, "PORT", "3000"), "PORT")?;

        let self_registration = parse_bool(&optional(env, "SELF_REGISTRATION", "false"), "SELF_REGISTRATION")?;

        let auth_mode = optional(env, "AUTH_MODE", "db_auth")
            .parse::<AuthMode>()
            .map_err(|e| ConfigError::parse("AUTH_MODE", e))?;

        let password_pepper = required(env, "PASSWORD_PEPPER")?;
        if password_pepper.len() < PASSWORD_PEPPER_MIN_LENGTH {
            return Err(ConfigError::invalid(
                "PASSWORD_PEPPER",
                format!("must be at least {} characters long", PASSWORD_PEPPER_MIN_LENGTH),
            ));
        }

        let admin_username = optional(env, "ADMIN_USERNAME", "admin");
        let admin_password = required(env, "ADMIN_PASSWORD")?;
        let admin_email = optional(env, "ADMIN_EMAIL", "admin@example.com");

        Ok(Self {
            database_url,
            server_host,
            server_port,
            self_registration,
            auth_mode,
            password_pepper,
            admin_username,
            admin_password,
            admin_email,
        })
    }

    /// Convenience method that uses the system environment provider
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_provider(Arc::new(SystemEnvironment))
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn server_host(&self) -> &str {
        &self.server_host
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn self_registration(&self) -> bool {
        self.self_registration
    }

    pub fn auth_mode(&self) -> AuthMode {
        self.auth_mode
    }

    pub fn password_pepper(&self) -> &str {
        &self.password_pepper
    }

    pub fn admin_username(&self) -> &str {
        &self.admin_username
    }

    pub fn admin_password(&self) -> &str {
        &self.admin_password
    }

    pub fn admin_email(&self) -> &str {
        &self.admin_email
    }

    /// Authorization settings derived from this configuration
    pub fn authorization_policy(&self) -> AuthorizationPolicy {
        AuthorizationPolicy {
            self_registration: self.self_registration,
            auth_mode: self.auth_mode,
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("database_url", &self.database_url)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("self_registration", &self.self_registration)
            .field("auth_mode", &self.auth_mode)
            .field("password_pepper", &"<redacted>")
            .field("admin_username", &self.admin_username)
            .field("admin_password", &"<redacted>")
            .field("admin_email", &self.admin_email)
            .finish()
    }
}

fn optional(env: &(dyn EnvironmentProvider + Send + Sync), key: &str, default: &str) -> String {
    env.get_var(key).unwrap_or_else(|| default.to_string())
}

fn required(env: &(dyn EnvironmentProvider + Send + Sync), key: &str) -> Result<String, ConfigError> {
    match env.get_var(key) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::missing(key)),
    }
}

fn parse_bool(value: &str, setting_name: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::parse(
            setting_name,
            format!("expected 'true' or 'false', got '{}'", other),
        )),
    }
}

fn parse_port(value: &str, setting_name: &str) -> Result<u16, ConfigError> {
    let port = value.trim().parse::<u16>().map_err(|e| {
        ConfigError::parse(
            setting_name,
            format!("Expected port number (1-65535), got '{}': {}", value, e),
        )
    })?;

    if port == 0 {
        return Err(ConfigError::invalid(setting_name, "Port number must be between 1 and 65535"));
    }

    Ok(port)
}

/// Basic host check: non-empty, no whitespace, bracketed IPv6 must not be empty
fn validate_host_address(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err("Host address cannot be empty".to_string());
    }
    if value.chars().any(char::is_whitespace) {
        return Err("Host address cannot contain whitespace".to_string());
    }
    if value.starts_with('[') {
        let inner = value.trim_start_matches('[').trim_end_matches(']');
        if inner.is_empty() || !inner.contains(':') {
            return Err("Invalid IPv6 address format".to_string());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    fn base_env() -> MockEnvironment {
        MockEnvironment::empty()
            .with_var("PASSWORD_PEPPER", "test-pepper-for-unit-tests")
            .with_var("ADMIN_PASSWORD", "Harbor12345")
    }

    fn load(env: MockEnvironment) -> Result<Settings, ConfigError> {
        Settings::from_env_provider(Arc::new(env))
    }

    #[test]
    fn test_settings_with_defaults() {
        let settings = load(base_env()).unwrap();

        assert_eq!(settings.database_url(), "sqlite://accounts.db?mode=rwc");
        assert_eq!(settings.server_address(), "0.0.0.0:3000");
        assert!(!settings.self_registration());
        assert_eq!(settings.auth_mode(), AuthMode::Database);
        assert_eq!(settings.admin_username(), "admin");
        assert_eq!(settings.admin_email(), "admin@example.com");
        assert_eq!(settings.authorization_policy(), AuthorizationPolicy::default());
    }

    #[test]
    fn test_settings_with_all_vars() {
        let settings = load(base_env().with_vars(&[
            ("DATABASE_URL", "sqlite://test.db"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("SELF_REGISTRATION", "true"),
            ("AUTH_MODE", "external"),
            ("ADMIN_USERNAME", "root"),
            ("ADMIN_EMAIL", "root@example.org"),
        ]))
        .unwrap();

        assert_eq!(settings.database_url(), "sqlite://test.db");
        assert_eq!(settings.server_address(), "127.0.0.1:8080");
        assert!(settings.self_registration());
        assert_eq!(settings.auth_mode(), AuthMode::External);
        assert_eq!(settings.admin_username(), "root");
        assert_eq!(settings.admin_email(), "root@example.org");
    }

    #[test]
    fn test_missing_pepper_fails() {
        let result = load(MockEnvironment::empty().with_var("ADMIN_PASSWORD", "Harbor12345"));

        assert_eq!(result.unwrap_err(), ConfigError::missing("PASSWORD_PEPPER"));
    }

    #[test]
    fn test_short_pepper_fails() {
        let result = load(base_env().with_var("PASSWORD_PEPPER", "short"));

        match result {
            Err(ConfigError::InvalidSetting { setting_name, .. }) => assert_eq!(setting_name, "PASSWORD_PEPPER"),
            other => panic!("Expected InvalidSetting for PASSWORD_PEPPER, got: {:?}", other),
        }
    }

    #[test]
    fn test_missing_admin_password_fails() {
        let result = load(MockEnvironment::empty().with_var("PASSWORD_PEPPER", "test-pepper-for-unit-tests"));

        assert_eq!(result.unwrap_err(), ConfigError::missing("ADMIN_PASSWORD"));
    }

    #[test]
    fn test_invalid_port_fails() {
        for port in ["0", "70000", "abc"] {
            let result = load(base_env().with_var("PORT", port));
            assert!(result.is_err(), "expected PORT={} to be rejected", port);
        }
    }

    #[test]
    fn test_invalid_auth_mode_fails() {
        match load(base_env().with_var("AUTH_MODE", "ldap")) {
            Err(ConfigError::ParseError { setting_name, .. }) => assert_eq!(setting_name, "AUTH_MODE"),
            other => panic!("Expected ParseError for AUTH_MODE, got: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_self_registration_fails() {
        match load(base_env().with_var("SELF_REGISTRATION", "maybe")) {
            Err(ConfigError::ParseError { setting_name, .. }) => assert_eq!(setting_name, "SELF_REGISTRATION"),
            other => panic!("Expected ParseError for SELF_REGISTRATION, got: {:?}", other),
        }
    }

    #[test]
    fn test_empty_host_fails() {
        assert!(load(base_env().with_var("HOST", "")).is_err());
        assert!(load(base_env().with_var("HOST", "[]")).is_err());
        assert!(load(base_env().with_var("HOST", "::1")).is_ok());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let debug = format!("{:?}", load(base_env()).unwrap());

        assert!(!debug.contains("test-pepper-for-unit-tests"));
        assert!(!debug.contains("Harbor12345"));
    }
}
