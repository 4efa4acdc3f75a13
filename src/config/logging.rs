use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::{EnvironmentProvider, SystemEnvironment};

/// Logging configuration read from `LOG_LEVEL` and `APP_LOG_FILE`
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    pub log_level: String,
    pub app_log_file: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn from_env_provider(env_provider: Arc<dyn EnvironmentProvider + Send + Sync>) -> Self {
        Self {
            log_level: env_provider.get_var("LOG_LEVEL").unwrap_or_else(|| "INFO".to_string()),
            app_log_file: env_provider
                .get_var("APP_LOG_FILE")
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize logging: {0}")]
    InitializationError(String),

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("File system error: {0}")]
    FileSystemError(#[from] std::io::Error),
}

/// Install the global tracing subscriber
///
/// Console output always; a daily-rotated file layer as well when
/// `APP_LOG_FILE` is set.
pub fn init_logging() -> Result<(), LoggingError> {
    init_logging_with(LoggingConfig::from_env_provider(Arc::new(SystemEnvironment)))
}

fn env_filter(log_level: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(log_level).map_err(|e| LoggingError::InvalidLogLevel(format!("{}: {}", log_level, e)))
}

pub fn init_logging_with(config: LoggingConfig) -> Result<(), LoggingError> {
    let console_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(env_filter(&config.log_level)?);

    let subscriber = tracing_subscriber::registry().with(console_layer);

    let Some(log_file_path) = &config.app_log_file else {
        return subscriber
            .try_init()
            .map_err(|e| LoggingError::InitializationError(e.to_string()));
    };

    let directory = log_file_path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(directory)?;
    let file_name = log_file_path
        .file_name()
        .ok_or_else(|| LoggingError::InitializationError("Invalid log file path".to_string()))?;

    let file_layer = fmt::layer()
        .with_writer(tracing_appender::rolling::daily(directory, file_name))
        .with_target(true)
        .with_ansi(false)
        .with_filter(env_filter(&config.log_level)?);

    subscriber
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggingError::InitializationError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    #[test]
    fn test_logging_config_defaults() {
        let config = LoggingConfig::from_env_provider(Arc::new(MockEnvironment::empty()));

        assert_eq!(config.log_level, "INFO");
        assert_eq!(config.app_log_file, None);
    }

    #[test]
    fn test_logging_config_from_env() {
        let config = LoggingConfig::from_env_provider(Arc::new(
            MockEnvironment::empty()
                .with_var("LOG_LEVEL", "registry_accounts=debug")
                .with_var("APP_LOG_FILE", "logs/accounts.log"),
        ));

        assert_eq!(config.log_level, "registry_accounts=debug");
        assert_eq!(config.app_log_file, Some(PathBuf::from("logs/accounts.log")));
    }

    #[test]
    fn test_invalid_log_level_is_rejected() {
        let result = init_logging_with(LoggingConfig {
            log_level: "registry_accounts=verbose".to_string(),
            app_log_file: None,
        });

        assert!(matches!(result, Err(LoggingError::InvalidLogLevel(_))));
    }
}
