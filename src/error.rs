//! Error types for threadchat
//!
//! This module defines the error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for threadchat operations
///
/// Covers configuration loading, provider construction and calls, input
/// validation, and the browser surface. Per-turn provider failures never
/// escape the engine; they are converted into error-marked replies.
#[derive(Error, Debug)]
pub enum ThreadchatError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider-related errors (API calls, unexpected responses, etc.)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Missing credentials for provider
    #[error("Missing credentials for provider: {0}")]
    MissingCredentials(String),

    /// User input rejected before reaching the provider
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Chat view lookup failed
    #[error("Chat view not found: {0}")]
    ViewNotFound(String),

    /// Page rendering errors
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for threadchat operations
///
/// Uses `anyhow::Error` so callers can attach context while still being
/// able to downcast to [`ThreadchatError`].
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = ThreadchatError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_provider_error_display() {
        let error = ThreadchatError::Provider("API timeout".to_string());
        assert_eq!(error.to_string(), "Provider error: API timeout");
    }

    #[test]
    fn test_missing_credentials_error_display() {
        let error = ThreadchatError::MissingCredentials("gemini".to_string());
        assert_eq!(error.to_string(), "Missing credentials for provider: gemini");
    }

    #[test]
    fn test_invalid_input_error_display() {
        let error = ThreadchatError::InvalidInput("message is empty".to_string());
        assert_eq!(error.to_string(), "Invalid input: message is empty");
    }

    #[test]
    fn test_view_not_found_error_display() {
        let error = ThreadchatError::ViewNotFound("abc".to_string());
        assert_eq!(error.to_string(), "Chat view not found: abc");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: ThreadchatError = io_error.into();
        assert!(matches!(error, ThreadchatError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let error: ThreadchatError = json_error.into();
        assert!(matches!(error, ThreadchatError::Serialization(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: : yaml").unwrap_err();
        let error: ThreadchatError = yaml_error.into();
        assert!(matches!(error, ThreadchatError::Yaml(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ThreadchatError>();
    }

    #[test]
    fn test_downcast_from_anyhow() {
        let err: anyhow::Error = ThreadchatError::MissingCredentials("gemini".to_string()).into();
        assert!(matches!(
            err.downcast_ref::<ThreadchatError>(),
            Some(ThreadchatError::MissingCredentials(_))
        ));
    }
}
