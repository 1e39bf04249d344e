//! Error types for the restaurant assistant.

use std::time::Duration;

/// Top-level error type for a dialog turn.
///
/// Only location failures end a turn; search failures are absorbed by the
/// dialog and configuration errors surface from `Config::from_env`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Location error: {0}")]
    Location(#[from] LocationError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Location resolution errors. These abort the turn.
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("Location lookup failed for user {user}: {reason}")]
    LookupFailed { user: String, reason: String },

    #[error("Location service unavailable: {0}")]
    Unavailable(String),
}

/// Business search provider errors. The dialog controller absorbs these.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Provider {provider} returned status {status}")]
    Status { provider: String, status: u16 },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Provider {provider} timed out after {timeout:?}")]
    Timeout { provider: String, timeout: Duration },
}

/// Result type alias for the assistant.
pub type Result<T> = std::result::Result<T, Error>;
