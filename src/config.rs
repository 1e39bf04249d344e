//! Configuration types.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default business search endpoint.
pub const DEFAULT_SEARCH_URL: &str = "https://api.yelp.com/v3/businesses/search";

/// Plugin configuration, built once at startup and handed to constructors.
#[derive(Debug, Clone)]
pub struct Config {
    /// Plugin name for identification in logs.
    pub name: String,
    pub search: SearchConfig,
    pub dialog: DialogConfig,
    /// Location the in-memory resolver hands out to unknown users.
    pub default_location: Option<String>,
}

/// Business search provider settings.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Search endpoint URL.
    pub endpoint: String,
    /// Bearer API key.
    pub api_key: SecretString,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Dialog behaviour settings.
#[derive(Debug, Clone)]
pub struct DialogConfig {
    /// Scan the user's reply for follow-up keywords instead of the prior
    /// assistant response.
    pub scan_user_reply: bool,
    /// Conversations idle for longer than this are discarded.
    pub session_idle_timeout: Duration,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            scan_user_reply: false,
            session_idle_timeout: Duration::from_secs(1800), // 30 minutes
        }
    }
}

impl SearchConfig {
    /// Build search settings with default endpoint and timeout.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_SEARCH_URL.to_string(),
            api_key: SecretString::from(api_key.into()),
            timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `YELP_API_KEY` is required; everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("YELP_API_KEY")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("YELP_API_KEY".into()))?;

        let mut search = SearchConfig::new(api_key);
        if let Some(endpoint) = lookup("YELP_SEARCH_URL") {
            search.endpoint = endpoint;
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "YELP_TIMEOUT_SECS")? {
            search.timeout = Duration::from_secs(secs);
        }

        let mut dialog = DialogConfig::default();
        if let Some(scan) = parse_var::<bool>(&lookup, "RESTAURANT_SCAN_USER_REPLY")? {
            dialog.scan_user_reply = scan;
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "RESTAURANT_SESSION_IDLE_SECS")? {
            dialog.session_idle_timeout = Duration::from_secs(secs);
        }

        let default_location = lookup("RESTAURANT_DEFAULT_LOCATION")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(Self {
            name: "restaurant".to_string(),
            search,
            dialog,
            default_location,
        })
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            }),
    }
}
