//! Configuration for the task service client.

use std::env;
use std::time::Duration;

use crate::error::ConfigError;

/// Environment variable for the API base URL.
pub const ENV_API_URL: &str = "TASKLIST_API_URL";

/// Environment variable for the request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "TASKLIST_TIMEOUT_SECS";

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// HTTP client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without trailing slash (e.g. `http://localhost:8080`).
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    ///
    /// # Errors
    /// Returns error if `TASKLIST_TIMEOUT_SECS` is not a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL).filter(|s| !s.trim().is_empty()) {
            config = config.with_base_url(url);
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS).filter(|s| !s.trim().is_empty()) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidEnv {
                    var: ENV_TIMEOUT_SECS,
                    value: raw.clone(),
                })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Override the base URL. A trailing slash is dropped.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim().trim_end_matches('/').to_string();
        self
    }

    /// Override the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_env_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_API_URL, "https://tasks.example.com/"),
            (ENV_TIMEOUT_SECS, "30"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "https://tasks.example.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_timeout() {
        let err = ClientConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "soon")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnv {
                var: ENV_TIMEOUT_SECS,
                ..
            }
        ));

        assert!(ClientConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "0")])).is_err());
    }
}
