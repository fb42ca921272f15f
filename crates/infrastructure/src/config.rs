//! Client configuration from environment variables.
//!
//! | Variable            | Default                     |
//! |---------------------|-----------------------------|
//! | `QUAY_API_URL`      | `http://localhost:5000/api` |
//! | `QUAY_TIMEOUT_SECS` | `30`                        |
//! | `QUAY_SESSION_FILE` | `<config dir>/quay/session.json` |

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::persistence::FileCredentialStore;

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors raised while reading configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `QUAY_API_URL` is not an absolute http(s) URL.
    #[error("invalid API URL {value:?}: {reason}")]
    InvalidUrl {
        /// Rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// `QUAY_TIMEOUT_SECS` is not a positive integer.
    #[error("invalid timeout {0:?}: expected a positive number of seconds")]
    InvalidTimeout(String),

    /// No session file override and no platform config directory.
    #[error("could not determine where to store the session; set QUAY_SESSION_FILE")]
    NoSessionPath,
}

/// Settings for the HTTP transport and credential store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base URL; request paths are appended to it.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// User-Agent header.
    pub user_agent: String,
    /// Where the session is persisted.
    pub session_path: PathBuf,
}

impl ClientConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error when a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which returns the value of
    /// a variable when set.
    ///
    /// # Errors
    ///
    /// Returns an error when a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let set = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = parse_url(set("QUAY_API_URL").as_deref().unwrap_or(DEFAULT_API_URL))?;

        let timeout = match set("QUAY_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let session_path = set("QUAY_SESSION_FILE")
            .map(PathBuf::from)
            .or_else(FileCredentialStore::default_path)
            .ok_or(ConfigError::NoSessionPath)?;

        let config = Self {
            base_url,
            timeout,
            user_agent: format!("quay/{}", env!("CARGO_PKG_VERSION")),
            session_path,
        };
        debug!(base_url = %config.base_url, timeout_secs = config.timeout.as_secs(), "configuration loaded");
        Ok(config)
    }

    /// Replaces the base URL, e.g. from a command-line flag.
    ///
    /// # Errors
    ///
    /// Returns an error for a URL that is not absolute http(s).
    pub fn with_base_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_url(url)?;
        Ok(self)
    }
}

fn parse_url(value: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        value: value.to_string(),
        reason,
    };
    let url = Url::parse(value.trim()).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme {other}"))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ClientConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply() {
        let config = config(&[("QUAY_SESSION_FILE", "/tmp/s.json")]).unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:5000/api");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.session_path, PathBuf::from("/tmp/s.json"));
        assert!(config.user_agent.starts_with("quay/"));
    }

    #[test]
    fn overrides_apply() {
        let config = config(&[
            ("QUAY_API_URL", "https://terminal.example.com/api"),
            ("QUAY_TIMEOUT_SECS", "5"),
            ("QUAY_SESSION_FILE", "/tmp/s.json"),
        ])
        .unwrap();
        assert_eq!(config.base_url.host_str(), Some("terminal.example.com"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(matches!(
            config(&[("QUAY_API_URL", "ftp://x"), ("QUAY_SESSION_FILE", "/s")]),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            config(&[("QUAY_API_URL", "not a url"), ("QUAY_SESSION_FILE", "/s")]),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert_eq!(
            config(&[("QUAY_TIMEOUT_SECS", "0"), ("QUAY_SESSION_FILE", "/s")]),
            Err(ConfigError::InvalidTimeout("0".to_string()))
        );
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config(&[("QUAY_API_URL", "  "), ("QUAY_SESSION_FILE", "/s")]).unwrap();
        assert_eq!(config.base_url.as_str(), DEFAULT_API_URL);
    }
}
