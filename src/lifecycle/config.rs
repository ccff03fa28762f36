//! # Client Configuration
//!
//! Settings are read from a TOML file, then overridden by environment
//! variables, then validated.
//!
//! ```toml
//! server_url = "https://suma.example.com"
//! request_timeout_secs = 30
//!
//! [notifications]
//! auto_close_ms = 6000
//! ```
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "lifecycle.toml";

pub const ENV_SERVER_URL: &str = "LIFECYCLE_SERVER_URL";
pub const ENV_TIMEOUT_SECS: &str = "LIFECYCLE_TIMEOUT_SECS";

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    Validation { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// How long auto-closing notifications stay visible.
    pub auto_close_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { auto_close_ms: 6000 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Scheme and host of the management server, without the API path.
    pub server_url: String,
    /// `None` leaves requests without a client-side deadline.
    pub request_timeout_secs: Option<u64>,
    pub notifications: NotificationConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost".into(),
            request_timeout_secs: Some(30),
            notifications: NotificationConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Loads the configuration from `path`, or from [`DEFAULT_CONFIG_FILE`].
    ///
    /// A missing default file yields the defaults; a missing explicit file is
    /// an error. Environment overrides are applied before validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_server(path, None)
    }

    /// Like [`load`](Self::load), with a `server_url` that takes precedence
    /// over both the file and the environment.
    pub fn load_with_server(
        path: Option<&Path>,
        server_url: Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)?
                } else {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            }
        };

        config.apply_env();
        if let Some(url) = server_url {
            config.server_url = url;
        }
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from `lookup`, keyed by environment variable name.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_SERVER_URL) {
            self.server_url = url;
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            match raw.parse::<u64>() {
                Ok(0) => self.request_timeout_secs = None,
                Ok(secs) => self.request_timeout_secs = Some(secs),
                Err(_) => warn!(value = %raw, "Ignoring invalid {}", ENV_TIMEOUT_SECS),
            }
        }
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - `server_url` uses the http or https scheme
    /// - the notification duration is non-zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.server_url.starts_with("http://") || self.server_url.starts_with("https://")) {
            return Err(ConfigError::Validation {
                message: format!(
                    "server_url '{}' must start with http:// or https://",
                    self.server_url
                ),
            });
        }

        if self.notifications.auto_close_ms == 0 {
            return Err(ConfigError::Validation {
                message: "notifications.auto_close_ms must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn auto_close(&self) -> Duration {
        Duration::from_millis(self.notifications.auto_close_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config("server_url = \"https://suma.example.com\"\n");
        let config = ClientConfig::from_file(file.path()).unwrap();

        assert_eq!(config.server_url, "https://suma.example.com");
        assert_eq!(config.request_timeout_secs, Some(30));
        assert_eq!(config.auto_close(), Duration::from_millis(6000));
    }

    #[test]
    fn test_nested_notifications_table() {
        let file = write_config(
            "server_url = \"https://h\"\nrequest_timeout_secs = 5\n\n[notifications]\nauto_close_ms = 1500\n",
        );
        let config = ClientConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.notifications.auto_close_ms, 1500);
    }

    #[test]
    fn test_missing_explicit_file_is_read_error() {
        let err = ClientConfig::load(Some(Path::new("/nonexistent/lifecycle.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let file = write_config("server_url = [");
        let err = ClientConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let mut config = ClientConfig::default();
        config.apply_overrides(|key| match key {
            ENV_SERVER_URL => Some("https://override".to_string()),
            ENV_TIMEOUT_SECS => Some("0".to_string()),
            _ => None,
        });

        assert_eq!(config.server_url, "https://override");
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_unparseable_timeout_override_is_ignored() {
        let mut config = ClientConfig::default();
        config.apply_overrides(|key| (key == ENV_TIMEOUT_SECS).then(|| "soon".to_string()));
        assert_eq!(config.request_timeout_secs, Some(30));
    }

    #[test]
    fn test_server_override_replaces_invalid_file_url() {
        let file = write_config("server_url = \"ftp://suma\"\n");
        let config =
            ClientConfig::load_with_server(Some(file.path()), Some("https://suma".into())).unwrap();
        assert_eq!(config.server_url, "https://suma");

        let err = ClientConfig::load_with_server(Some(file.path()), None).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn test_validation_rejects_non_http_url() {
        let config = ClientConfig {
            server_url: "ftp://suma".into(),
            ..ClientConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("must start with http:// or https://"));
    }
}
