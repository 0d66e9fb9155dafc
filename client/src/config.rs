//! Client configuration and backend selection.
//!
//! The backend is chosen once per process. The choice travels as a plain
//! [`ClientConfig`] value into [`open_store`](crate::open_store); nothing
//! global is consulted after startup.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Default directory for the on-device store.
pub const DEFAULT_DATA_DIR: &str = ".todo-data";

/// Which backend serves the todo store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreMode {
    /// On-device key-value storage (offline)
    #[default]
    Local,
    /// Remote todo server (online)
    Remote,
}

impl FromStr for StoreMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "offline" => Ok(StoreMode::Local),
            "remote" | "online" => Ok(StoreMode::Remote),
            other => Err(ConfigError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for StoreMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreMode::Local => f.write_str("local"),
            StoreMode::Remote => f.write_str("remote"),
        }
    }
}

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Active backend
    pub mode: StoreMode,
    /// Base URL of the todo server, e.g. `http://localhost:3000`
    pub remote_url: Option<String>,
    /// Directory holding the on-device store
    pub data_dir: PathBuf,
}

impl ClientConfig {
    /// Configuration for the on-device store in `data_dir`.
    pub fn local(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            mode: StoreMode::Local,
            remote_url: None,
            data_dir: data_dir.into(),
        }
    }

    /// Configuration for the remote store at `url`.
    pub fn remote(url: impl Into<String>) -> Self {
        Self {
            mode: StoreMode::Remote,
            remote_url: Some(url.into()),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// - `TODO_STORE_MODE`: `local` (default) or `remote`
    /// - `TODO_REMOTE_URL`: required when the mode is `remote`
    /// - `TODO_DATA_DIR`: defaults to [`DEFAULT_DATA_DIR`]
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mode = match lookup("TODO_STORE_MODE") {
            Some(value) => value.parse()?,
            None => StoreMode::default(),
        };

        let remote_url = lookup("TODO_REMOTE_URL").filter(|url| !url.trim().is_empty());

        let data_dir = lookup("TODO_DATA_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let config = Self {
            mode,
            remote_url,
            data_dir,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that everything the selected mode needs is present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mode == StoreMode::Remote && self.remote_url.is_none() {
            return Err(ConfigError::MissingRemoteUrl);
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("TODO_REMOTE_URL is required in remote mode")]
    MissingRemoteUrl,

    #[error("Invalid remote URL: {0}")]
    InvalidRemoteUrl(String),

    #[error("Invalid store mode '{0}' (expected 'local' or 'remote')")]
    InvalidMode(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_to_local() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::local(DEFAULT_DATA_DIR));
    }

    #[test]
    fn remote_mode_with_url() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("TODO_STORE_MODE", "remote"),
            ("TODO_REMOTE_URL", "http://localhost:3000"),
        ]))
        .unwrap();

        assert_eq!(config.mode, StoreMode::Remote);
        assert_eq!(config.remote_url.as_deref(), Some("http://localhost:3000"));
    }

    #[test]
    fn remote_mode_without_url_is_fatal() {
        let result = ClientConfig::from_lookup(lookup(&[("TODO_STORE_MODE", "remote")]));
        assert_eq!(result, Err(ConfigError::MissingRemoteUrl));

        let result = ClientConfig::from_lookup(lookup(&[
            ("TODO_STORE_MODE", "remote"),
            ("TODO_REMOTE_URL", "  "),
        ]));
        assert_eq!(result, Err(ConfigError::MissingRemoteUrl));
    }

    #[test]
    fn local_mode_ignores_missing_url() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("TODO_STORE_MODE", "offline"),
            ("TODO_DATA_DIR", "/tmp/todos"),
        ]))
        .unwrap();

        assert_eq!(config.mode, StoreMode::Local);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/todos"));
    }

    #[test]
    fn invalid_mode() {
        let result = ClientConfig::from_lookup(lookup(&[("TODO_STORE_MODE", "cloud")]));
        assert_eq!(result, Err(ConfigError::InvalidMode("cloud".into())));
    }

    #[test]
    fn mode_parsing_and_display() {
        assert_eq!(" Remote ".parse::<StoreMode>().unwrap(), StoreMode::Remote);
        assert_eq!("ONLINE".parse::<StoreMode>().unwrap(), StoreMode::Remote);
        assert_eq!("local".parse::<StoreMode>().unwrap(), StoreMode::Local);
        assert_eq!(StoreMode::Remote.to_string(), "remote");
        assert_eq!(StoreMode::Local.to_string(), "local");
    }
}
