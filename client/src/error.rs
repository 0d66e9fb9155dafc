//! Error types for the todo client.

use crate::config::ConfigError;

/// All errors a store operation can return.
///
/// The local store never surfaces storage failures to its callers (they are
/// logged instead), so in practice only the remote store returns errors from
/// the [`TodoStore`](crate::TodoStore) operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("engine error: {0}")]
    Engine(#[from] todo_engine::Error),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("remote error ({status}): {message}")]
    Remote { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("live query error: {0}")]
    LiveQuery(String),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    /// Whether the remote side reported that the record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Remote { status: 404, .. })
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err.to_string())
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for Error {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Error::Transport(err.to_string())
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::Remote {
            status: 404,
            message: "todo not found: a".into(),
        };
        assert_eq!(err.to_string(), "remote error (404): todo not found: a");

        let err: Error = ConfigError::MissingRemoteUrl.into();
        assert_eq!(
            err.to_string(),
            "configuration error: TODO_REMOTE_URL is required in remote mode"
        );
    }

    #[test]
    fn not_found_detection() {
        let miss = Error::Remote {
            status: 404,
            message: "todo not found: a".into(),
        };
        assert!(miss.is_not_found());

        let other = Error::Remote {
            status: 500,
            message: "Database error".into(),
        };
        assert!(!other.is_not_found());
        assert!(!Error::Transport("connection refused".into()).is_not_found());
    }
}
