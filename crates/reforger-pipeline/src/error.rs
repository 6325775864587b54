//! Configuration error types

use std::io;
use thiserror::Error;

use reforger_types::EventKind;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("source '{kind}' is configured more than once")]
    DuplicateSource { kind: EventKind },

    #[error("source '{kind}' has invalid {field}: {message}")]
    InvalidValue {
        kind: EventKind,
        field: &'static str,
        message: String,
    },

    #[error("stats interval must be greater than zero")]
    ZeroStatsInterval,

    #[error("no sources are enabled - at least one source must be enabled")]
    NoSourcesEnabled,
}

impl ConfigError {
    pub fn invalid_value(kind: EventKind, field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            kind,
            field,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_source_error() {
        let err = ConfigError::DuplicateSource {
            kind: EventKind::PlayerKilled,
        };
        assert!(err.to_string().contains("player_killed"));
    }

    #[test]
    fn test_invalid_value_error() {
        let err = ConfigError::invalid_value(EventKind::Chat, "filename", "must not be empty");
        let message = err.to_string();
        assert!(message.contains("chat"));
        assert!(message.contains("filename"));
        assert!(message.contains("must not be empty"));
    }
}
