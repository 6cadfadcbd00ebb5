//! Error types for configuration loading.
//!
//! Gameplay never fails: rejected spawns, out-of-range targets and absorbed
//! projectiles are policy outcomes reported through return values. Errors only
//! exist at the outer surfaces where configuration enters the engine.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Error raised while loading or validating a [`MatchConfig`](crate::config::MatchConfig).
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The configuration file is not valid JSON for the expected schema.
    Parse(serde_json::Error),
    /// The configuration parsed but describes an unplayable match.
    Invalid(String),
}

impl ConfigError {
    /// Build a validation error from a message.
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            ConfigError::Parse(e) => write!(f, "invalid config JSON: {e}"),
            ConfigError::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_display() {
        let err = ConfigError::invalid("field_cap must be positive");
        assert_eq!(err.to_string(), "invalid config: field_cap must be positive");
    }

    #[test]
    fn test_io_display_names_path() {
        let err = ConfigError::Io {
            path: PathBuf::from("/nope/match.json"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        let text = err.to_string();
        assert!(text.contains("/nope/match.json"));
        assert!(text.contains("missing"));
    }

    #[test]
    fn test_parse_error_has_source() {
        let parse = serde_json::from_str::<u32>("not json").unwrap_err();
        let err = ConfigError::from(parse);
        assert!(std::error::Error::source(&err).is_some());
    }
}
