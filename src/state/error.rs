//! Error types for configuration, asset loading and session control.
//!
//! Rejected words and timer expiry are normal game events and never show up here.

use std::path::PathBuf;

use derive_more::{Display, Error};

use super::phase::{InvalidTransition, SessionPhase};

/// Configuration error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Failure to obtain a dictionary or letters asset.
#[derive(Debug, Display, Error)]
pub enum AssetError {
    #[display("failed to read {}: {}", path.display(), source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[display("failed to parse {}: {}", path.display(), source)]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[display("letters pool is empty")]
    EmptyLetters,
}

/// Errors surfaced by `GameSession` control operations.
#[derive(Debug, Display, Error)]
pub enum SessionError {
    /// Input arrived while no turn was awaiting it.
    #[display("session is not accepting input (phase: {})", phase)]
    NotPlaying { phase: SessionPhase },

    /// Session could not be initialized.
    #[display("session assets unavailable: {}", source)]
    Assets { source: AssetError },

    #[display("{}", source)]
    Transition { source: InvalidTransition },
}

impl From<AssetError> for SessionError {
    fn from(source: AssetError) -> Self {
        Self::Assets { source }
    }
}

impl From<InvalidTransition> for SessionError {
    fn from(source: InvalidTransition) -> Self {
        Self::Transition { source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_config_error_tracks_location() {
        let err = ConfigError::new("bad value");
        assert_eq!(err.message, "bad value");
        assert!(err.file.ends_with("error.rs"));
        assert!(err.to_string().starts_with("Config error: bad value at "));
    }

    #[test]
    fn test_session_error_source_chain() {
        let err = SessionError::from(AssetError::EmptyLetters);
        assert_eq!(err.to_string(), "session assets unavailable: letters pool is empty");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_not_playing_message() {
        let err = SessionError::NotPlaying {
            phase: SessionPhase::Idle,
        };
        assert_eq!(err.to_string(), "session is not accepting input (phase: Idle)");
        assert!(err.source().is_none());
    }
}
