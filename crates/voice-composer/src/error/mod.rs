use voice_composer_core::VoiceError;

use std::{panic::Location, result::Result as StdResult};

use error_location::ErrorLocation;
use thiserror::Error;

/// Application-level errors for the voice-composer binary.
///
/// All variants include `ErrorLocation` for call-site tracking.
#[derive(Error, Debug)]
pub enum AppError {
    /// Capture or playback error from voice-composer-core.
    #[error("Voice error: {source} {location}")]
    Voice {
        /// The underlying voice error.
        #[source]
        source: VoiceError,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// A terminal line that is not a known command.
    #[error("Invalid command: {input} {location}")]
    InvalidCommand {
        /// The rejected input.
        input: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Configuration loading or saving error.
    #[error("Configuration error: {reason} {location}")]
    ConfigError {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// IO error from filesystem operations.
    #[error("IO error: {source} {location}")]
    IoError {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Location where this error was created.
        location: ErrorLocation,
    },
}

// Manual From<VoiceError> with location tracking.
// Cannot use #[from] because it does not support extra fields.
impl From<VoiceError> for AppError {
    #[track_caller]
    fn from(source: VoiceError) -> Self {
        AppError::Voice {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<std::io::Error> for AppError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        AppError::IoError {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Convenience type alias for Results using `AppError`.
pub type Result<T> = StdResult<T, AppError>;
