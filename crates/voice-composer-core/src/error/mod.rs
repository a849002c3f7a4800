use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

/// Voice capture and playback errors with source location tracking.
///
/// None of these are fatal. The owning session is forced back to its
/// cancelled or unloaded state and the host is told once.
#[derive(Error, Debug)]
pub enum VoiceError {
    /// Capture or output device missing, busy or refusing to start.
    #[error("Audio device unavailable: {reason} {location}")]
    DeviceUnavailable {
        /// Description of the device failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The capture device failed to produce a usable file.
    #[error("Encode failure: {reason} {location}")]
    EncodeFailure {
        /// Description of the encode failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A recorded clip could not be opened or decoded for playback.
    #[error("Failed to decode {path:?}: {reason} {location}")]
    DecodeError {
        /// Location of the clip that failed to load.
        path: PathBuf,
        /// Description of the decode failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Capture was reclaimed by higher-priority system activity.
    #[error("Capture interrupted {location}")]
    Interrupted {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A feedback cue could not be played. Never propagated past the
    /// feedback player.
    #[error("Cue sound unavailable: {reason} {location}")]
    CueUnavailable {
        /// Description of the cue failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`VoiceError`].
pub type Result<T> = std::result::Result<T, VoiceError>;
