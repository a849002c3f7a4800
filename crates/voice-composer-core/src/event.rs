use crate::{AudioClip, PlaybackState, VoiceError};

use std::{path::PathBuf, time::Duration};

use uuid::Uuid;

/// Scheduled work owned by the controllers.
///
/// The host's run loop hands each fired task back to the controller that
/// scheduled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceTask {
    /// Pre-roll delay elapsed for the recording armed as `session_id`.
    PreRoll {
        /// Recording the delay was scheduled for.
        session_id: Uuid,
    },
    /// Half-second recording counter tick.
    RecordingTick,
    /// 60 Hz preview progress tick.
    PlaybackTick,
}

/// Notifications for the host.
#[derive(Debug)]
pub enum VoiceEvent {
    /// Start cue played, waiting out the pre-roll.
    RecordingArmed {
        /// New recording.
        session_id: Uuid,
    },
    /// The capture device is running.
    RecordingStarted {
        /// Recording that started.
        session_id: Uuid,
    },
    /// Recording counter advanced.
    RecordingProgress {
        /// Counter value.
        elapsed: Duration,
        /// Counter as displayed.
        label: String,
    },
    /// A recording finished and produced a clip.
    ClipReady(AudioClip),
    /// The user cancelled the recording.
    RecordingCancelled {
        /// Recording that was cancelled.
        session_id: Uuid,
    },
    /// The recording was abandoned because of a device error.
    RecordingFailed(VoiceError),
    /// A clip is loaded and ready to audition.
    PlaybackLoaded {
        /// Clip length reported by the engine.
        duration: Duration,
    },
    /// The preview moved between play states.
    PlaybackStateChanged(PlaybackState),
    /// The displayed preview time changed.
    PlaybackProgress {
        /// Session elapsed time.
        elapsed: Duration,
        /// Time label as displayed.
        label: String,
    },
    /// The preview played to the end and rewound.
    PlaybackFinished,
    /// The user chose to send the clip at this location.
    Confirmed(PathBuf),
    /// The user threw the clip at this location away.
    Discarded(PathBuf),
}
