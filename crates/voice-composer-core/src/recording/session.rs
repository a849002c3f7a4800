use crate::{AudioClip, CaptureDevice, VoiceError, VoiceResult};

use std::{panic::Location, path::PathBuf, time::Duration};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Lifecycle of one voice recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordingState {
    /// Nothing recorded yet.
    Idle,
    /// Start requested, waiting out the pre-roll before the device starts.
    Armed {
        /// Unique session ID for log correlation and stale-task checks.
        session_id: Uuid,
    },
    /// The capture device is running.
    Capturing {
        /// Unique session ID for log correlation.
        session_id: Uuid,
        /// Scheduler time when the device started.
        started_at: Duration,
    },
    /// Capture stopped and produced a clip.
    Finished {
        /// Session that produced the clip.
        session_id: Uuid,
        /// The recorded clip.
        clip: AudioClip,
    },
    /// Capture was cancelled or failed. No clip.
    Cancelled {
        /// Session that was cancelled.
        session_id: Uuid,
    },
}

impl RecordingState {
    /// Whether a recording is armed or running.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Armed { .. } | Self::Capturing { .. })
    }

    /// Session ID, if any recording has been armed.
    pub fn session_id(&self) -> Option<Uuid> {
        match self {
            Self::Idle => None,
            Self::Armed { session_id }
            | Self::Capturing { session_id, .. }
            | Self::Finished { session_id, .. }
            | Self::Cancelled { session_id } => Some(*session_id),
        }
    }
}

/// Owns the capture device and the recording counter.
///
/// Transition methods are no-ops when called out of order; gesture and
/// timer callbacks routinely race with taps.
pub struct RecordingSession<D> {
    device: D,
    state: RecordingState,
    elapsed: Duration,
}

impl<D: CaptureDevice> RecordingSession<D> {
    /// Creates an idle session around `device`.
    pub fn new(device: D) -> Self {
        Self {
            device,
            state: RecordingState::Idle,
            elapsed: Duration::ZERO,
        }
    }

    /// Current state.
    pub fn state(&self) -> &RecordingState {
        &self.state
    }

    /// Recording counter. Zero unless capturing.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// The capture device.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Arms a new recording. Returns `None` when one is already armed or
    /// running.
    pub fn arm(&mut self) -> Option<Uuid> {
        if self.state.is_active() {
            return None;
        }

        let session_id = Uuid::new_v4();
        self.state = RecordingState::Armed { session_id };
        self.elapsed = Duration::ZERO;
        debug!(session_id = %session_id, "Recording armed");
        Some(session_id)
    }

    /// Starts the device if `session_id` is still the armed recording.
    ///
    /// Returns `Ok(false)` for a stale pre-roll: the recording it was
    /// scheduled for has since been cancelled or replaced. A device that
    /// refuses to start leaves the session `Cancelled`.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn begin_capture(&mut self, session_id: Uuid, now: Duration) -> VoiceResult<bool> {
        match self.state {
            RecordingState::Armed { session_id: armed } if armed == session_id => {}
            _ => return Ok(false),
        }

        if let Err(e) = self.device.start() {
            self.device.cancel();
            self.state = RecordingState::Cancelled { session_id };
            return Err(e);
        }

        self.state = RecordingState::Capturing {
            session_id,
            started_at: now,
        };
        self.elapsed = Duration::ZERO;
        info!(session_id = %session_id, "Capture started");

        Ok(true)
    }

    /// Stops the device and produces the clip. `Ok(None)` unless capturing.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn finish(&mut self, now: Duration) -> VoiceResult<Option<AudioClip>> {
        if !matches!(self.state, RecordingState::Capturing { .. }) {
            return Ok(None);
        }

        match self.device.stop() {
            Ok(location) => Ok(self.complete(location, now)),
            Err(e) => {
                self.abort();
                Err(e)
            }
        }
    }

    /// Records a clip the device finished on its own. `None` unless
    /// capturing.
    pub fn complete(&mut self, location: PathBuf, now: Duration) -> Option<AudioClip> {
        let RecordingState::Capturing {
            session_id,
            started_at,
        } = self.state
        else {
            return None;
        };

        let clip = AudioClip::new(location, now.saturating_sub(started_at));
        info!(
            session_id = %session_id,
            duration_ms = clip.duration().as_millis(),
            location = ?clip.location(),
            "Capture finished"
        );

        self.state = RecordingState::Finished {
            session_id,
            clip: clip.clone(),
        };
        self.elapsed = Duration::ZERO;

        Some(clip)
    }

    /// Cancels an armed or running recording. The device is only told to
    /// cancel if it actually started. Returns the cancelled session.
    pub fn cancel(&mut self) -> Option<Uuid> {
        let session_id = match self.state {
            RecordingState::Armed { session_id } => session_id,
            RecordingState::Capturing { session_id, .. } => {
                self.device.cancel();
                session_id
            }
            _ => return None,
        };

        self.state = RecordingState::Cancelled { session_id };
        self.elapsed = Duration::ZERO;
        info!(session_id = %session_id, "Recording cancelled");

        Some(session_id)
    }

    /// Forces `Cancelled` after a device failure. Returns the session that
    /// was abandoned, if one was active.
    pub fn abort(&mut self) -> Option<Uuid> {
        let aborted = self.cancel();
        if let Some(session_id) = aborted {
            warn!(session_id = %session_id, "Recording abandoned");
        }
        aborted
    }

    /// Advances the counter by one tick while capturing, otherwise resets it.
    pub fn tick(&mut self, interval: Duration) -> Duration {
        if matches!(self.state, RecordingState::Capturing { .. }) {
            self.elapsed += interval;
        } else {
            self.elapsed = Duration::ZERO;
        }
        self.elapsed
    }
}

/// Error for a device that reported an encode failure asynchronously.
#[track_caller]
pub(crate) fn encode_failure(reason: String) -> VoiceError {
    VoiceError::EncodeFailure {
        reason,
        location: ErrorLocation::from(Location::caller()),
    }
}

/// Error for a device that was reclaimed by the system.
#[track_caller]
pub(crate) fn interrupted() -> VoiceError {
    VoiceError::Interrupted {
        location: ErrorLocation::from(Location::caller()),
    }
}
