//! Contracts for the capture device and playback engine.
//!
//! The state machines only ever talk to these traits. Concrete `cpal`
//! adapters live in [`crate::audio`]; tests use scripted fakes.

use crate::VoiceResult;

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// Records audio to a file.
pub trait CaptureDevice {
    /// Begins capturing.
    fn start(&mut self) -> VoiceResult<()>;

    /// Ends capturing and returns the location of the written file.
    fn stop(&mut self) -> VoiceResult<PathBuf>;

    /// Aborts capturing and discards any partial file. Safe to call when
    /// nothing is being captured.
    fn cancel(&mut self);
}

/// Asynchronous notifications from a [`CaptureDevice`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// The device finished on its own and wrote `location`.
    Finished {
        /// File written by the device.
        location: PathBuf,
    },
    /// The device could not encode what it captured.
    EncodeFailure {
        /// Description reported by the device.
        reason: String,
    },
    /// The device was reclaimed by the system.
    Interrupted,
    /// The capture buffer is full. Samples after this point are dropped
    /// until the recording is stopped.
    BufferFull,
}

/// Plays a recorded file.
pub trait PlaybackEngine {
    /// Opens `location` and returns its duration.
    fn load(&mut self, location: &Path) -> VoiceResult<Duration>;

    /// Starts or resumes output.
    fn play(&mut self);

    /// Pauses output, keeping the position.
    fn pause(&mut self);

    /// Stops output and releases the loaded file.
    fn stop(&mut self);

    /// Whether output is running.
    fn is_playing(&self) -> bool;

    /// Engine position.
    fn current_time(&self) -> Duration;

    /// Moves the engine position.
    fn set_current_time(&mut self, time: Duration);
}

/// Asynchronous notifications from a [`PlaybackEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// Output reached the end of the loaded file.
    Finished,
}
