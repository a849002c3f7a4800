//! Voice Composer Core Library
//!
//! Voice-message capture and preview for a chat composer: a recording state
//! machine with pre-roll, swipe-to-cancel and a duration counter, a preview
//! state machine with scrubbing and a send/discard decision, and `cpal`
//! adapters for the capture device, playback engine and cue sounds.
//!
//! Everything runs on one cooperative [`RunLoop`]. Controllers schedule
//! [`VoiceTask`]s on it and the owner of the loop hands fired tasks back.
//!
//! # Example
//!
//! ```no_run
//! use voice_composer_core::{
//!     CpalCaptureDevice, FeedbackSoundPlayer, RecorderSettings, RecordingController, RunLoop,
//!     VoiceResult, VoiceTask,
//! };
//!
//! use std::{path::Path, time::Duration};
//!
//! use tokio::sync::mpsc;
//!
//! fn main() -> VoiceResult<()> {
//!     let (capture_tx, _capture_rx) = mpsc::unbounded_channel();
//!     let (event_tx, mut event_rx) = mpsc::unbounded_channel();
//!     let device = CpalCaptureDevice::new(Path::new("recordings"), None, capture_tx)?;
//!
//!     let mut run_loop = RunLoop::<VoiceTask>::new();
//!     let mut recorder = RecordingController::new(
//!         device,
//!         FeedbackSoundPlayer::silent(),
//!         RecorderSettings::default(),
//!         event_tx,
//!     );
//!
//!     recorder.request_start(&mut run_loop);
//!     run_loop.advance(Duration::from_secs(3), |sched, task| recorder.handle_task(task, sched));
//!     recorder.request_stop(&mut run_loop);
//!
//!     while let Ok(event) = event_rx.try_recv() {
//!         println!("{:?}", event);
//!     }
//!     Ok(())
//! }
//! ```

mod audio;
mod clip;
mod device;
mod error;
mod event;
mod feedback;
mod gesture;
mod playback;
mod recording;
mod scheduler;
pub mod time_label;

pub use {
    audio::{CpalCaptureDevice, CpalCuePlayer, CpalPlaybackEngine, DecodedAudio, decode_wav, encode_wav},
    clip::AudioClip,
    device::{CaptureDevice, CaptureEvent, EngineEvent, PlaybackEngine},
    error::{Result as VoiceResult, VoiceError},
    event::{VoiceEvent, VoiceTask},
    feedback::{CuePlayer, CueSound, FeedbackSoundPlayer},
    gesture::{CancelGesture, DEFAULT_AFFORDANCE_WIDTH, DEFAULT_CANCEL_DISTANCE, SwipeDirection},
    playback::{PLAYBACK_TICK, PlaybackController, PlaybackSession, PlaybackState},
    recording::{
        PRE_ROLL_DELAY, RECORDING_TICK, RecorderSettings, RecordingController, RecordingSession,
        RecordingState,
    },
    scheduler::{RunLoop, Scheduler, TaskHandle},
};

#[cfg(test)]
mod tests;
