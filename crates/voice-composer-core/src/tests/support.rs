use crate::{
    CaptureDevice, CuePlayer, CueSound, PlaybackController, PlaybackEngine, RecordingController,
    RunLoop, VoiceError, VoiceEvent, VoiceResult, VoiceTask,
};

use std::{
    cell::{Cell, RefCell},
    panic::Location,
    path::{Path, PathBuf},
    rc::Rc,
    time::Duration,
};

use error_location::ErrorLocation;
use tokio::sync::mpsc;

/// Capture device that counts calls and returns a fixed location.
#[derive(Debug, Default)]
pub(crate) struct FakeCaptureDevice {
    pub(crate) start_calls: usize,
    pub(crate) stop_calls: usize,
    pub(crate) cancel_calls: usize,
    pub(crate) fail_start: bool,
    pub(crate) fail_stop: bool,
}

impl CaptureDevice for FakeCaptureDevice {
    fn start(&mut self) -> VoiceResult<()> {
        self.start_calls += 1;
        if self.fail_start {
            return Err(VoiceError::DeviceUnavailable {
                reason: "microphone busy".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }

    fn stop(&mut self) -> VoiceResult<PathBuf> {
        self.stop_calls += 1;
        if self.fail_stop {
            return Err(VoiceError::EncodeFailure {
                reason: "disk full".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(PathBuf::from(format!("/tmp/voice-{}.wav", self.stop_calls)))
    }

    fn cancel(&mut self) {
        self.cancel_calls += 1;
    }
}

/// Playback engine with a scripted duration. `None` fails every load.
#[derive(Debug, Default)]
pub(crate) struct FakePlaybackEngine {
    pub(crate) duration: Option<Duration>,
    pub(crate) playing: bool,
    pub(crate) position: Duration,
    pub(crate) loaded: Option<PathBuf>,
    pub(crate) stop_calls: usize,
    /// Set from the test to simulate output running out. Cleared by `play`.
    pub(crate) output_ended: Rc<Cell<bool>>,
}

impl FakePlaybackEngine {
    pub(crate) fn with_duration(secs: u64) -> Self {
        Self {
            duration: Some(Duration::from_secs(secs)),
            ..Self::default()
        }
    }
}

impl PlaybackEngine for FakePlaybackEngine {
    fn load(&mut self, location: &Path) -> VoiceResult<Duration> {
        match self.duration {
            Some(duration) => {
                self.loaded = Some(location.to_path_buf());
                self.position = Duration::ZERO;
                Ok(duration)
            }
            None => Err(VoiceError::DecodeError {
                path: location.to_path_buf(),
                reason: "not a WAV file".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    fn play(&mut self) {
        self.playing = true;
        self.output_ended.set(false);
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn stop(&mut self) {
        self.playing = false;
        self.loaded = None;
        self.stop_calls += 1;
    }

    fn is_playing(&self) -> bool {
        self.playing && !self.output_ended.get()
    }

    fn current_time(&self) -> Duration {
        self.position
    }

    fn set_current_time(&mut self, time: Duration) {
        self.position = time;
    }
}

/// Cue player that records what it was asked to play.
pub(crate) struct RecordingCuePlayer {
    pub(crate) played: Rc<RefCell<Vec<CueSound>>>,
    pub(crate) fail: bool,
}

impl CuePlayer for RecordingCuePlayer {
    fn play(&mut self, cue: CueSound) -> VoiceResult<()> {
        self.played.borrow_mut().push(cue);
        if self.fail {
            return Err(VoiceError::CueUnavailable {
                reason: "asset missing".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }
}

pub(crate) fn drain(rx: &mut mpsc::UnboundedReceiver<VoiceEvent>) -> Vec<VoiceEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

pub(crate) fn advance_recorder(
    run_loop: &mut RunLoop<VoiceTask>,
    recorder: &mut RecordingController<FakeCaptureDevice>,
    by: Duration,
) {
    run_loop.advance(by, |sched, task| recorder.handle_task(task, sched));
}

pub(crate) fn advance_player(
    run_loop: &mut RunLoop<VoiceTask>,
    player: &mut PlaybackController<FakePlaybackEngine>,
    by: Duration,
) {
    run_loop.advance(by, |sched, task| player.handle_task(task, sched));
}
