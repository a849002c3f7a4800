use crate::{
    AudioClip, CancelGesture, CaptureDevice, CaptureEvent, CueSound, FeedbackSoundPlayer,
    RecordingSession, RecordingState, Scheduler, TaskHandle, VoiceError, VoiceEvent, VoiceTask,
    recording::{encode_failure, interrupted},
    time_label::recording_label,
};

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Delay between the start cue and the device actually capturing, so the
/// cue never ends up in the recording.
pub const PRE_ROLL_DELAY: Duration = Duration::from_millis(750);

/// Recording counter resolution.
pub const RECORDING_TICK: Duration = Duration::from_millis(500);

/// Host-supplied recording limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecorderSettings {
    /// Recording stops itself once the counter reaches this. `None` means
    /// unlimited.
    pub max_duration: Option<Duration>,
    /// Swipe-to-cancel recognizer.
    pub cancel_gesture: CancelGesture,
}

impl Default for RecorderSettings {
    fn default() -> Self {
        Self {
            max_duration: None,
            cancel_gesture: CancelGesture::default(),
        }
    }
}

/// The record button and swipe-to-cancel state machine.
///
/// Every method that can start or stop a timer takes the scheduler the
/// host runs. Fired tasks come back through [`handle_task`](Self::handle_task).
pub struct RecordingController<D> {
    session: RecordingSession<D>,
    feedback: FeedbackSoundPlayer,
    settings: RecorderSettings,
    events: mpsc::UnboundedSender<VoiceEvent>,
    pre_roll: Option<TaskHandle>,
    tick: Option<TaskHandle>,
}

impl<D: CaptureDevice> RecordingController<D> {
    /// Creates an idle controller.
    pub fn new(
        device: D,
        feedback: FeedbackSoundPlayer,
        settings: RecorderSettings,
        events: mpsc::UnboundedSender<VoiceEvent>,
    ) -> Self {
        Self {
            session: RecordingSession::new(device),
            feedback,
            settings,
            events,
            pre_roll: None,
            tick: None,
        }
    }

    /// Current recording state.
    pub fn state(&self) -> &RecordingState {
        self.session.state()
    }

    /// Recording counter.
    pub fn elapsed(&self) -> Duration {
        self.session.elapsed()
    }

    /// Recording counter as displayed.
    pub fn elapsed_label(&self) -> String {
        recording_label(self.session.elapsed())
    }

    /// The last clip produced, while the controller still holds it.
    pub fn clip(&self) -> Option<&AudioClip> {
        match self.session.state() {
            RecordingState::Finished { clip, .. } => Some(clip),
            _ => None,
        }
    }

    /// The capture device.
    pub fn device(&self) -> &D {
        self.session.device()
    }

    /// Plays the start cue and arms a recording. The device starts after
    /// [`PRE_ROLL_DELAY`]. No-op while a recording is armed or running.
    #[instrument(skip(self, scheduler))]
    pub fn request_start(&mut self, scheduler: &mut impl Scheduler<VoiceTask>) {
        let Some(session_id) = self.session.arm() else {
            debug!("Start ignored, recording already active");
            return;
        };

        self.feedback.play(CueSound::Start);
        self.pre_roll = Some(scheduler.schedule_once(PRE_ROLL_DELAY, VoiceTask::PreRoll { session_id }));

        info!(session_id = %session_id, "Recording requested");
        self.emit(VoiceEvent::RecordingArmed { session_id });
    }

    /// Stops a running recording and hands the clip to the host.
    ///
    /// During the pre-roll nothing has been captured yet, so the pending
    /// start is suppressed and the recording is cancelled instead.
    #[instrument(skip(self, scheduler))]
    pub fn request_stop(&mut self, scheduler: &mut impl Scheduler<VoiceTask>) {
        if matches!(self.session.state(), RecordingState::Armed { .. }) {
            self.request_cancel(scheduler);
            return;
        }
        if !matches!(self.session.state(), RecordingState::Capturing { .. }) {
            return;
        }

        self.stop_timers(scheduler);

        match self.session.finish(scheduler.now()) {
            Ok(Some(clip)) => {
                self.feedback.play(CueSound::Success);
                self.emit(VoiceEvent::ClipReady(clip));
            }
            Ok(None) => {}
            Err(e) => self.fail(e, scheduler),
        }
    }

    /// Cancels an armed or running recording and discards any partial file.
    #[instrument(skip(self, scheduler))]
    pub fn request_cancel(&mut self, scheduler: &mut impl Scheduler<VoiceTask>) {
        if !self.session.state().is_active() {
            return;
        }

        self.stop_timers(scheduler);

        if let Some(session_id) = self.session.cancel() {
            self.feedback.play(CueSound::Cancel);
            self.emit(VoiceEvent::RecordingCancelled { session_id });
        }
    }

    /// Mic button: stops an active recording, otherwise starts one.
    pub fn toggle(&mut self, scheduler: &mut impl Scheduler<VoiceTask>) {
        if self.session.state().is_active() {
            self.request_stop(scheduler);
        } else {
            self.request_start(scheduler);
        }
    }

    /// Feeds a swipe over the cancel affordance. Returns whether it was
    /// recognized as a cancel.
    pub fn handle_swipe(&mut self, dx: f32, dy: f32, scheduler: &mut impl Scheduler<VoiceTask>) -> bool {
        if !self.settings.cancel_gesture.recognizes(dx, dy) {
            debug!(dx, dy, "Swipe below cancel threshold");
            return false;
        }

        self.request_cancel(scheduler);
        true
    }

    /// Handles a task this controller scheduled.
    pub fn handle_task(&mut self, task: VoiceTask, scheduler: &mut impl Scheduler<VoiceTask>) {
        match task {
            VoiceTask::PreRoll { session_id } => self.on_pre_roll(session_id, scheduler),
            VoiceTask::RecordingTick => self.on_tick(scheduler),
            VoiceTask::PlaybackTick => {}
        }
    }

    /// Handles an asynchronous capture device notification.
    #[instrument(skip(self, scheduler))]
    pub fn handle_capture_event(&mut self, event: CaptureEvent, scheduler: &mut impl Scheduler<VoiceTask>) {
        if !matches!(self.session.state(), RecordingState::Capturing { .. }) {
            debug!(event = ?event, "Capture event outside capture ignored");
            return;
        }

        match event {
            CaptureEvent::Finished { location } => {
                self.stop_timers(scheduler);
                if let Some(clip) = self.session.complete(location, scheduler.now()) {
                    self.feedback.play(CueSound::Success);
                    self.emit(VoiceEvent::ClipReady(clip));
                }
            }
            CaptureEvent::EncodeFailure { reason } => self.fail(encode_failure(reason), scheduler),
            CaptureEvent::Interrupted => self.fail(interrupted(), scheduler),
            CaptureEvent::BufferFull => {
                warn!("Capture buffer full, stopping recording");
                self.request_stop(scheduler);
            }
        }
    }

    fn on_pre_roll(&mut self, session_id: Uuid, scheduler: &mut impl Scheduler<VoiceTask>) {
        self.pre_roll = None;

        // The pre-roll may fire after a cancel that raced it; only the
        // session state decides.
        match self.session.begin_capture(session_id, scheduler.now()) {
            Ok(true) => {
                self.tick = Some(scheduler.schedule_repeating(RECORDING_TICK, VoiceTask::RecordingTick));
                self.emit(VoiceEvent::RecordingStarted { session_id });
            }
            Ok(false) => debug!(session_id = %session_id, "Stale pre-roll ignored"),
            Err(e) => self.fail(e, scheduler),
        }
    }

    fn on_tick(&mut self, scheduler: &mut impl Scheduler<VoiceTask>) {
        if !matches!(self.session.state(), RecordingState::Capturing { .. }) {
            self.session.tick(RECORDING_TICK);
            self.stop_timers(scheduler);
            return;
        }

        let elapsed = self.session.tick(RECORDING_TICK);
        self.emit(VoiceEvent::RecordingProgress {
            elapsed,
            label: recording_label(elapsed),
        });

        if let Some(max) = self.settings.max_duration
            && elapsed >= max
        {
            info!(max_ms = max.as_millis(), "Maximum recording duration reached");
            self.request_stop(scheduler);
        }
    }

    fn fail(&mut self, error: VoiceError, scheduler: &mut impl Scheduler<VoiceTask>) {
        self.stop_timers(scheduler);
        self.session.abort();
        warn!(error = %error, "Recording failed");
        self.emit(VoiceEvent::RecordingFailed(error));
    }

    fn stop_timers(&mut self, scheduler: &mut impl Scheduler<VoiceTask>) {
        if let Some(handle) = self.pre_roll.take() {
            scheduler.cancel(handle);
        }
        if let Some(handle) = self.tick.take() {
            scheduler.cancel(handle);
        }
    }

    fn emit(&self, event: VoiceEvent) {
        if self.events.send(event).is_err() {
            debug!("Host event receiver dropped");
        }
    }
}
