use crate::{
    AudioClip, EngineEvent, PlaybackEngine, PlaybackSession, PlaybackState, Scheduler, TaskHandle,
    VoiceEvent, VoiceResult, VoiceTask, time_label::playback_label,
};

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

/// Preview progress resolution (60 Hz).
pub const PLAYBACK_TICK: Duration = Duration::from_nanos(1_000_000_000 / 60);

/// The "review before sending" state machine: play/pause, scrubbing, and
/// the final send or discard decision.
pub struct PlaybackController<E> {
    session: PlaybackSession<E>,
    events: mpsc::UnboundedSender<VoiceEvent>,
    tick: Option<TaskHandle>,
    last_tick: Duration,
    scrubbing: bool,
    shown_label: String,
}

impl<E: PlaybackEngine> PlaybackController<E> {
    /// Creates a controller with nothing loaded.
    pub fn new(engine: E, events: mpsc::UnboundedSender<VoiceEvent>) -> Self {
        Self {
            session: PlaybackSession::new(engine),
            events,
            tick: None,
            last_tick: Duration::ZERO,
            scrubbing: false,
            shown_label: playback_label(Duration::ZERO),
        }
    }

    /// Current state.
    pub fn state(&self) -> PlaybackState {
        self.session.state()
    }

    /// Whether a clip is loaded and awaiting a decision.
    pub fn is_active(&self) -> bool {
        self.session.state().is_loaded()
    }

    /// Whether the user is dragging the scrub control.
    pub fn is_scrubbing(&self) -> bool {
        self.scrubbing
    }

    /// Position within the clip. Drives the scrub control.
    pub fn elapsed(&self) -> Duration {
        self.session.elapsed()
    }

    /// Clip length. Upper bound of the scrub control.
    pub fn duration(&self) -> Duration {
        self.session.duration()
    }

    /// The clip being previewed.
    pub fn clip(&self) -> Option<&AudioClip> {
        self.session.clip()
    }

    /// The playback engine.
    pub fn engine(&self) -> &E {
        self.session.engine()
    }

    /// Time label: the position while playing, the clip length otherwise.
    pub fn time_label(&self) -> String {
        if self.session.state() == PlaybackState::Playing {
            playback_label(self.session.elapsed())
        } else {
            playback_label(self.session.duration())
        }
    }

    /// Loads a finished recording for preview.
    ///
    /// A clip that cannot be decoded leaves the controller unloaded; the
    /// error goes back to the caller and is not retried.
    #[instrument(skip(self, clip, scheduler))]
    pub fn load(&mut self, clip: AudioClip, scheduler: &mut impl Scheduler<VoiceTask>) -> VoiceResult<()> {
        self.stop_tick(scheduler);
        self.scrubbing = false;

        let duration = self.session.load(clip)?;

        self.shown_label = self.time_label();
        self.emit(VoiceEvent::PlaybackLoaded { duration });
        Ok(())
    }

    /// Play button.
    #[instrument(skip(self, scheduler))]
    pub fn toggle_playback(&mut self, scheduler: &mut impl Scheduler<VoiceTask>) {
        match self.session.state() {
            PlaybackState::Playing => self.pause(scheduler),
            PlaybackState::Loaded | PlaybackState::Paused => self.play(scheduler),
            PlaybackState::Unloaded | PlaybackState::Finalized => {
                debug!("Toggle ignored, nothing loaded");
            }
        }
    }

    /// Finger down on the scrub control. Pauses so the progress tick does
    /// not fight the drag.
    pub fn begin_scrub(&mut self, scheduler: &mut impl Scheduler<VoiceTask>) {
        if !self.session.state().is_loaded() {
            return;
        }

        self.scrubbing = true;
        self.pause(scheduler);
    }

    /// Moves the position to `seconds`, clamped into the clip.
    pub fn seek(&mut self, seconds: f64, scheduler: &mut impl Scheduler<VoiceTask>) {
        if self.scrubbing {
            self.pause(scheduler);
        }

        if self.session.seek(seconds).is_some() {
            self.publish_progress();
        }
    }

    /// Finger up on the scrub control: seek there and resume playing.
    pub fn end_scrub(&mut self, seconds: f64, scheduler: &mut impl Scheduler<VoiceTask>) {
        if !self.scrubbing {
            return;
        }

        self.seek(seconds, scheduler);
        self.scrubbing = false;
        self.play(scheduler);
    }

    /// Handles a task this controller scheduled.
    pub fn handle_task(&mut self, task: VoiceTask, scheduler: &mut impl Scheduler<VoiceTask>) {
        if task != VoiceTask::PlaybackTick {
            return;
        }

        if self.session.state() != PlaybackState::Playing {
            self.stop_tick(scheduler);
            return;
        }

        let now = scheduler.now();
        let delta = now.saturating_sub(self.last_tick);
        self.last_tick = now;

        if self.session.advance(delta) {
            self.on_finished(scheduler);
        } else {
            self.publish_progress();
        }
    }

    /// Handles an asynchronous engine notification.
    pub fn handle_engine_event(&mut self, event: EngineEvent, scheduler: &mut impl Scheduler<VoiceTask>) {
        match event {
            EngineEvent::Finished => {
                if self.session.reach_end() {
                    self.on_finished(scheduler);
                }
            }
        }
    }

    /// Send button. Reports the clip location once.
    #[instrument(skip(self, scheduler))]
    pub fn confirm(&mut self, scheduler: &mut impl Scheduler<VoiceTask>) {
        self.stop_tick(scheduler);
        self.scrubbing = false;

        if let Some(location) = self.session.finalize() {
            info!(location = ?location, "Voice message confirmed");
            self.emit(VoiceEvent::Confirmed(location));
        }
    }

    /// Discard button. Reports the clip location once.
    #[instrument(skip(self, scheduler))]
    pub fn discard(&mut self, scheduler: &mut impl Scheduler<VoiceTask>) {
        self.stop_tick(scheduler);
        self.scrubbing = false;

        if let Some(location) = self.session.finalize() {
            info!(location = ?location, "Voice message discarded");
            self.emit(VoiceEvent::Discarded(location));
        }
    }

    fn play(&mut self, scheduler: &mut impl Scheduler<VoiceTask>) {
        if !self.session.play() {
            return;
        }

        self.last_tick = scheduler.now();
        self.stop_tick(scheduler);
        self.tick = Some(scheduler.schedule_repeating(PLAYBACK_TICK, VoiceTask::PlaybackTick));
        self.emit(VoiceEvent::PlaybackStateChanged(PlaybackState::Playing));
        self.publish_progress();
    }

    fn pause(&mut self, scheduler: &mut impl Scheduler<VoiceTask>) {
        if !self.session.pause() {
            return;
        }

        self.stop_tick(scheduler);
        self.emit(VoiceEvent::PlaybackStateChanged(PlaybackState::Paused));
        self.publish_progress();
    }

    fn on_finished(&mut self, scheduler: &mut impl Scheduler<VoiceTask>) {
        self.stop_tick(scheduler);
        self.emit(VoiceEvent::PlaybackFinished);
        self.emit(VoiceEvent::PlaybackStateChanged(PlaybackState::Loaded));
        self.publish_progress();
    }

    fn publish_progress(&mut self) {
        let label = self.time_label();
        if label == self.shown_label {
            return;
        }

        self.shown_label = label.clone();
        self.emit(VoiceEvent::PlaybackProgress {
            elapsed: self.session.elapsed(),
            label,
        });
    }

    fn stop_tick(&mut self, scheduler: &mut impl Scheduler<VoiceTask>) {
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
