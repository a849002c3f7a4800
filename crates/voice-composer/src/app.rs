use crate::{AppCommand, AppResult, config::Config};

use std::{fs, path::Path, time::Duration};

use tokio::{
    sync::mpsc,
    time::{Instant, sleep_until},
};
use tracing::{debug, error, info, instrument, warn};
use voice_composer_core::{
    CaptureDevice, CaptureEvent, CpalCaptureDevice, CpalCuePlayer, CpalPlaybackEngine, EngineEvent,
    FeedbackSoundPlayer, PlaybackController, PlaybackEngine, RecordingController, RunLoop,
    VoiceEvent, VoiceTask,
};

/// Terminal host for the composer.
///
/// Owns the run loop and both controllers on one thread. Wall time since
/// `run()` started is the run loop's clock; fired tasks go back to the
/// controller that scheduled them.
pub struct App<D, E> {
    pub(crate) run_loop: RunLoop<VoiceTask>,
    pub(crate) recorder: RecordingController<D>,
    pub(crate) player: PlaybackController<E>,
    pub(crate) capture_rx: mpsc::UnboundedReceiver<CaptureEvent>,
    pub(crate) engine_rx: mpsc::UnboundedReceiver<EngineEvent>,
    pub(crate) event_rx: mpsc::UnboundedReceiver<VoiceEvent>,
}

impl App<CpalCaptureDevice, CpalPlaybackEngine> {
    /// Opens the audio devices described by `config`.
    #[track_caller]
    #[instrument(skip(config))]
    pub(crate) fn from_config(config: &Config) -> AppResult<Self> {
        let capture_dir = config.capture_dir()?;

        let (capture_tx, capture_rx) = mpsc::unbounded_channel();
        let (engine_tx, engine_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let settings = config.recording.recorder_settings();
        let device = CpalCaptureDevice::new(&capture_dir, settings.max_duration, capture_tx)?;
        let engine = CpalPlaybackEngine::new(engine_tx)?;

        let assets = config.sounds.cue_assets();
        let feedback = if assets.is_empty() {
            FeedbackSoundPlayer::silent()
        } else {
            match CpalCuePlayer::new(assets) {
                Ok(player) => FeedbackSoundPlayer::new(Box::new(player)),
                Err(e) => {
                    warn!(error = %e, "Cue sounds disabled");
                    FeedbackSoundPlayer::silent()
                }
            }
        };

        info!(capture_dir = ?capture_dir, "Audio initialized");

        Ok(Self {
            run_loop: RunLoop::new(),
            recorder: RecordingController::new(
                device,
                feedback,
                settings,
                event_tx.clone(),
            ),
            player: PlaybackController::new(engine, event_tx),
            capture_rx,
            engine_rx,
            event_rx,
        })
    }
}

impl<D: CaptureDevice, E: PlaybackEngine> App<D, E> {
    /// Run the host loop until `q` or end of input.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Voice Composer starting");
        println!("r: record/stop  x: cancel  swipe <dx> <dy>  p: play/pause");
        println!("scrub  seek <s>  release <s>  send  discard  q: quit");

        // Stdin forwarding via single persistent blocking task.
        //
        // Shutdown: when line_rx is dropped (main loop breaks), the next
        // blocking_send() fails and the forwarder exits.
        let (line_tx, mut line_rx) = mpsc::channel::<String>(32);
        let stdin_handle = tokio::task::spawn_blocking(move || {
            for line in std::io::stdin().lines() {
                let Ok(line) = line else { break };
                if line_tx.blocking_send(line).is_err() {
                    break;
                }
            }
        });

        let origin = Instant::now();

        loop {
            let wake = self.run_loop.next_deadline().map(|deadline| origin + deadline);

            tokio::select! {
                line = line_rx.recv() => {
                    let Some(line) = line else {
                        info!("Input closed, shutting down");
                        break;
                    };
                    self.pump(origin.elapsed());
                    if line.trim().is_empty() {
                        continue;
                    }
                    match line.parse::<AppCommand>() {
                        Ok(AppCommand::Quit) => {
                            info!("Shutdown requested");
                            break;
                        }
                        Ok(command) => self.handle_command(command),
                        Err(e) => warn!(error = %e, "Ignoring input"),
                    }
                }

                Some(event) = self.capture_rx.recv() => {
                    self.pump(origin.elapsed());
                    self.recorder.handle_capture_event(event, &mut self.run_loop);
                }

                Some(event) = self.engine_rx.recv() => {
                    self.pump(origin.elapsed());
                    self.player.handle_engine_event(event, &mut self.run_loop);
                }

                _ = sleep_until(wake.unwrap_or(origin)), if wake.is_some() => {
                    self.pump(origin.elapsed());
                }
            }

            self.drain_events();
        }

        self.shutdown();

        drop(line_rx);

        match tokio::time::timeout(Duration::from_millis(100), stdin_handle).await {
            Ok(Ok(())) => info!("Input forwarder stopped cleanly"),
            Ok(Err(e)) => error!(error = ?e, "Input forwarder task panicked"),
            Err(_) => debug!("Input forwarder still blocked on stdin, will be cleaned up on exit"),
        }

        info!("Voice Composer shut down successfully");

        Ok(())
    }

    /// Dispatches every task due by `now` to the controller that owns it.
    pub(crate) fn pump(&mut self, now: Duration) {
        let Self {
            run_loop,
            recorder,
            player,
            ..
        } = self;

        run_loop.run_until(now, |sched, task| match task {
            VoiceTask::PlaybackTick => player.handle_task(task, sched),
            VoiceTask::PreRoll { .. } | VoiceTask::RecordingTick => recorder.handle_task(task, sched),
        });
    }

    /// Applies one user command.
    #[instrument(skip(self))]
    pub(crate) fn handle_command(&mut self, command: AppCommand) {
        let sched = &mut self.run_loop;

        match command {
            AppCommand::ToggleRecording => {
                if self.player.is_active() && !self.recorder.state().is_active() {
                    println!("Send or discard the current clip first");
                    return;
                }
                self.recorder.toggle(sched);
            }
            AppCommand::CancelRecording => self.recorder.request_cancel(sched),
            AppCommand::Swipe { dx, dy } => {
                if !self.recorder.handle_swipe(dx, dy, sched) {
                    debug!(dx, dy, "Swipe did not cancel");
                }
            }
            AppCommand::TogglePlayback => self.player.toggle_playback(sched),
            AppCommand::BeginScrub => self.player.begin_scrub(sched),
            AppCommand::Seek { seconds } => self.player.seek(seconds, sched),
            AppCommand::EndScrub { seconds } => self.player.end_scrub(seconds, sched),
            AppCommand::Send => self.player.confirm(sched),
            AppCommand::Discard => self.player.discard(sched),
            AppCommand::Quit => {}
        }
    }

    /// Handles everything the controllers reported since the last call.
    pub(crate) fn drain_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_voice_event(event);
        }
    }

    #[instrument(skip(self))]
    fn handle_voice_event(&mut self, event: VoiceEvent) {
        match event {
            VoiceEvent::RecordingArmed { session_id } => {
                debug!(session_id = %session_id, "Recording armed");
                println!("Get ready...");
            }
            VoiceEvent::RecordingStarted { session_id } => {
                debug!(session_id = %session_id, "Recording started");
                println!("Recording (swipe left to cancel)");
            }
            VoiceEvent::RecordingProgress { label, .. } => println!("  {}", label),
            VoiceEvent::ClipReady(clip) => {
                println!("Recorded {}", clip.location().display());
                let location = clip.location().to_path_buf();
                if let Err(e) = self.player.load(clip, &mut self.run_loop) {
                    error!(location = ?location, error = %e, "Failed to load clip for preview");
                    remove_clip(&location);
                }
            }
            VoiceEvent::RecordingCancelled { session_id } => {
                debug!(session_id = %session_id, "Recording cancelled");
                println!("Recording cancelled");
            }
            VoiceEvent::RecordingFailed(e) => {
                error!(error = %e, "Recording failed");
                println!("Recording failed");
            }
            VoiceEvent::PlaybackLoaded { .. } => {
                println!("Preview {} (p: play, send, discard)", self.player.time_label());
            }
            VoiceEvent::PlaybackStateChanged(state) => debug!(state = ?state, "Preview state"),
            VoiceEvent::PlaybackProgress { label, .. } => println!("  {}", label),
            VoiceEvent::PlaybackFinished => println!("Preview finished"),
            VoiceEvent::Confirmed(location) => println!("Sent {}", location.display()),
            VoiceEvent::Discarded(location) => {
                remove_clip(&location);
                println!("Discarded");
            }
        }
    }

    /// Releases the microphone and throws away an unsent preview.
    fn shutdown(&mut self) {
        self.recorder.request_cancel(&mut self.run_loop);
        self.player.discard(&mut self.run_loop);
        self.drain_events();
    }
}

fn remove_clip(location: &Path) {
    match fs::remove_file(location) {
        Ok(()) => info!(location = ?location, "Clip deleted"),
        Err(e) => warn!(location = ?location, error = %e, "Failed to delete clip"),
    }
}
