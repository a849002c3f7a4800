use crate::{AudioClip, PlaybackEngine, VoiceResult};

use std::{path::PathBuf, time::Duration};

use tracing::{debug, info, instrument, warn};

/// Preview player states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No clip loaded.
    Unloaded,
    /// Clip loaded and stopped, either fresh or after playing to the end.
    Loaded,
    /// Output running.
    Playing,
    /// Output paused mid-clip.
    Paused,
    /// The clip was confirmed or discarded. The engine is released.
    Finalized,
}

impl PlaybackState {
    /// Whether a clip is loaded and not yet finalized.
    pub fn is_loaded(self) -> bool {
        matches!(self, Self::Loaded | Self::Playing | Self::Paused)
    }
}

/// Owns the playback engine for one clip.
///
/// The session is the source of truth for `elapsed`: it advances from the
/// progress tick and only touches the engine position on seeks and rewinds.
pub struct PlaybackSession<E> {
    engine: E,
    state: PlaybackState,
    clip: Option<AudioClip>,
    elapsed: Duration,
    duration: Duration,
}

impl<E: PlaybackEngine> PlaybackSession<E> {
    /// Creates an unloaded session around `engine`.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            state: PlaybackState::Unloaded,
            clip: None,
            elapsed: Duration::ZERO,
            duration: Duration::ZERO,
        }
    }

    /// Current state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Position within the clip.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Clip length reported by the engine. Zero until loaded.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// The clip being previewed.
    pub fn clip(&self) -> Option<&AudioClip> {
        self.clip.as_ref()
    }

    /// The playback engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Loads `clip`, replacing whatever was loaded before.
    ///
    /// On failure the session is left `Unloaded`.
    #[instrument(skip(self, clip), fields(location = ?clip.location()))]
    pub fn load(&mut self, clip: AudioClip) -> VoiceResult<Duration> {
        if self.state.is_loaded() {
            self.engine.stop();
        }

        self.state = PlaybackState::Unloaded;
        self.clip = None;
        self.elapsed = Duration::ZERO;
        self.duration = Duration::ZERO;

        let duration = self.engine.load(clip.location())?;

        self.duration = duration;
        self.clip = Some(clip);
        self.state = PlaybackState::Loaded;
        info!(duration_ms = duration.as_millis(), "Clip loaded");

        Ok(duration)
    }

    /// `Loaded`/`Paused` to `Playing`. Returns whether the state changed.
    pub fn play(&mut self) -> bool {
        if !matches!(self.state, PlaybackState::Loaded | PlaybackState::Paused) {
            return false;
        }

        self.engine.play();
        self.state = PlaybackState::Playing;
        true
    }

    /// `Playing` to `Paused`. Returns whether the state changed.
    pub fn pause(&mut self) -> bool {
        if self.state != PlaybackState::Playing {
            return false;
        }

        self.engine.pause();
        self.state = PlaybackState::Paused;
        true
    }

    /// Plays or pauses. No effect without a loaded clip.
    pub fn toggle(&mut self) -> bool {
        match self.state {
            PlaybackState::Playing => self.pause(),
            _ => self.play(),
        }
    }

    /// Moves to `seconds`, clamped into `[0, duration]`. NaN counts as 0.
    /// Returns the new position, or `None` without a loaded clip.
    pub fn seek(&mut self, seconds: f64) -> Option<Duration> {
        if !self.state.is_loaded() {
            return None;
        }

        let max = self.duration.as_secs_f64();
        let clamped = if seconds.is_nan() {
            0.0
        } else {
            seconds.clamp(0.0, max)
        };

        self.elapsed = Duration::from_secs_f64(clamped).min(self.duration);
        self.engine.set_current_time(self.elapsed);
        debug!(elapsed_ms = self.elapsed.as_millis(), "Seeked");

        Some(self.elapsed)
    }

    /// Advances `elapsed` by `delta` while playing. Returns `true` when the
    /// end was reached, in which case the session has rewound to `Loaded`.
    pub fn advance(&mut self, delta: Duration) -> bool {
        if self.state != PlaybackState::Playing {
            return false;
        }

        self.elapsed = self.elapsed.saturating_add(delta);
        if self.elapsed < self.duration {
            return false;
        }

        self.rewind();
        true
    }

    /// Handles the engine running out of audio. Returns `true` when the
    /// session was playing and has rewound.
    ///
    /// A notification that arrives while the engine is still outputting
    /// belongs to an earlier playthrough and is ignored.
    pub fn reach_end(&mut self) -> bool {
        if self.state != PlaybackState::Playing {
            return false;
        }
        if self.engine.is_playing() {
            debug!("Stale end of output ignored");
            return false;
        }

        self.rewind();
        true
    }

    /// Stops the engine and enters `Finalized`. Returns the clip location
    /// the first time, `None` on every later call.
    pub fn finalize(&mut self) -> Option<PathBuf> {
        if !self.state.is_loaded() {
            return None;
        }

        self.engine.stop();
        self.state = PlaybackState::Finalized;
        self.elapsed = Duration::ZERO;

        let clip = self.clip.take();
        if clip.is_none() {
            warn!("Finalized without a clip");
        }
        clip.map(|c| c.location().to_path_buf())
    }

    fn rewind(&mut self) {
        self.engine.pause();
        self.engine.set_current_time(Duration::ZERO);
        self.elapsed = Duration::ZERO;
        self.state = PlaybackState::Loaded;
        debug!("Playback reached end");
    }
}
