//! Fire-and-forget UI cue sounds.

use crate::VoiceResult;

use tracing::debug;

/// Cue sounds played around the recording flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CueSound {
    /// Recording requested. Plays before the pre-roll so it stays out of
    /// the capture.
    Start,
    /// Recording cancelled.
    Cancel,
    /// Recording finished.
    Success,
}

/// Plays a single cue. Implementations must allow overlapping calls.
pub trait CuePlayer {
    /// Starts playing `cue` and returns without waiting for it to end.
    fn play(&mut self, cue: CueSound) -> VoiceResult<()>;
}

/// Plays cues for the controllers and swallows every failure.
///
/// Cues are cosmetic: a missing asset or a busy output device must never
/// block or fail the recording flow.
pub struct FeedbackSoundPlayer {
    player: Option<Box<dyn CuePlayer>>,
}

impl FeedbackSoundPlayer {
    /// Wraps a cue player.
    pub fn new(player: Box<dyn CuePlayer>) -> Self {
        Self {
            player: Some(player),
        }
    }

    /// A feedback player that never makes a sound.
    pub fn silent() -> Self {
        Self { player: None }
    }

    /// Plays `cue`, ignoring errors.
    pub fn play(&mut self, cue: CueSound) {
        let Some(player) = self.player.as_mut() else {
            return;
        };

        if let Err(e) = player.play(cue) {
            debug!(cue = ?cue, error = %e, "Cue sound skipped");
        }
    }
}
