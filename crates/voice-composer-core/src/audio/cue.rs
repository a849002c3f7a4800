use crate::{
    CuePlayer, CueSound, VoiceError, VoiceResult,
    audio::{OutputCursor, decode_wav, default_output_device, play_stream},
};

use std::{
    collections::HashMap,
    panic::Location,
    path::PathBuf,
    sync::atomic::Ordering,
};

use cpal::{Device, Stream};
use error_location::ErrorLocation;
use tracing::{info, instrument};

struct ActiveCue {
    cursor: OutputCursor,
    _stream: Stream,
}

/// Plays cue WAV files on the default output device.
///
/// Each cue gets its own output stream, so cues overlap freely. Streams are
/// kept alive until their cue has played out.
pub struct CpalCuePlayer {
    device: Device,
    assets: HashMap<CueSound, PathBuf>,
    active: Vec<ActiveCue>,
}

impl CpalCuePlayer {
    /// Opens the default output device for the given cue assets. Cues
    /// without an asset are skipped.
    #[track_caller]
    #[instrument(skip(assets))]
    pub fn new(assets: HashMap<CueSound, PathBuf>) -> VoiceResult<Self> {
        let device = default_output_device()?;
        info!(cue_count = assets.len(), "Cue player initialized");

        Ok(Self {
            device,
            assets,
            active: Vec::new(),
        })
    }
}

impl CuePlayer for CpalCuePlayer {
    #[track_caller]
    fn play(&mut self, cue: CueSound) -> VoiceResult<()> {
        self.active
            .retain(|active| !active.cursor.finished.load(Ordering::Acquire));

        let path = self.assets.get(&cue).ok_or(VoiceError::CueUnavailable {
            reason: format!("No asset configured for {:?}", cue),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let audio = decode_wav(path).map_err(|e| VoiceError::CueUnavailable {
            reason: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let cursor = OutputCursor::default();
        cursor.playing.store(true, Ordering::Release);

        let stream = play_stream(&self.device, &audio, cursor.clone(), || {})?;
        self.active.push(ActiveCue {
            cursor,
            _stream: stream,
        });

        Ok(())
    }
}
