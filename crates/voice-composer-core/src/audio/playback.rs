use crate::{
    EngineEvent, PlaybackEngine, VoiceResult,
    audio::{DecodedAudio, OutputCursor, decode_wav, default_output_device, play_stream},
};

use std::{
    path::Path,
    sync::atomic::Ordering,
    time::Duration,
};

use cpal::{Device, Stream, traits::DeviceTrait};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

struct LoadedTrack {
    audio: DecodedAudio,
    cursor: OutputCursor,
    _stream: Stream,
}

/// Plays WAV clips on the default output device.
///
/// The output stream is opened on `load` and runs for as long as the clip
/// is loaded; pausing only gates the callback.
pub struct CpalPlaybackEngine {
    device: Device,
    track: Option<LoadedTrack>,
    events: mpsc::UnboundedSender<EngineEvent>,
}

impl CpalPlaybackEngine {
    /// Opens the default output device. End-of-clip is reported on `events`.
    #[track_caller]
    #[instrument(skip(events))]
    pub fn new(events: mpsc::UnboundedSender<EngineEvent>) -> VoiceResult<Self> {
        let device = default_output_device()?;
        info!(device_id = ?device.id(), "Playback engine initialized");

        Ok(Self {
            device,
            track: None,
            events,
        })
    }
}

impl PlaybackEngine for CpalPlaybackEngine {
    #[instrument(skip(self))]
    fn load(&mut self, location: &Path) -> VoiceResult<Duration> {
        self.track = None;

        let audio = decode_wav(location)?;
        let cursor = OutputCursor::default();
        let events = self.events.clone();
        let stream = play_stream(&self.device, &audio, cursor.clone(), move || {
            let _ = events.send(EngineEvent::Finished);
        })?;

        let duration = audio.duration();
        self.track = Some(LoadedTrack {
            audio,
            cursor,
            _stream: stream,
        });

        Ok(duration)
    }

    fn play(&mut self) {
        if let Some(track) = &self.track {
            if track.cursor.position.load(Ordering::Acquire) >= track.audio.samples.len() {
                track.cursor.position.store(0, Ordering::Release);
            }
            track.cursor.finished.store(false, Ordering::Release);
            track.cursor.playing.store(true, Ordering::Release);
        }
    }

    fn pause(&mut self) {
        if let Some(track) = &self.track {
            track.cursor.playing.store(false, Ordering::Release);
        }
    }

    fn stop(&mut self) {
        if self.track.take().is_some() {
            debug!("Playback stream released");
        }
    }

    fn is_playing(&self) -> bool {
        self.track
            .as_ref()
            .is_some_and(|track| track.cursor.playing.load(Ordering::Acquire))
    }

    fn current_time(&self) -> Duration {
        let Some(track) = &self.track else {
            return Duration::ZERO;
        };

        let frame_len = usize::from(track.audio.channels.max(1));
        let frames = track.cursor.position.load(Ordering::Acquire) / frame_len;
        Duration::from_secs_f64(frames as f64 / f64::from(track.audio.sample_rate.max(1)))
    }

    fn set_current_time(&mut self, time: Duration) {
        let Some(track) = &self.track else {
            return;
        };

        let frame_len = usize::from(track.audio.channels.max(1));
        let frame = (time.as_secs_f64() * f64::from(track.audio.sample_rate)) as usize;
        let position = (frame * frame_len).min(track.audio.samples.len());
        track.cursor.position.store(position, Ordering::Release);
        track.cursor.finished.store(false, Ordering::Release);
    }
}
