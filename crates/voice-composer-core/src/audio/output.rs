use crate::{VoiceError, VoiceResult, audio::DecodedAudio};

use std::{
    panic::Location,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use cpal::{
    BufferSize, Device, Stream, StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use tracing::error;

/// Shared between an output stream callback and its owner.
///
/// `cursor` counts interleaved samples already written to the device.
#[derive(Debug, Clone, Default)]
pub(crate) struct OutputCursor {
    pub(crate) position: Arc<AtomicUsize>,
    pub(crate) playing: Arc<AtomicBool>,
    pub(crate) finished: Arc<AtomicBool>,
}

#[track_caller]
pub(crate) fn default_output_device() -> VoiceResult<Device> {
    cpal::default_host()
        .default_output_device()
        .ok_or(VoiceError::DeviceUnavailable {
            reason: "No output device found".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
}

/// Builds and starts an output stream that plays `audio` from `cursor`
/// while `cursor.playing` is set, and writes silence otherwise.
///
/// Reaching the end clears `playing`, sets `finished` and calls `on_end`
/// from the audio thread.
#[track_caller]
pub(crate) fn play_stream<F>(
    device: &Device,
    audio: &DecodedAudio,
    cursor: OutputCursor,
    on_end: F,
) -> VoiceResult<Stream>
where
    F: Fn() + Send + 'static,
{
    let config = StreamConfig {
        channels: audio.channels,
        sample_rate: audio.sample_rate,
        buffer_size: BufferSize::Default,
    };

    let samples = Arc::clone(&audio.samples);

    let stream = device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                if !cursor.playing.load(Ordering::Acquire) {
                    data.fill(0.0);
                    return;
                }

                let start = cursor.position.load(Ordering::Acquire).min(samples.len());
                let end = (start + data.len()).min(samples.len());
                let written = end - start;

                data[..written].copy_from_slice(&samples[start..end]);
                data[written..].fill(0.0);
                cursor.position.store(end, Ordering::Release);

                if end == samples.len() {
                    cursor.playing.store(false, Ordering::Release);
                    if !cursor.finished.swap(true, Ordering::AcqRel) {
                        on_end();
                    }
                }
            },
            |err| {
                error!("Audio output stream error: {}", err);
            },
            None,
        )
        .map_err(|e| VoiceError::DeviceUnavailable {
            reason: format!("Failed to build output stream: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    stream.play().map_err(|e| VoiceError::DeviceUnavailable {
        reason: format!("Failed to start output stream: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    Ok(stream)
}
