use crate::{CaptureDevice, CaptureEvent, VoiceError, VoiceResult, audio::encode_wav};

use std::{
    panic::Location,
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use cpal::{
    Device, Stream, StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Buffer length used when the recorder has no maximum duration.
pub(crate) const UNLIMITED_BUFFER: Duration = Duration::from_secs(30 * 60);

/// Headroom on top of the maximum duration, covering the time between the
/// last counter tick and the device actually stopping.
pub(crate) const BUFFER_SLACK: Duration = Duration::from_secs(2);

/// Interleaved samples needed to hold `max_duration` of input.
pub(crate) fn buffer_capacity(sample_rate: u32, channels: u16, max_duration: Option<Duration>) -> usize {
    let length = max_duration.unwrap_or(UNLIMITED_BUFFER) + BUFFER_SLACK;
    let per_second = u64::from(sample_rate) * u64::from(channels.max(1));
    let samples = (length.as_secs_f64() * per_second as f64).ceil();
    samples as usize
}

/// Appends `data` up to `capacity`. Returns `true` when samples had to be
/// dropped. The start of a recording is never overwritten.
pub(crate) fn push_samples(buf: &mut Vec<f32>, data: &[f32], capacity: usize) -> bool {
    let room = capacity.saturating_sub(buf.len());
    let taken = data.len().min(room);
    buf.extend_from_slice(&data[..taken]);
    taken < data.len()
}

/// Encodes `samples` to `path`, removing a partially written file on
/// failure.
#[track_caller]
pub(crate) fn write_clip(path: &Path, samples: &[f32], sample_rate: u32, channels: u16) -> VoiceResult<()> {
    let result = encode_wav(path, samples, sample_rate, channels);

    if result.is_err() && path.exists() {
        match std::fs::remove_file(path) {
            Ok(()) => debug!(path = ?path, "Removed partial recording"),
            Err(e) => warn!(path = ?path, error = %e, "Failed to remove partial recording"),
        }
    }

    result
}

/// Records from the default input device into a WAV file.
pub struct CpalCaptureDevice {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    samples: Arc<Mutex<Vec<f32>>>,
    capacity: usize,
    /// Signals the audio callback to stop writing. Set before the stream
    /// is dropped so no in-flight callback writes after `stop()` drains.
    shutdown: Arc<AtomicBool>,
    output_dir: PathBuf,
    events: mpsc::UnboundedSender<CaptureEvent>,
}

impl CpalCaptureDevice {
    /// Opens the default input device. Recordings are written to
    /// `output_dir`; stream failures are reported on `events`.
    ///
    /// The sample buffer holds `max_duration` at the device's rate and
    /// channel count. When it fills up, [`CaptureEvent::BufferFull`] is sent
    /// and further input is dropped.
    #[track_caller]
    #[instrument(skip(events))]
    pub fn new(
        output_dir: &Path,
        max_duration: Option<Duration>,
        events: mpsc::UnboundedSender<CaptureEvent>,
    ) -> VoiceResult<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or(VoiceError::DeviceUnavailable {
                reason: "No microphone found".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let config = device
            .default_input_config()
            .map_err(|e| VoiceError::DeviceUnavailable {
                reason: format!("Failed to get config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        std::fs::create_dir_all(output_dir).map_err(|e| VoiceError::DeviceUnavailable {
            reason: format!("Failed to create capture dir {:?}: {}", output_dir, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let capacity = buffer_capacity(config.sample_rate(), config.channels(), max_duration);

        info!(
            device_id = ?device.id(),
            sample_rate = config.sample_rate(),
            channels = config.channels(),
            capacity,
            "Capture device initialized"
        );

        Ok(Self {
            device,
            config: config.into(),
            stream: None,
            samples: Arc::new(Mutex::new(Vec::new())),
            capacity,
            shutdown: Arc::new(AtomicBool::new(false)),
            output_dir: output_dir.to_path_buf(),
            events,
        })
    }

    /// Input sample rate.
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    #[track_caller]
    fn drain_samples(&mut self) -> VoiceResult<Vec<f32>> {
        self.shutdown.store(true, Ordering::Release);

        if let Some(stream) = self.stream.take() {
            drop(stream);
            // Lets a callback that raced the flag finish before we drain.
            std::thread::sleep(Duration::from_millis(5));
            debug!("Input stream closed");
        }

        let mut buf = self.samples.lock().map_err(|e| VoiceError::EncodeFailure {
            reason: format!("Failed to lock samples: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Ok(std::mem::take(&mut *buf))
    }
}

impl CaptureDevice for CpalCaptureDevice {
    #[track_caller]
    #[instrument(skip(self))]
    fn start(&mut self) -> VoiceResult<()> {
        let samples = Arc::clone(&self.samples);
        let shutdown = Arc::clone(&self.shutdown);
        let events = self.events.clone();
        let overflow_events = self.events.clone();
        let capacity = self.capacity;
        let mut overflow_reported = false;

        self.shutdown.store(false, Ordering::Release);

        samples
            .lock()
            .map_err(|e| VoiceError::DeviceUnavailable {
                reason: format!("Failed to lock samples: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?
            .clear();

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if shutdown.load(Ordering::Acquire) {
                        return;
                    }
                    // A poisoned buffer still holds valid samples.
                    let mut buf = samples.lock().unwrap_or_else(|e| {
                        error!("Sample buffer lock poisoned, recovering: {}", e);
                        e.into_inner()
                    });
                    if push_samples(&mut buf, data, capacity) && !overflow_reported {
                        overflow_reported = true;
                        warn!(capacity, "Capture buffer full, dropping input");
                        let _ = overflow_events.send(CaptureEvent::BufferFull);
                    }
                },
                move |err| {
                    error!("Audio input stream error: {}", err);
                    let event = match err {
                        cpal::StreamError::DeviceNotAvailable => CaptureEvent::Interrupted,
                        other => CaptureEvent::EncodeFailure {
                            reason: other.to_string(),
                        },
                    };
                    let _ = events.send(event);
                },
                None,
            )
            .map_err(|e| VoiceError::DeviceUnavailable {
                reason: format!("Failed to build stream: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        stream.play().map_err(|e| VoiceError::DeviceUnavailable {
            reason: format!("Failed to start stream: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        self.stream = Some(stream);
        info!("Audio capture started");

        Ok(())
    }

    #[track_caller]
    #[instrument(skip(self))]
    fn stop(&mut self) -> VoiceResult<PathBuf> {
        let samples = self.drain_samples()?;

        if samples.is_empty() {
            return Err(VoiceError::EncodeFailure {
                reason: "No audio captured".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let path = self.output_dir.join(format!("voice-{}.wav", Uuid::new_v4()));
        write_clip(&path, &samples, self.config.sample_rate, self.config.channels)?;

        info!(sample_count = samples.len(), path = ?path, "Audio capture stopped");

        Ok(path)
    }

    #[instrument(skip(self))]
    fn cancel(&mut self) {
        match self.drain_samples() {
            Ok(discarded) => info!(sample_count = discarded.len(), "Audio capture cancelled"),
            Err(e) => warn!(error = %e, "Failed to discard captured audio"),
        }
    }
}
