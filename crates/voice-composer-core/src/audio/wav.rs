use crate::{VoiceError, VoiceResult};

use std::{panic::Location, path::Path, sync::Arc, time::Duration};

use error_location::ErrorLocation;
use tracing::{debug, instrument};

/// Interleaved PCM decoded from a WAV file.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Interleaved samples in `[-1.0, 1.0]`.
    pub samples: Arc<Vec<f32>>,
    /// Frames per second.
    pub sample_rate: u32,
    /// Interleaved channel count.
    pub channels: u16,
}

impl DecodedAudio {
    /// Number of frames.
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.samples.len() / usize::from(self.channels)
    }

    /// Playing time.
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.frames() as f64 / f64::from(self.sample_rate))
    }
}

/// Reads a WAV file, integer or float.
#[track_caller]
#[instrument]
pub fn decode_wav(path: &Path) -> VoiceResult<DecodedAudio> {
    let decode_error = |reason: String| VoiceError::DecodeError {
        path: path.to_path_buf(),
        reason,
        location: ErrorLocation::from(Location::caller()),
    };

    let reader = hound::WavReader::open(path).map_err(|e| decode_error(format!("Failed to open: {}", e)))?;

    let spec = reader.spec();
    if spec.channels == 0 || spec.sample_rate == 0 {
        return Err(decode_error(format!(
            "Unsupported format: {} channels at {} Hz",
            spec.channels, spec.sample_rate
        )));
    }

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| decode_error(format!("Failed to read float samples: {}", e)))?,
        hound::SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample.clamp(1, 32) - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| decode_error(format!("Failed to read int samples: {}", e)))?
        }
    };

    debug!(
        sample_count = samples.len(),
        sample_rate = spec.sample_rate,
        channels = spec.channels,
        "WAV decoded"
    );

    Ok(DecodedAudio {
        samples: Arc::new(samples),
        sample_rate: spec.sample_rate,
        channels: spec.channels,
    })
}

/// Writes interleaved samples as 16-bit PCM.
#[track_caller]
#[instrument(skip(samples))]
pub fn encode_wav(path: &Path, samples: &[f32], sample_rate: u32, channels: u16) -> VoiceResult<()> {
    let encode_error = |reason: String| VoiceError::EncodeFailure {
        reason,
        location: ErrorLocation::from(Location::caller()),
    };

    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer =
        hound::WavWriter::create(path, spec).map_err(|e| encode_error(format!("Failed to create file: {}", e)))?;

    for &sample in samples {
        let int_sample = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
        writer
            .write_sample(int_sample)
            .map_err(|e| encode_error(format!("Failed to write sample: {}", e)))?;
    }

    writer
        .finalize()
        .map_err(|e| encode_error(format!("Failed to finalize file: {}", e)))?;

    debug!(sample_count = samples.len(), "WAV written");

    Ok(())
}
