use crate::{DecodedAudio, VoiceError, decode_wav, encode_wav};

use std::{sync::Arc, time::Duration};

use tempfile::TempDir;

/// WHAT: A written clip decodes to the same shape and close values
/// WHY: Recordings must survive the trip to disk for preview
#[test]
fn given_one_second_tone_when_written_and_read_then_length_and_values_kept() {
    // Given: One second of a 16 kHz mono ramp
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tone.wav");
    let samples: Vec<f32> = (0..16_000).map(|i| (i as f32 / 16_000.0) - 0.5).collect();

    // When: Encoding then decoding
    encode_wav(&path, &samples, 16_000, 1).unwrap();
    let decoded = decode_wav(&path).unwrap();

    // Then: Same rate, channels, length; values within 16-bit quantisation
    assert_eq!(decoded.sample_rate, 16_000);
    assert_eq!(decoded.channels, 1);
    assert_eq!(decoded.frames(), 16_000);
    assert_eq!(decoded.duration(), Duration::from_secs(1));
    let max_error = samples
        .iter()
        .zip(decoded.samples.iter())
        .map(|(a, b)| (a - b).abs())
        .fold(0.0f32, f32::max);
    assert!(max_error < 1e-3, "max error was {}", max_error);
}

/// WHAT: Out-of-range samples are clipped, not wrapped
/// WHY: A loud input must not turn into full-scale noise of the opposite sign
#[test]
fn given_samples_beyond_full_scale_when_encoded_then_clipped() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("loud.wav");

    encode_wav(&path, &[2.0, -2.0], 8_000, 1).unwrap();
    let decoded = decode_wav(&path).unwrap();

    assert!(decoded.samples[0] > 0.99);
    assert!(decoded.samples[1] < -0.99);
}

/// WHAT: A missing file is a DecodeError naming the path
/// WHY: Load failures surface to the host with enough context to log
#[test]
fn given_missing_file_when_decoding_then_decode_error() {
    // Given: A path that does not exist
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.wav");

    // When: Decoding
    let result = decode_wav(&path);

    // Then: DecodeError carrying that path
    match result {
        Err(VoiceError::DecodeError { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected DecodeError, got {:?}", other),
    }
}

/// WHAT: A file that is not a WAV is a DecodeError
/// WHY: Corrupt captures must not reach the playback engine
#[test]
fn given_text_file_when_decoding_then_decode_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.wav");
    std::fs::write(&path, b"not audio").unwrap();

    let result = decode_wav(&path);

    assert!(matches!(result, Err(VoiceError::DecodeError { .. })));
}

/// WHAT: Writing into a missing directory is an EncodeFailure
/// WHY: Capture reports storage problems as encode failures
#[test]
fn given_missing_directory_when_encoding_then_encode_failure() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope").join("clip.wav");

    let result = encode_wav(&path, &[0.0; 10], 16_000, 1);

    assert!(matches!(result, Err(VoiceError::EncodeFailure { .. })));
}

/// WHAT: Frames and duration account for interleaved channels
/// WHY: Stereo cue assets must report their real length
#[test]
fn given_stereo_audio_when_measuring_then_frames_halve_sample_count() {
    let audio = DecodedAudio {
        samples: Arc::new(vec![0.0; 96_000]),
        sample_rate: 48_000,
        channels: 2,
    };

    assert_eq!(audio.frames(), 48_000);
    assert_eq!(audio.duration(), Duration::from_secs(1));
}
