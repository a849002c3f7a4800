use crate::{
    CaptureDevice, CpalCaptureDevice, VoiceError,
    audio::capture::{BUFFER_SLACK, UNLIMITED_BUFFER, buffer_capacity, push_samples, write_clip},
    decode_wav,
};

use std::time::Duration;

use tempfile::TempDir;
use tokio::sync::mpsc;

/// WHAT: Buffer capacity scales with channel count and rate
/// WHY: A stereo or 96 kHz input must still hold the full maximum duration
#[test]
fn given_stereo_and_high_rate_inputs_when_sizing_buffer_then_full_duration_fits() {
    // Given: The default five minute limit
    let max = Some(Duration::from_secs(300));

    // When: Sizing for mono 48k, stereo 48k and stereo 96k
    let mono = buffer_capacity(48_000, 1, max);
    let stereo = buffer_capacity(48_000, 2, max);
    let stereo_96k = buffer_capacity(96_000, 2, max);

    // Then: Every layout holds 300s of interleaved samples, and no more than the slack
    let slack_secs = BUFFER_SLACK.as_secs() as usize;
    assert!(mono >= 48_000 * 300);
    assert!(stereo >= 48_000 * 2 * 300);
    assert!(stereo_96k >= 96_000 * 2 * 300);
    assert_eq!(stereo, 2 * mono);
    assert_eq!(stereo_96k, 96_000 * 2 * (300 + slack_secs));
}

/// WHAT: Unlimited recordings still get a finite buffer
/// WHY: A stream left running must not grow memory without bound
#[test]
fn given_no_max_duration_when_sizing_buffer_then_capacity_is_finite() {
    let capacity = buffer_capacity(48_000, 2, None);

    assert!(capacity >= 48_000 * 2 * 300);
    let secs = (UNLIMITED_BUFFER + BUFFER_SLACK).as_secs() as usize;
    assert_eq!(capacity, 48_000 * 2 * secs);
}

/// WHAT: Stereo recording at the limit keeps its first samples
/// WHY: Overflow must drop the tail, never the start of a voice message
#[test]
fn given_stereo_buffer_near_capacity_when_adding_samples_then_start_kept_and_full_reported() {
    // Given: One second of stereo 48k input, sized for one second plus slack
    let capacity = buffer_capacity(48_000, 2, Some(Duration::from_secs(1)));
    let mut buf: Vec<f32> = Vec::new();
    let first_second: Vec<f32> = (0..96_000).map(|i| if i % 2 == 0 { 0.5 } else { -0.5 }).collect();
    assert!(!push_samples(&mut buf, &first_second, capacity));

    // When: Far more input arrives than the slack allows
    let overflow = vec![0.25f32; capacity];
    let full = push_samples(&mut buf, &overflow, capacity);

    // Then: Full is reported, length is capped, the first second is intact
    assert!(full);
    assert_eq!(buf.len(), capacity);
    assert!((buf[0] - 0.5).abs() < f32::EPSILON);
    assert!((buf[1] + 0.5).abs() < f32::EPSILON);
    assert!(buf[..96_000].iter().zip(&first_second).all(|(a, b)| (a - b).abs() < f32::EPSILON));

    // And: Further input is dropped
    assert!(push_samples(&mut buf, &[0.1, 0.1], capacity));
    assert_eq!(buf.len(), capacity);
}

/// WHAT: A failed encode leaves no partial file behind
/// WHY: The capture dir must only hold playable clips
#[test]
fn given_sample_count_not_matching_channels_when_writing_clip_then_error_and_file_removed() {
    // Given: Three samples for a two channel file, which cannot be finalized
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("voice-partial.wav");

    // When: Writing the clip
    let result = write_clip(&path, &[0.1, 0.2, 0.3], 48_000, 2);

    // Then: Encode failure and nothing left on disk
    assert!(matches!(result, Err(VoiceError::EncodeFailure { .. })));
    assert!(!path.exists());
}

/// WHAT: A successful encode keeps the file
/// WHY: Cleanup only applies to the error branch
#[test]
fn given_valid_samples_when_writing_clip_then_file_kept() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("voice-ok.wav");

    write_clip(&path, &[0.1, 0.2, 0.3, 0.4], 48_000, 2).unwrap();

    assert!(path.exists());
    assert_eq!(decode_wav(&path).unwrap().frames(), 2);
}

/// WHAT: Recording from the real microphone writes a decodable clip
/// WHY: End-to-end check of the cpal capture path
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn given_default_microphone_when_recording_then_wav_written() {
    // Given: A capture device writing into a temp dir
    let dir = TempDir::new().unwrap();
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut device = CpalCaptureDevice::new(dir.path(), Some(Duration::from_secs(300)), tx).unwrap();

    // When: Capturing half a second
    device.start().unwrap();
    std::thread::sleep(Duration::from_millis(500));
    let location = device.stop().unwrap();

    // Then: The file is in the capture dir and decodes at the device rate
    assert!(location.starts_with(dir.path()));
    let decoded = decode_wav(&location).unwrap();
    assert_eq!(decoded.sample_rate, device.sample_rate());
    assert!(decoded.frames() > 0);
}

/// WHAT: Stopping without a started stream is an EncodeFailure
/// WHY: An empty capture must not produce a zero-length clip
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn given_device_never_started_when_stopping_then_encode_failure() {
    let dir = TempDir::new().unwrap();
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut device = CpalCaptureDevice::new(dir.path(), Some(Duration::from_secs(300)), tx).unwrap();

    let result = device.stop();

    assert!(matches!(result, Err(VoiceError::EncodeFailure { .. })));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
