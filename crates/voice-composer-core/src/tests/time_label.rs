use crate::time_label::{playback_label, recording_label};

use std::time::Duration;

/// WHAT: Recording label truncates at second boundaries
/// WHY: Display parity with the shipped composer (no rounding)
#[test]
fn given_fractional_seconds_when_formatting_recording_label_then_truncated() {
    assert_eq!(recording_label(Duration::ZERO), "0:00");
    assert_eq!(recording_label(Duration::from_millis(500)), "0:00");
    assert_eq!(recording_label(Duration::from_millis(999)), "0:00");
    assert_eq!(recording_label(Duration::from_millis(1000)), "0:01");
    assert_eq!(recording_label(Duration::from_millis(1500)), "0:01");
    assert_eq!(recording_label(Duration::from_millis(59_500)), "0:59");
    assert_eq!(recording_label(Duration::from_secs(60)), "1:00");
}

/// WHAT: Recording label minutes are unbounded
/// WHY: Long recordings must not wrap back to 0
#[test]
fn given_over_an_hour_when_formatting_recording_label_then_minutes_grow() {
    assert_eq!(recording_label(Duration::from_secs(3_725)), "62:05");
}

/// WHAT: Playback label wraps minutes at an hour
/// WHY: Matches the preview display exactly
#[test]
fn given_over_an_hour_when_formatting_playback_label_then_minutes_wrap() {
    assert_eq!(playback_label(Duration::from_millis(42_900)), "0:42");
    assert_eq!(playback_label(Duration::from_secs(3_725)), "2:05");
}
