use crate::config::{
    DEFAULT_MAX_DURATION_SECS, default_cancel_swipe_distance, default_max_duration_secs,
    default_swipe_affordance_width,
};

use std::time::Duration;

use serde::{Deserialize, Serialize};
use voice_composer_core::{
    CancelGesture, DEFAULT_AFFORDANCE_WIDTH, DEFAULT_CANCEL_DISTANCE, RecorderSettings,
    SwipeDirection,
};

/// Direction of the cancel swipe as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CancelDirection {
    /// Swipe towards the left edge.
    #[default]
    Left,
    /// Swipe towards the right edge.
    Right,
    /// Swipe upwards.
    Up,
    /// Swipe downwards.
    Down,
}

impl From<CancelDirection> for SwipeDirection {
    fn from(direction: CancelDirection) -> Self {
        match direction {
            CancelDirection::Left => SwipeDirection::Left,
            CancelDirection::Right => SwipeDirection::Right,
            CancelDirection::Up => SwipeDirection::Up,
            CancelDirection::Down => SwipeDirection::Down,
        }
    }
}

/// Recording behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingConfig {
    /// Recordings stop on their own after this many seconds. 0 disables
    /// the limit.
    #[serde(default = "default_max_duration_secs")]
    pub max_duration_secs: u64,

    /// Minimum swipe travel, in points, that cancels a recording.
    #[serde(default = "default_cancel_swipe_distance")]
    pub cancel_swipe_distance: f32,

    /// Direction the cancel swipe has to travel.
    #[serde(default)]
    pub cancel_swipe_direction: CancelDirection,

    /// Width of the "swipe to cancel" affordance, in points. Caps the
    /// cancel distance; 0 leaves it uncapped.
    #[serde(default = "default_swipe_affordance_width")]
    pub swipe_affordance_width: f32,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            max_duration_secs: DEFAULT_MAX_DURATION_SECS,
            cancel_swipe_distance: DEFAULT_CANCEL_DISTANCE,
            cancel_swipe_direction: CancelDirection::default(),
            swipe_affordance_width: DEFAULT_AFFORDANCE_WIDTH,
        }
    }
}

impl RecordingConfig {
    /// Settings for the recording controller.
    pub fn recorder_settings(&self) -> RecorderSettings {
        let max_duration = match self.max_duration_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        RecorderSettings {
            max_duration,
            cancel_gesture: CancelGesture::new(
                self.cancel_swipe_direction.into(),
                self.cancel_swipe_distance,
                self.swipe_affordance_width,
            ),
        }
    }
}
