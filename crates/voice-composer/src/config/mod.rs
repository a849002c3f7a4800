mod recording_config;
mod sounds_config;
mod storage_config;
#[allow(clippy::module_inception)]
mod config;

pub(crate) use {
    config::Config,
    recording_config::{CancelDirection, RecordingConfig},
    sounds_config::SoundsConfig,
    storage_config::StorageConfig,
};

use voice_composer_core::{DEFAULT_AFFORDANCE_WIDTH, DEFAULT_CANCEL_DISTANCE};

pub(crate) const DEFAULT_MAX_DURATION_SECS: u64 = 300;
pub(crate) const QUALIFIER: &str = "com";
pub(crate) const ORGANIZATION: &str = "voice-composer";
pub(crate) const APPLICATION: &str = "Voice-Composer";

pub(crate) fn default_max_duration_secs() -> u64 {
    DEFAULT_MAX_DURATION_SECS
}

pub(crate) fn default_cancel_swipe_distance() -> f32 {
    DEFAULT_CANCEL_DISTANCE
}

pub(crate) fn default_swipe_affordance_width() -> f32 {
    DEFAULT_AFFORDANCE_WIDTH
}
