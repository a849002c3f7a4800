use std::{collections::HashMap, path::PathBuf};

use serde::{Deserialize, Serialize};
use voice_composer_core::CueSound;

/// Cue sound assets. A missing entry plays nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoundsConfig {
    /// WAV played when a recording is requested.
    #[serde(default)]
    pub start: Option<PathBuf>,
    /// WAV played when a recording is cancelled.
    #[serde(default)]
    pub cancel: Option<PathBuf>,
    /// WAV played when a recording finishes.
    #[serde(default)]
    pub success: Option<PathBuf>,
}

impl SoundsConfig {
    /// Configured assets keyed by cue.
    pub fn cue_assets(&self) -> HashMap<CueSound, PathBuf> {
        [
            (CueSound::Start, &self.start),
            (CueSound::Cancel, &self.cancel),
            (CueSound::Success, &self.success),
        ]
        .into_iter()
        .filter_map(|(cue, path)| path.clone().map(|p| (cue, p)))
        .collect()
    }
}
