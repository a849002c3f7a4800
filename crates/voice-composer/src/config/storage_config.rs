use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where recordings are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Capture directory (None = platform cache dir).
    #[serde(default)]
    pub capture_dir: Option<PathBuf>,
}
