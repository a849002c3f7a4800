use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// A finished voice recording.
///
/// Clips are immutable. Every successful recording produces a new clip; the
/// file behind `location` belongs to the host once the clip has been handed
/// over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    location: PathBuf,
    duration: Duration,
}

impl AudioClip {
    /// Creates a clip for a file that has already been written.
    pub fn new(location: impl Into<PathBuf>, duration: Duration) -> Self {
        Self {
            location: location.into(),
            duration,
        }
    }

    /// Opaque file reference produced by the capture device.
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Recorded length.
    pub fn duration(&self) -> Duration {
        self.duration
    }
}
