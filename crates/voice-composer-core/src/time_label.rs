//! `minutes:seconds` labels shown next to the record and preview controls.
//!
//! Both labels truncate to whole seconds. A recording that has run for
//! 1.5s reads `0:01`, never `0:02`.

use std::time::Duration;

/// Label for the recording counter. Minutes are unbounded.
pub fn recording_label(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!("{}:{:02}", total / 60, total % 60)
}

/// Label for the preview player.
///
/// Minutes wrap at 60, matching the player display the composer has always
/// shipped with.
pub fn playback_label(time: Duration) -> String {
    let total = time.as_secs();
    format!("{}:{:02}", (total / 60) % 60, total % 60)
}
