use crate::AppError;

use std::{panic::Location, str::FromStr};

use error_location::ErrorLocation;

/// Commands typed into the terminal host.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Mic button: start, or stop and keep, a recording.
    ToggleRecording,
    /// Full-length swipe over the cancel affordance.
    CancelRecording,
    /// Swipe translation to test against the cancel gesture.
    Swipe {
        /// Horizontal travel in points.
        dx: f32,
        /// Vertical travel in points.
        dy: f32,
    },
    /// Play button on the preview.
    TogglePlayback,
    /// Finger down on the scrub control.
    BeginScrub,
    /// Scrub control moved.
    Seek {
        /// Target position in seconds.
        seconds: f64,
    },
    /// Finger up on the scrub control.
    EndScrub {
        /// Release position in seconds.
        seconds: f64,
    },
    /// Send the previewed clip.
    Send,
    /// Throw the previewed clip away.
    Discard,
    /// Exit the host.
    Quit,
}

impl FromStr for AppCommand {
    type Err = AppError;

    #[track_caller]
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::InvalidCommand {
            input: line.trim().to_string(),
            location: ErrorLocation::from(Location::caller()),
        };

        let mut words = line.split_whitespace();
        let command = words.next().ok_or_else(invalid)?;
        let args: Vec<&str> = words.collect();

        let command = match (command, args.as_slice()) {
            ("r", []) => Self::ToggleRecording,
            ("x", []) => Self::CancelRecording,
            ("swipe", [dx, dy]) => Self::Swipe {
                dx: dx.parse().map_err(|_| invalid())?,
                dy: dy.parse().map_err(|_| invalid())?,
            },
            ("p", []) => Self::TogglePlayback,
            ("scrub", []) => Self::BeginScrub,
            ("seek", [seconds]) => Self::Seek {
                seconds: seconds.parse().map_err(|_| invalid())?,
            },
            ("release", [seconds]) => Self::EndScrub {
                seconds: seconds.parse().map_err(|_| invalid())?,
            },
            ("send", []) => Self::Send,
            ("discard", []) => Self::Discard,
            ("q", []) => Self::Quit,
            _ => return Err(invalid()),
        };

        Ok(command)
    }
}
