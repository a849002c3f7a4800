mod controller;
mod session;

pub use {
    controller::{PLAYBACK_TICK, PlaybackController},
    session::{PlaybackSession, PlaybackState},
};
