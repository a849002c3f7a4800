mod controller;
mod session;

pub use {
    controller::{PRE_ROLL_DELAY, RECORDING_TICK, RecorderSettings, RecordingController},
    session::{RecordingSession, RecordingState},
};

pub(crate) use session::{encode_failure, interrupted};
