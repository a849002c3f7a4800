pub(crate) mod capture;
mod cue;
mod output;
mod playback;
mod wav;

pub(crate) use output::{OutputCursor, default_output_device, play_stream};

pub use {
    capture::CpalCaptureDevice,
    cue::CpalCuePlayer,
    playback::CpalPlaybackEngine,
    wav::{DecodedAudio, decode_wav, encode_wav},
};
