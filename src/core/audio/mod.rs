//! Audio output backends for clock-driven playback.

#[cfg(feature = "audio-device")]
pub mod device;
