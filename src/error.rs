//! Error types for the timeline core and playback.

use thiserror::Error;
use uuid::Uuid;

/// Validation and lookup failures in the editing model.
///
/// Drag clamping never produces one of these; it corrects silently.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimelineError {
    #[error("invalid range: end {end} must be greater than start {start}")]
    InvalidRange { start: f64, end: f64 },
    #[error("clips {first} and {second} overlap on the same track")]
    OverlappingClips { first: Uuid, second: Uuid },
    #[error("unknown clip {0}")]
    UnknownClip(Uuid),
    #[error("unknown subtitle {0}")]
    UnknownSubtitle(Uuid),
    #[error("a drag session is already in progress")]
    DragInProgress,
    #[error("index {index} out of bounds for {len} items")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Failures reported by audio output backends.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("audio device error: {0}")]
    AudioDevice(String),
    #[error("failed to start audio source: {0}")]
    SourceStart(String),
}

pub type TimelineResult<T> = Result<T, TimelineError>;
