//! Playback synchronization: media and clock seams, the two sync strategies, and the
//! frame task that polls them.

pub mod audio;
pub mod clock;
pub mod fakes;
pub mod frame_loop;
pub mod media;
pub mod sync;

pub use audio::{AudioScheduler, AudioTrack, DecodedAudio, SourceId, SourcePlan};
pub use clock::{AudioClock, ManualClock};
pub use frame_loop::FrameLoop;
pub use media::{MediaElement, MediaRegistry};
pub use sync::{AudioClockSync, ClockAnchor, EndLatch, MediaSync, PlaybackState, PlaybackTick};
