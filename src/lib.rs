//! NLA timeline core
//!
//! Timeline coordinate mapping, clip and subtitle editing, drag interaction,
//! and playback synchronization for a browser-style video editor, plus the
//! small HTTP proxy the editor uses to reach remote media.

pub mod config;
pub mod constants;
pub mod core;
pub mod error;
pub mod hotkeys;
pub mod logging;
pub mod proxy;
pub mod state;
pub mod utils;

pub use crate::core::drag::{DragController, DragHandle};
pub use crate::core::mapper::{ContainerRect, Viewport};
pub use crate::error::{PlaybackError, TimelineError, TimelineResult};
pub use crate::state::{Clip, ClipTrack, EditorSession, Subtitle, SubtitleTrack, TimelineSettings, TrackWindow};
