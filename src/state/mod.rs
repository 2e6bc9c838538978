//! State management module
//!
//! This module contains the data structures the editing core works on:
//! - Clip / ClipTrack: trimmed media references placed on the single video track
//! - Subtitle / SubtitleTrack / SubtitleBox: timed text and where it is drawn
//! - TrackWindow: the selected preview/export range
//! - TimelineSettings: geometry and clamp constants
//! - EditorSession: everything above plus the current time and the active drag

mod clip;
mod session;
mod settings;
mod subtitle;
mod track;

pub use clip::*;
pub use session::*;
pub use settings::*;
pub use subtitle::*;
pub use track::*;
