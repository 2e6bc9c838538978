//! Core editing logic: coordinate mapping, clip and subtitle geometry, drag
//! interaction, playback synchronization, and preview helpers.

pub mod audio;
pub mod clip_ops;
pub mod drag;
pub mod mapper;
pub mod playback;
pub mod preview;
pub mod subtitle_box;
pub mod thumbnails;
