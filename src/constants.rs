//! Shared timeline constants.
//! These are the reference values behind `TimelineSettings::default()`.

/// Width in pixels of one ruler grid cell.
pub const GRID_PIXEL_WIDTH: f64 = 40.0;
/// Number of grid cells visible in the timeline viewport.
pub const VISIBLE_GRID_COUNT: f64 = 10.0;

pub const MIN_SECONDS_PER_GRID: f64 = 0.5;
pub const MAX_SECONDS_PER_GRID: f64 = 10.0;

pub const ZOOM_LEVEL_MIN: f64 = 1.0;
pub const ZOOM_LEVEL_MAX: f64 = 50.0;
pub const DEFAULT_ZOOM_LEVEL: f64 = 50.0;

/// Minimum distance kept between the track window's start and end handles.
pub const TRACK_EPSILON_SECONDS: f64 = 0.1;
pub const MIN_CLIP_DURATION_SECONDS: f64 = 0.1;
pub const MIN_SUBTITLE_DURATION_SECONDS: f64 = 1.0;
pub const NEW_SUBTITLE_SPAN_SECONDS: f64 = 3.0;

/// Gap left between clips after a reorder relayout, in screen pixels.
pub const REORDER_GAP_PX: f64 = 2.0;

pub const MIN_SUBTITLE_BOX_PX: f64 = 50.0;

pub const DEFAULT_TRACK_WINDOW_SECONDS: f64 = 30.0;
pub const SKIP_STEP_SECONDS: f64 = 5.0;

/// Media elements further than this from their target position get re-seeked.
pub const MEDIA_RESYNC_TOLERANCE_SECONDS: f64 = 0.1;

/// Percent range outside of which ruler ticks and clips are not drawn.
pub const OFFSCREEN_PERCENT_MIN: f64 = -5.0;
pub const OFFSCREEN_PERCENT_MAX: f64 = 105.0;

pub const FRAME_INTERVAL_MS: u64 = 16;

pub const TIMELINE_THUMB_COUNT_MIN: usize = 20;
pub const TIMELINE_THUMB_COUNT_MAX: usize = 50;
pub const CLIP_THUMB_COUNT_MIN: usize = 10;
pub const CLIP_THUMB_COUNT_MAX: usize = 20;
