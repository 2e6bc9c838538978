use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_TRACK_WINDOW_SECONDS, GRID_PIXEL_WIDTH, MAX_SECONDS_PER_GRID,
    MEDIA_RESYNC_TOLERANCE_SECONDS, MIN_CLIP_DURATION_SECONDS, MIN_SECONDS_PER_GRID,
    MIN_SUBTITLE_BOX_PX, MIN_SUBTITLE_DURATION_SECONDS, NEW_SUBTITLE_SPAN_SECONDS,
    REORDER_GAP_PX, SKIP_STEP_SECONDS, TRACK_EPSILON_SECONDS, VISIBLE_GRID_COUNT,
    ZOOM_LEVEL_MAX, ZOOM_LEVEL_MIN,
};

/// Timeline-level settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineSettings {
    /// Width of one ruler grid cell in pixels
    pub grid_pixel_width: f64,
    /// Number of grid cells visible at once
    pub visible_grid_count: f64,
    /// Seconds per grid at the highest zoom level
    pub min_seconds_per_grid: f64,
    /// Seconds per grid at the lowest zoom level
    pub max_seconds_per_grid: f64,
    pub zoom_min: f64,
    pub zoom_max: f64,
    /// Minimum gap between track window start and end, in seconds
    pub track_epsilon: f64,
    pub min_clip_duration: f64,
    pub min_subtitle_duration: f64,
    /// Length of a subtitle created by the add action
    pub new_subtitle_span: f64,
    /// Gap left between clips after a reorder, in pixels
    pub reorder_gap_px: f64,
    /// Minimum subtitle box edge in pixels
    pub min_box_size: f64,
    /// Track window length applied when media first loads
    pub default_window_seconds: f64,
    pub skip_step: f64,
    pub resync_tolerance: f64,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            grid_pixel_width: GRID_PIXEL_WIDTH,
            visible_grid_count: VISIBLE_GRID_COUNT,
            min_seconds_per_grid: MIN_SECONDS_PER_GRID,
            max_seconds_per_grid: MAX_SECONDS_PER_GRID,
            zoom_min: ZOOM_LEVEL_MIN,
            zoom_max: ZOOM_LEVEL_MAX,
            track_epsilon: TRACK_EPSILON_SECONDS,
            min_clip_duration: MIN_CLIP_DURATION_SECONDS,
            min_subtitle_duration: MIN_SUBTITLE_DURATION_SECONDS,
            new_subtitle_span: NEW_SUBTITLE_SPAN_SECONDS,
            reorder_gap_px: REORDER_GAP_PX,
            min_box_size: MIN_SUBTITLE_BOX_PX,
            default_window_seconds: DEFAULT_TRACK_WINDOW_SECONDS,
            skip_step: SKIP_STEP_SECONDS,
            resync_tolerance: MEDIA_RESYNC_TOLERANCE_SECONDS,
        }
    }
}

impl TimelineSettings {
    /// Clamp a zoom value into the configured range.
    pub fn clamp_zoom(&self, zoom_level: f64) -> f64 {
        zoom_level.clamp(self.zoom_min, self.zoom_max)
    }
}
