//! Time ↔ pixel mapping for the timeline viewport.
//!
//! The viewport is centred on the playhead. Every derived quantity is recomputed from
//! `(zoom_level, current_time, duration)` on each call, so nothing here can go stale.

use crate::constants::{OFFSCREEN_PERCENT_MAX, OFFSCREEN_PERCENT_MIN};
use crate::state::TimelineSettings;
use crate::utils::format_clock;

/// Horizontal extent of the timeline container in client pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContainerRect {
    pub left: f64,
    pub width: f64,
}

impl ContainerRect {
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }
}

/// Left edge and width of a span, in percent of the container.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PercentSpan {
    pub left: f64,
    pub width: f64,
}

/// One ruler tick.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeMarker {
    pub time: f64,
    pub percent: f64,
    pub label: String,
}

/// Snapshot of the three inputs the mapping depends on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub zoom_level: f64,
    pub current_time: f64,
    pub duration: f64,
    pub settings: TimelineSettings,
}

impl Viewport {
    pub fn new(settings: TimelineSettings, zoom_level: f64, current_time: f64, duration: f64) -> Self {
        Self {
            zoom_level,
            current_time,
            duration,
            settings,
        }
    }

    /// Linear over the zoom range: the highest zoom shows the fewest seconds per grid.
    pub fn seconds_per_grid(&self) -> f64 {
        let s = &self.settings;
        let zoom = s.clamp_zoom(self.zoom_level);
        let range = (s.zoom_max - s.zoom_min).max(f64::EPSILON);
        s.min_seconds_per_grid
            + (s.max_seconds_per_grid - s.min_seconds_per_grid) * (s.zoom_max - zoom) / range
    }

    pub fn pixels_per_second(&self) -> f64 {
        self.settings.grid_pixel_width / self.seconds_per_grid()
    }

    pub fn visible_duration(&self) -> f64 {
        self.seconds_per_grid() * self.settings.visible_grid_count
    }

    /// Timeline time at the left edge of the viewport; never before 0.
    pub fn scroll_offset(&self) -> f64 {
        (self.current_time - self.visible_duration() / 2.0).max(0.0)
    }

    pub fn time_to_percent(&self, time: f64) -> f64 {
        let visible = self.visible_duration();
        if visible <= 0.0 {
            return 0.0;
        }
        (time - self.scroll_offset()) / visible * 100.0
    }

    pub fn is_on_screen(&self, time: f64) -> bool {
        let percent = self.time_to_percent(time);
        (OFFSCREEN_PERCENT_MIN..=OFFSCREEN_PERCENT_MAX).contains(&percent)
    }

    /// Client x coordinate → timeline time, clamped to `[0, duration]`.
    pub fn pixel_to_time(&self, client_x: f64, rect: ContainerRect) -> f64 {
        if rect.width <= 0.0 {
            return 0.0;
        }
        let position = (client_x - rect.left) / rect.width;
        let time = self.scroll_offset() + position * self.visible_duration();
        time.max(0.0).min(self.duration.max(0.0))
    }

    pub fn time_to_pixel(&self, time: f64, rect: ContainerRect) -> f64 {
        rect.left + self.time_to_percent(time) / 100.0 * rect.width
    }

    /// Pointer delta in pixels → time delta in seconds at the current zoom.
    pub fn seconds_for_pixels(&self, delta_px: f64, rect: ContainerRect) -> f64 {
        if rect.width <= 0.0 {
            return 0.0;
        }
        delta_px / rect.width * self.visible_duration()
    }

    /// Span of `[offset, offset + duration)` in percent, or `None` when fully off-screen.
    pub fn span_percent(&self, offset: f64, duration: f64) -> Option<PercentSpan> {
        let visible = self.visible_duration();
        if visible <= 0.0 {
            return None;
        }
        let left = self.time_to_percent(offset);
        let width = duration / visible * 100.0;
        if left > -width && left < 100.0 + width {
            Some(PercentSpan { left, width })
        } else {
            None
        }
    }

    /// Ruler ticks covering the visible window, one per grid.
    pub fn time_markers(&self) -> Vec<TimeMarker> {
        let step = self.seconds_per_grid();
        let scroll = self.scroll_offset();
        let end = scroll + self.visible_duration();
        let first = (scroll / step).floor() as i64;
        let mut markers = Vec::new();
        let mut index = first;
        loop {
            let time = index as f64 * step;
            if time > end + 1e-9 {
                break;
            }
            let percent = self.time_to_percent(time);
            if (OFFSCREEN_PERCENT_MIN..=OFFSCREEN_PERCENT_MAX).contains(&percent) {
                markers.push(TimeMarker {
                    time,
                    percent,
                    label: format_clock(time),
                });
            }
            index += 1;
        }
        markers
    }
}
