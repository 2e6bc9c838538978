//! Thumbnail strip timing and stale-seek protection for frame extraction.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::constants::{
    CLIP_THUMB_COUNT_MAX, CLIP_THUMB_COUNT_MIN, TIMELINE_THUMB_COUNT_MAX, TIMELINE_THUMB_COUNT_MIN,
};

/// Evenly spaced capture times: one per grid, clamped to `[min_count, max_count]` frames.
pub fn thumbnail_times(
    duration: f64,
    seconds_per_grid: f64,
    min_count: usize,
    max_count: usize,
) -> Vec<f64> {
    if duration <= 0.0 || seconds_per_grid <= 0.0 {
        return Vec::new();
    }
    let per_grid = (duration / seconds_per_grid).floor() as usize;
    let count = per_grid.clamp(min_count, max_count.max(min_count)).max(1);
    let step = duration / count as f64;
    (0..count).map(|i| step * i as f64).collect()
}

/// Capture times for the strip under the whole timeline.
pub fn timeline_thumbnail_times(duration: f64, seconds_per_grid: f64) -> Vec<f64> {
    thumbnail_times(
        duration,
        seconds_per_grid,
        TIMELINE_THUMB_COUNT_MIN,
        TIMELINE_THUMB_COUNT_MAX,
    )
}

/// Capture times for the strip drawn inside one clip.
pub fn clip_thumbnail_times(clip_duration: f64, seconds_per_grid: f64) -> Vec<f64> {
    thumbnail_times(
        clip_duration,
        seconds_per_grid,
        CLIP_THUMB_COUNT_MIN,
        CLIP_THUMB_COUNT_MAX,
    )
}

/// Indices of `visible` frames spread evenly over `total` cached frames.
pub fn sample_frames(total: usize, visible: usize) -> Vec<usize> {
    if total == 0 || visible == 0 {
        return Vec::new();
    }
    let step = total as f64 / visible as f64;
    (1..=visible)
        .map(|i| ((i as f64 * step).floor() as usize).saturating_sub(1).min(total - 1))
        .collect()
}

/// Identifies one seek request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeekToken(u64);

/// Hands out increasing seek tokens; only the newest one may complete.
#[derive(Debug, Default)]
pub struct SeekTracker {
    latest: AtomicU64,
}

impl SeekTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> SeekToken {
        SeekToken(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn is_current(&self, token: SeekToken) -> bool {
        self.latest.load(Ordering::Acquire) == token.0
    }

    /// Pass `value` through only when `token` has not been superseded.
    pub fn complete<T>(&self, token: SeekToken, value: T) -> Option<T> {
        if self.is_current(token) {
            Some(value)
        } else {
            tracing::debug!(token = token.0, "discarding stale seek completion");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_thumbnail_count_is_clamped() {
        assert_eq!(timeline_thumbnail_times(10.0, 1.0).len(), 20);
        assert_eq!(timeline_thumbnail_times(300.0, 1.0).len(), 50);
        assert_eq!(timeline_thumbnail_times(35.0, 1.0).len(), 35);
        assert_eq!(clip_thumbnail_times(4.0, 1.0).len(), 10);
        assert_eq!(clip_thumbnail_times(100.0, 0.5).len(), 20);
    }

    #[test]
    fn test_thumbnail_times_are_even() {
        let times = clip_thumbnail_times(5.0, 1.0);
        assert_eq!(times.len(), 10);
        assert_eq!(times[0], 0.0);
        assert_relative_eq!(times[9], 4.5);
        assert!(thumbnail_times(0.0, 1.0, 10, 20).is_empty());
    }

    #[test]
    fn test_sample_frames() {
        assert_eq!(sample_frames(100, 4), vec![24, 49, 74, 99]);
        assert_eq!(sample_frames(3, 6), vec![0, 0, 0, 1, 1, 2]);
        assert!(sample_frames(0, 4).is_empty());
    }

    #[test]
    fn test_stale_seek_completion_is_discarded() {
        let tracker = SeekTracker::new();
        let first = tracker.issue();
        let second = tracker.issue();
        assert!(second > first);
        assert_eq!(tracker.complete(first, "old frame"), None);
        assert_eq!(tracker.complete(second, "new frame"), Some("new frame"));
    }
}
