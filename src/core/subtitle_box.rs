//! Subtitle timing drags and on-canvas subtitle box editing.

use crate::state::{SubtitleBox, TrackWindow};

/// Corner handle of the subtitle box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Part of the subtitle box grabbed by the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoxHandle {
    Body,
    Corner(Corner),
}

/// Shift a subtitle's span by `delta` seconds, kept inside the window.
///
/// Start is clamped to `[window.start, window.end - min_duration]`; the end follows and
/// is pushed out when the span would fall under `min_duration`. A window shorter than
/// `min_duration` caps the minimum at its length.
pub fn drag_subtitle(
    start: f64,
    end: f64,
    delta: f64,
    window: TrackWindow,
    min_duration: f64,
) -> (f64, f64) {
    let min_duration = min_duration.min(window.length());
    let new_start = (start + delta)
        .min(window.end - min_duration)
        .max(window.start);
    let new_end = (end + delta).min(window.end).max(new_start + min_duration);
    (new_start, new_end)
}

pub fn move_box(anchor: SubtitleBox, dx: f64, dy: f64) -> SubtitleBox {
    SubtitleBox {
        x: anchor.x + dx,
        y: anchor.y + dy,
        ..anchor
    }
}

/// Drag one corner; the diagonally opposite corner stays fixed and neither edge can
/// shrink below `min_size`.
pub fn resize_box(anchor: SubtitleBox, corner: Corner, dx: f64, dy: f64, min_size: f64) -> SubtitleBox {
    let mut left = anchor.x;
    let mut top = anchor.y;
    let mut right = anchor.right();
    let mut bottom = anchor.bottom();

    match corner {
        Corner::TopLeft => {
            left = (left + dx).min(right - min_size);
            top = (top + dy).min(bottom - min_size);
        }
        Corner::TopRight => {
            right = (right + dx).max(left + min_size);
            top = (top + dy).min(bottom - min_size);
        }
        Corner::BottomLeft => {
            left = (left + dx).min(right - min_size);
            bottom = (bottom + dy).max(top + min_size);
        }
        Corner::BottomRight => {
            right = (right + dx).max(left + min_size);
            bottom = (bottom + dy).max(top + min_size);
        }
    }

    SubtitleBox {
        x: left,
        y: top,
        width: right - left,
        height: bottom - top,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor() -> SubtitleBox {
        SubtitleBox {
            x: 100.0,
            y: 150.0,
            width: 300.0,
            height: 150.0,
        }
    }

    #[test]
    fn test_drag_past_window_end_keeps_one_second() {
        let window = TrackWindow::new(0.0, 8.0).unwrap();
        assert_eq!(drag_subtitle(2.0, 5.0, 10.0, window, 1.0), (7.0, 8.0));
    }

    #[test]
    fn test_drag_inside_window_is_rigid() {
        let window = TrackWindow::new(0.0, 30.0).unwrap();
        assert_eq!(drag_subtitle(2.0, 5.0, 4.0, window, 1.0), (6.0, 9.0));
        assert_eq!(drag_subtitle(2.0, 5.0, -4.0, window, 1.0), (0.0, 1.0));
    }

    #[test]
    fn test_drag_subtitle_in_short_window_stays_inside() {
        let window = TrackWindow::new(0.0, 0.5).unwrap();
        assert_eq!(drag_subtitle(0.0, 0.4, 0.2, window, 1.0), (0.0, 0.5));
        assert_eq!(drag_subtitle(0.0, 0.4, -0.3, window, 1.0), (0.0, 0.5));
    }

    #[test]
    fn test_move_box() {
        let moved = move_box(anchor(), 10.0, -20.0);
        assert_eq!((moved.x, moved.y, moved.width, moved.height), (110.0, 130.0, 300.0, 150.0));
    }

    #[test]
    fn test_resize_keeps_opposite_corner_fixed() {
        let resized = resize_box(anchor(), Corner::TopLeft, 40.0, 30.0, 50.0);
        assert_eq!(resized.right(), anchor().right());
        assert_eq!(resized.bottom(), anchor().bottom());
        assert_eq!((resized.x, resized.y), (140.0, 180.0));

        let resized = resize_box(anchor(), Corner::BottomRight, 25.0, -10.0, 50.0);
        assert_eq!((resized.x, resized.y), (100.0, 150.0));
        assert_eq!((resized.width, resized.height), (325.0, 140.0));
    }

    #[test]
    fn test_resize_enforces_minimum_size() {
        let resized = resize_box(anchor(), Corner::TopRight, -1000.0, 1000.0, 50.0);
        assert_eq!((resized.width, resized.height), (50.0, 50.0));
        assert_eq!(resized.x, 100.0);
        assert_eq!(resized.bottom(), anchor().bottom());

        let resized = resize_box(anchor(), Corner::BottomLeft, 1000.0, -1000.0, 50.0);
        assert_eq!((resized.width, resized.height), (50.0, 50.0));
        assert_eq!(resized.right(), anchor().right());
        assert_eq!(resized.y, 150.0);
    }
}
