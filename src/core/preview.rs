//! Preview canvas helpers: cover-fit cropping and subtitle line wrapping.

/// Region of the source frame to draw, in source pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourceRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Centre-crop of a `video` frame that fills `canvas` without letterboxing.
///
/// A zero video dimension falls back to the canvas dimension (metadata not loaded yet).
pub fn cover_fit(canvas: (f64, f64), video: (f64, f64)) -> SourceRect {
    let (canvas_w, canvas_h) = canvas;
    let video_w = if video.0 > 0.0 { video.0 } else { canvas_w };
    let video_h = if video.1 > 0.0 { video.1 } else { canvas_h };
    if canvas_w <= 0.0 || canvas_h <= 0.0 || video_w <= 0.0 || video_h <= 0.0 {
        return SourceRect {
            x: 0.0,
            y: 0.0,
            width: video_w.max(0.0),
            height: video_h.max(0.0),
        };
    }

    let scale = (canvas_w / video_w).max(canvas_h / video_h);
    let width = canvas_w / scale;
    let height = canvas_h / scale;
    SourceRect {
        x: ((video_w - width) / 2.0).max(0.0),
        y: ((video_h - height) / 2.0).max(0.0),
        width,
        height,
    }
}

/// Break `text` into lines no wider than `max_width`, one character at a time.
///
/// Character granularity keeps CJK text (no spaces) wrapping. A single character wider
/// than `max_width` still gets its own line.
pub fn wrap_text<F>(text: &str, max_width: f64, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f64,
{
    let mut lines = Vec::new();
    let mut line = String::new();
    for (index, ch) in text.chars().enumerate() {
        let mut candidate = line.clone();
        candidate.push(ch);
        if index > 0 && measure(&candidate) > max_width {
            lines.push(std::mem::take(&mut line));
            line.push(ch);
        } else {
            line = candidate;
        }
    }
    lines.push(line);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn monospace(s: &str) -> f64 {
        s.chars().count() as f64 * 10.0
    }

    #[test]
    fn test_cover_fit_crops_wide_video() {
        let rect = cover_fit((640.0, 360.0), (1920.0, 800.0));
        assert_relative_eq!(rect.height, 800.0);
        assert_relative_eq!(rect.width, 800.0 * 640.0 / 360.0, max_relative = 1e-12);
        assert_relative_eq!(rect.x, (1920.0 - rect.width) / 2.0, max_relative = 1e-12);
        assert_eq!(rect.y, 0.0);
    }

    #[test]
    fn test_cover_fit_without_metadata_uses_canvas() {
        let rect = cover_fit((640.0, 360.0), (0.0, 0.0));
        assert_eq!(
            rect,
            SourceRect {
                x: 0.0,
                y: 0.0,
                width: 640.0,
                height: 360.0
            }
        );
    }

    #[test]
    fn test_wrap_text_by_character() {
        assert_eq!(wrap_text("abcdefg", 30.0, monospace), vec!["abc", "def", "g"]);
        assert_eq!(wrap_text("", 30.0, monospace), vec![""]);
        assert_eq!(wrap_text("字幕测试", 20.0, monospace), vec!["字幕", "测试"]);
    }

    #[test]
    fn test_wrap_text_narrow_box_keeps_one_char_per_line() {
        assert_eq!(wrap_text("ab", 5.0, monospace), vec!["a", "b"]);
    }
}
