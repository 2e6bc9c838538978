/// Format a time as `m:ss`, the label style used on the ruler.
pub fn format_clock(time: f64) -> String {
    let time = time.max(0.0);
    let minutes = (time / 60.0).floor() as u64;
    let seconds = (time % 60.0).floor() as u64;
    format!("{}:{:02}", minutes, seconds)
}

/// Format a time as `HH:MM:SS:FF` at the given frame rate.
pub fn format_timecode(time: f64, fps: f64) -> String {
    let fps = fps.max(1.0);
    let fps_whole = fps.round() as u64;
    let total_frames = (time.max(0.0) * fps) as u64;
    let frames = total_frames % fps_whole;
    let total_seconds = total_frames / fps_whole;
    let seconds = total_seconds % 60;
    let total_minutes = total_seconds / 60;
    let minutes = total_minutes % 60;
    let hours = total_minutes / 60;
    format!("{:02}:{:02}:{:02}:{:02}", hours, minutes, seconds, frames)
}

/// Format seconds with one decimal, as shown in the subtitle list.
pub fn format_seconds(time: f64) -> String {
    format!("{:.1}s", time)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0.0), "0:00");
        assert_eq!(format_clock(7.9), "0:07");
        assert_eq!(format_clock(125.0), "2:05");
    }

    #[test]
    fn test_format_timecode() {
        assert_eq!(format_timecode(0.0, 60.0), "00:00:00:00");
        assert_eq!(format_timecode(3661.5, 60.0), "01:01:01:30");
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(2.0), "2.0s");
    }
}
