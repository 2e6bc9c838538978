use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::TrackWindow;
use crate::error::{TimelineError, TimelineResult};

/// A timed subtitle line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtitle {
    pub id: Uuid,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl Subtitle {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> TimelineResult<Self> {
        if !(end > start) {
            return Err(TimelineError::InvalidRange { start, end });
        }
        Ok(Self {
            id: Uuid::new_v4(),
            start,
            end,
            text: text.into(),
        })
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Inclusive on both ends, matching how the preview picks the line to draw.
    pub fn is_visible_at(&self, time: f64) -> bool {
        time >= self.start && time <= self.end
    }
}

/// Ordered collection of subtitles for one editing session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubtitleTrack {
    subtitles: Vec<Subtitle>,
}

impl SubtitleTrack {
    pub fn new(subtitles: Vec<Subtitle>) -> Self {
        Self { subtitles }
    }

    pub fn subtitles(&self) -> &[Subtitle] {
        &self.subtitles
    }

    pub fn get(&self, id: Uuid) -> Option<&Subtitle> {
        self.subtitles.iter().find(|s| s.id == id)
    }

    /// Add a default subtitle near `current_time`, kept inside the window.
    pub fn add_at(
        &mut self,
        current_time: f64,
        window: TrackWindow,
        span: f64,
        min_duration: f64,
    ) -> Uuid {
        let min_duration = min_duration.min(window.length());
        let start = window.start.max(current_time).min(window.end - min_duration);
        let end = window.end.min(current_time + span).max(start + min_duration);
        let subtitle = Subtitle {
            id: Uuid::new_v4(),
            start,
            end,
            text: "New subtitle".to_string(),
        };
        let id = subtitle.id;
        self.subtitles.push(subtitle);
        id
    }

    pub fn set_text(&mut self, id: Uuid, text: impl Into<String>) -> TimelineResult<()> {
        let subtitle = self
            .subtitles
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(TimelineError::UnknownSubtitle(id))?;
        subtitle.text = text.into();
        Ok(())
    }

    pub fn remove(&mut self, id: Uuid) -> TimelineResult<Subtitle> {
        let index = self
            .subtitles
            .iter()
            .position(|s| s.id == id)
            .ok_or(TimelineError::UnknownSubtitle(id))?;
        Ok(self.subtitles.remove(index))
    }

    /// First subtitle visible at `time`.
    pub fn active_at(&self, time: f64) -> Option<&Subtitle> {
        self.subtitles.iter().find(|s| s.is_visible_at(time))
    }

    pub(crate) fn set_span(&mut self, id: Uuid, start: f64, end: f64) -> TimelineResult<()> {
        let subtitle = self
            .subtitles
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(TimelineError::UnknownSubtitle(id))?;
        subtitle.start = start;
        subtitle.end = end;
        Ok(())
    }
}

/// On-screen subtitle box in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubtitleBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SubtitleBox {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

impl Default for SubtitleBox {
    fn default() -> Self {
        Self {
            x: 100.0,
            y: 150.0,
            width: 300.0,
            height: 150.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(start: f64, end: f64) -> TrackWindow {
        TrackWindow::new(start, end).unwrap()
    }

    #[test]
    fn test_new_rejects_empty_span() {
        assert!(Subtitle::new(3.0, 3.0, "x").is_err());
    }

    #[test]
    fn test_add_at_uses_current_time() {
        let mut track = SubtitleTrack::default();
        let id = track.add_at(4.0, window(0.0, 30.0), 3.0, 1.0);
        let sub = track.get(id).unwrap();
        assert_eq!((sub.start, sub.end), (4.0, 7.0));
    }

    #[test]
    fn test_add_at_near_window_end_keeps_minimum() {
        let mut track = SubtitleTrack::default();
        let id = track.add_at(29.8, window(0.0, 30.0), 3.0, 1.0);
        let sub = track.get(id).unwrap();
        assert_eq!((sub.start, sub.end), (29.0, 30.0));
    }

    #[test]
    fn test_edit_and_remove() {
        let mut track = SubtitleTrack::new(vec![Subtitle::new(2.0, 5.0, "Welcome").unwrap()]);
        let id = track.subtitles()[0].id;
        track.set_text(id, "Hello").unwrap();
        assert_eq!(track.get(id).unwrap().text, "Hello");
        assert_eq!(track.active_at(5.0).unwrap().id, id);
        track.remove(id).unwrap();
        assert!(track.active_at(3.0).is_none());
        assert_eq!(track.remove(id), Err(TimelineError::UnknownSubtitle(id)));
    }
}
