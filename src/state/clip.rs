use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{TimelineError, TimelineResult};

/// A trimmed, positioned reference to a media source on the timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Unique identifier
    pub id: Uuid,
    /// Reference to the media source (URL or object handle)
    pub source_ref: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Trim-in point in source seconds
    pub trim_start: f64,
    /// Trim-out point in source seconds
    pub trim_end: f64,
    /// Full length of the source media in seconds
    pub source_duration: f64,
    /// Position of the trimmed clip on the timeline, in seconds
    pub timeline_offset: f64,
}

impl Clip {
    /// Create an untrimmed clip covering the whole source
    pub fn new(source_ref: impl Into<String>, source_duration: f64, timeline_offset: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_ref: source_ref.into(),
            name: String::new(),
            trim_start: 0.0,
            trim_end: source_duration,
            source_duration,
            timeline_offset,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_trim(mut self, trim_start: f64, trim_end: f64) -> Self {
        self.trim_start = trim_start;
        self.trim_end = trim_end;
        self
    }

    /// Length of the trimmed clip on the timeline
    pub fn duration(&self) -> f64 {
        self.trim_end - self.trim_start
    }

    /// Timeline time where the clip ends
    pub fn end(&self) -> f64 {
        self.timeline_offset + self.duration()
    }

    /// Whether `time` falls inside `[offset, offset + duration)`
    pub fn contains(&self, time: f64) -> bool {
        time >= self.timeline_offset && time < self.end()
    }

    /// Check if this clip overlaps with a time range
    pub fn overlaps(&self, start: f64, end: f64) -> bool {
        self.timeline_offset < end && self.end() > start
    }

    /// Map a timeline time to a position inside the source media
    pub fn source_time_at(&self, timeline_time: f64) -> f64 {
        self.trim_start + (timeline_time - self.timeline_offset).max(0.0)
    }

    /// Map a source position back onto the timeline
    pub fn timeline_time_at(&self, source_time: f64) -> f64 {
        self.timeline_offset + (source_time - self.trim_start)
    }

    pub(crate) fn validate(&self) -> TimelineResult<()> {
        if !(self.trim_end > self.trim_start) || self.trim_start < 0.0 {
            return Err(TimelineError::InvalidRange {
                start: self.trim_start,
                end: self.trim_end,
            });
        }
        Ok(())
    }
}
