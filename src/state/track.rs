use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Clip;
use crate::error::{TimelineError, TimelineResult};

/// Tolerance used when comparing clip edges for contact.
const EDGE_EPSILON: f64 = 1e-9;

/// The selected sub-range of the timeline used as preview/export bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackWindow {
    pub start: f64,
    pub end: f64,
}

impl TrackWindow {
    pub fn new(start: f64, end: f64) -> TimelineResult<Self> {
        if start < 0.0 || !(end > start) {
            return Err(TimelineError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    pub fn clamp(&self, time: f64) -> f64 {
        time.max(self.start).min(self.end)
    }

    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time <= self.end
    }
}

impl Default for TrackWindow {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: crate::constants::DEFAULT_TRACK_WINDOW_SECONDS,
        }
    }
}

/// A single video track: clips kept sorted by timeline offset, never overlapping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClipTrack {
    clips: Vec<Clip>,
}

impl ClipTrack {
    /// Build a track from existing clips.
    ///
    /// Overlapping intervals make the active clip at a given time ambiguous, so they are
    /// rejected here instead of being resolved by list order later.
    pub fn new(mut clips: Vec<Clip>) -> TimelineResult<Self> {
        for clip in &clips {
            clip.validate()?;
        }
        clips.sort_by(|a, b| a.timeline_offset.total_cmp(&b.timeline_offset));
        for pair in clips.windows(2) {
            if pair[0].end() > pair[1].timeline_offset + EDGE_EPSILON {
                return Err(TimelineError::OverlappingClips {
                    first: pair[0].id,
                    second: pair[1].id,
                });
            }
        }
        Ok(Self { clips })
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Clip> {
        self.clips.iter().find(|c| c.id == id)
    }

    pub fn index_of(&self, id: Uuid) -> Option<usize> {
        self.clips.iter().position(|c| c.id == id)
    }

    /// Place a clip at `desired_offset`, pushed forward past any clip it would overlap.
    pub fn add_clip(&mut self, mut clip: Clip, desired_offset: f64) -> TimelineResult<Uuid> {
        clip.validate()?;
        let duration = clip.duration();
        let mut offset = desired_offset.max(0.0);
        for existing in &self.clips {
            if existing.overlaps(offset, offset + duration) {
                offset = existing.end();
            }
        }
        clip.timeline_offset = offset;
        let id = clip.id;
        let index = self
            .clips
            .iter()
            .position(|c| c.timeline_offset > offset)
            .unwrap_or(self.clips.len());
        self.clips.insert(index, clip);
        Ok(id)
    }

    pub fn remove_clip(&mut self, id: Uuid) -> TimelineResult<Clip> {
        let index = self.index_of(id).ok_or(TimelineError::UnknownClip(id))?;
        Ok(self.clips.remove(index))
    }

    /// Clips immediately before and after `id` in timeline order.
    pub fn neighbors(&self, id: Uuid) -> (Option<&Clip>, Option<&Clip>) {
        match self.index_of(id) {
            Some(index) => {
                let prev = index.checked_sub(1).and_then(|i| self.clips.get(i));
                (prev, self.clips.get(index + 1))
            }
            None => (None, None),
        }
    }

    /// The clip whose `[offset, offset + duration)` interval contains `time`.
    pub fn active_clip_at(&self, time: f64) -> Option<&Clip> {
        self.clips.iter().find(|c| c.contains(time))
    }

    /// End of the last clip, or 0 when the track is empty.
    pub fn content_end(&self) -> f64 {
        self.clips.iter().map(Clip::end).fold(0.0, f64::max)
    }

    /// Swap in an updated copy of a clip; callers have already clamped it.
    pub(crate) fn replace(&mut self, clip: Clip) -> TimelineResult<()> {
        let index = self.index_of(clip.id).ok_or(TimelineError::UnknownClip(clip.id))?;
        self.clips[index] = clip;
        self.clips
            .sort_by(|a, b| a.timeline_offset.total_cmp(&b.timeline_offset));
        Ok(())
    }

    pub(crate) fn set_clips(&mut self, clips: Vec<Clip>) {
        self.clips = clips;
    }
}
