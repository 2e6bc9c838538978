//! Clamped clip edits: move, edge resize, and drag-to-reorder relayout.
//!
//! Every function takes the clip as it was when the drag began (the anchor) and the
//! total pointer delta, so repeated moves never accumulate rounding. Collisions with a
//! neighbour clamp the moving edge to the neighbour's boundary ("push to contact").

use crate::error::{TimelineError, TimelineResult};
use crate::state::{Clip, TrackWindow};

/// Which side of a clip is being dragged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
}

/// Move a clip body to `desired_offset`, kept inside the window and between neighbours.
///
/// When the clip cannot fit anywhere in the allowed range it stays where it was.
pub fn move_clip(
    anchor: &Clip,
    desired_offset: f64,
    window: TrackWindow,
    prev: Option<&Clip>,
    next: Option<&Clip>,
) -> Clip {
    let duration = anchor.duration();
    let lower = prev.map_or(window.start, |p| window.start.max(p.end()));
    let upper = next.map_or(window.end, |n| window.end.min(n.timeline_offset)) - duration;

    let mut moved = anchor.clone();
    if upper < lower {
        return moved;
    }
    moved.timeline_offset = desired_offset.clamp(lower, upper);
    moved
}

/// Drag the left edge: changes `trim_start` while the right edge stays put.
pub fn resize_left(anchor: &Clip, delta: f64, prev: Option<&Clip>, min_duration: f64) -> Clip {
    let max_trim_start = if anchor.duration() > min_duration {
        anchor.trim_end - min_duration
    } else {
        anchor.trim_start
    };
    let mut trim_start = (anchor.trim_start + delta).max(0.0).min(max_trim_start);
    let mut offset = anchor.timeline_offset + (trim_start - anchor.trim_start);

    let floor = prev.map_or(0.0, |p| p.end().max(0.0));
    if offset < floor {
        trim_start += floor - offset;
        offset = floor;
    }

    let mut resized = anchor.clone();
    resized.trim_start = trim_start;
    resized.timeline_offset = offset;
    resized
}

/// Drag the right edge: changes `trim_end`; the clip's offset is untouched.
pub fn resize_right(anchor: &Clip, delta: f64, next: Option<&Clip>, min_duration: f64) -> Clip {
    let min_trim_end = anchor.trim_start + min_duration;
    let max_trim_end = anchor.source_duration.max(min_trim_end);
    let mut trim_end = (anchor.trim_end + delta).clamp(min_trim_end, max_trim_end);

    if let Some(next) = next {
        let limit = anchor.trim_start + (next.timeline_offset - anchor.timeline_offset);
        if trim_end > limit {
            trim_end = limit.max(anchor.trim_start);
        }
    }

    let mut resized = anchor.clone();
    resized.trim_end = trim_end;
    resized
}

/// Move the clip at `from` to slot `to` and lay every clip out again back to back.
///
/// Offsets become `origin + Σ(previous durations + gap)`, so the result never has
/// overlaps regardless of the previous positions.
pub fn reorder(
    clips: &[Clip],
    from: usize,
    to: usize,
    origin: f64,
    gap: f64,
) -> TimelineResult<Vec<Clip>> {
    let len = clips.len();
    for index in [from, to] {
        if index >= len {
            return Err(TimelineError::IndexOutOfBounds { index, len });
        }
    }
    let mut ordered = clips.to_vec();
    if from == to {
        return Ok(ordered);
    }
    let moved = ordered.remove(from);
    ordered.insert(to, moved);
    relayout(&mut ordered, origin, gap);
    Ok(ordered)
}

/// Sequential layout from `origin` with `gap` between neighbours.
pub fn relayout(clips: &mut [Clip], origin: f64, gap: f64) {
    let mut cursor = origin;
    for clip in clips.iter_mut() {
        clip.timeline_offset = cursor;
        cursor += clip.duration() + gap;
    }
}

/// Slot a dragged clip would drop into when its leading edge is at `position`.
pub fn insert_index_for(clips: &[Clip], position: f64) -> usize {
    clips
        .iter()
        .position(|c| position < c.timeline_offset + c.duration() / 2.0)
        .unwrap_or(clips.len())
}

/// Timeline position of the insertion indicator for `index` after a relayout.
pub fn insert_marker_time(clips: &[Clip], index: usize, origin: f64, gap: f64) -> f64 {
    clips
        .iter()
        .take(index)
        .fold(origin, |acc, c| acc + c.duration() + gap)
}
