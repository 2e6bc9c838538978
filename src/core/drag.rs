//! Pointer drag state machine.
//!
//! A drag starts on a handle, snapshots what it is about to change, and then every
//! pointer move is applied against that snapshot. At most one drag is active.

use uuid::Uuid;

use crate::core::clip_ops::{self, Edge};
use crate::core::mapper::{ContainerRect, Viewport};
use crate::core::subtitle_box::{self, BoxHandle};
use crate::error::{TimelineError, TimelineResult};
use crate::state::{Clip, ClipTrack, SubtitleBox, SubtitleTrack, TrackWindow};

/// What the pointer grabbed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragHandle {
    Playhead,
    TrackStart,
    TrackEnd,
    ClipBody(Uuid),
    ClipEdge(Uuid, Edge),
    /// Drag a clip to a new slot; the track is laid out again on release.
    ClipReorder(Uuid),
    SubtitleBlock(Uuid),
    SubtitleBox(BoxHandle),
}

/// State captured when the drag began.
#[derive(Clone, Debug, PartialEq)]
pub enum DragAnchor {
    Position(f64),
    Clip(Clip),
    Reorder { clip: Clip, from: usize },
    Subtitle { start: f64, end: f64 },
    Box(SubtitleBox),
}

#[derive(Clone, Debug, PartialEq)]
pub struct DragSession {
    pub handle: DragHandle,
    pub anchor_pointer: (f64, f64),
    pub anchor: DragAnchor,
    /// Slot a reorder drag would drop into
    pub drop_index: Option<usize>,
}

/// Everything a drag reads and writes, borrowed from the editing session.
pub struct DragContext<'a> {
    pub viewport: Viewport,
    pub rect: ContainerRect,
    pub current_time: &'a mut f64,
    pub window: &'a mut TrackWindow,
    pub clips: &'a mut ClipTrack,
    pub subtitles: &'a mut SubtitleTrack,
    pub subtitle_box: &'a mut SubtitleBox,
}

#[derive(Debug, Default)]
pub struct DragController {
    session: Option<DragSession>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn begin(
        &mut self,
        handle: DragHandle,
        pointer: (f64, f64),
        ctx: &DragContext<'_>,
    ) -> TimelineResult<()> {
        if self.session.is_some() {
            return Err(TimelineError::DragInProgress);
        }
        let anchor = match handle {
            DragHandle::Playhead => DragAnchor::Position(*ctx.current_time),
            DragHandle::TrackStart => DragAnchor::Position(ctx.window.start),
            DragHandle::TrackEnd => DragAnchor::Position(ctx.window.end),
            DragHandle::ClipBody(id) | DragHandle::ClipEdge(id, _) => {
                DragAnchor::Clip(ctx.clips.get(id).cloned().ok_or(TimelineError::UnknownClip(id))?)
            }
            DragHandle::ClipReorder(id) => {
                let from = ctx.clips.index_of(id).ok_or(TimelineError::UnknownClip(id))?;
                DragAnchor::Reorder {
                    clip: ctx.clips.clips()[from].clone(),
                    from,
                }
            }
            DragHandle::SubtitleBlock(id) => {
                let subtitle = ctx
                    .subtitles
                    .get(id)
                    .ok_or(TimelineError::UnknownSubtitle(id))?;
                DragAnchor::Subtitle {
                    start: subtitle.start,
                    end: subtitle.end,
                }
            }
            DragHandle::SubtitleBox(_) => DragAnchor::Box(*ctx.subtitle_box),
        };
        tracing::debug!(?handle, x = pointer.0, y = pointer.1, "drag started");
        self.session = Some(DragSession {
            handle,
            anchor_pointer: pointer,
            anchor,
            drop_index: None,
        });
        Ok(())
    }

    /// Apply a pointer move. Out-of-range positions are clamped, never rejected.
    pub fn update(&mut self, pointer: (f64, f64), ctx: &mut DragContext<'_>) -> TimelineResult<()> {
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        let settings = ctx.viewport.settings;
        let dx = pointer.0 - session.anchor_pointer.0;
        let dy = pointer.1 - session.anchor_pointer.1;
        let delta = ctx.viewport.seconds_for_pixels(dx, ctx.rect);
        let pointer_time = ctx.viewport.pixel_to_time(pointer.0, ctx.rect);

        match (session.handle, &session.anchor) {
            (DragHandle::Playhead, _) => {
                *ctx.current_time = ctx.window.clamp(pointer_time);
            }
            (DragHandle::TrackStart, _) => {
                ctx.window.start = pointer_time.min(ctx.window.end - settings.track_epsilon);
            }
            (DragHandle::TrackEnd, _) => {
                ctx.window.end = pointer_time.max(ctx.window.start + settings.track_epsilon);
            }
            (DragHandle::ClipBody(id), DragAnchor::Clip(anchor)) => {
                let (prev, next) = ctx.clips.neighbors(id);
                let moved = clip_ops::move_clip(
                    anchor,
                    anchor.timeline_offset + delta,
                    *ctx.window,
                    prev,
                    next,
                );
                ctx.clips.replace(moved)?;
            }
            (DragHandle::ClipEdge(id, edge), DragAnchor::Clip(anchor)) => {
                let (prev, next) = ctx.clips.neighbors(id);
                let resized = match edge {
                    Edge::Left => {
                        clip_ops::resize_left(anchor, delta, prev, settings.min_clip_duration)
                    }
                    Edge::Right => {
                        clip_ops::resize_right(anchor, delta, next, settings.min_clip_duration)
                    }
                };
                ctx.clips.replace(resized)?;
            }
            (DragHandle::ClipReorder(id), DragAnchor::Reorder { clip, .. }) => {
                let others: Vec<Clip> = ctx
                    .clips
                    .clips()
                    .iter()
                    .filter(|c| c.id != id)
                    .cloned()
                    .collect();
                session.drop_index =
                    Some(clip_ops::insert_index_for(&others, clip.timeline_offset + delta));
            }
            (DragHandle::SubtitleBlock(id), DragAnchor::Subtitle { start, end }) => {
                let (start, end) = subtitle_box::drag_subtitle(
                    *start,
                    *end,
                    delta,
                    *ctx.window,
                    settings.min_subtitle_duration,
                );
                ctx.subtitles.set_span(id, start, end)?;
            }
            (DragHandle::SubtitleBox(handle), DragAnchor::Box(anchor)) => {
                *ctx.subtitle_box = match handle {
                    BoxHandle::Body => subtitle_box::move_box(*anchor, dx, dy),
                    BoxHandle::Corner(corner) => {
                        subtitle_box::resize_box(*anchor, corner, dx, dy, settings.min_box_size)
                    }
                };
            }
            (handle, anchor) => {
                tracing::warn!(?handle, ?anchor, "drag anchor does not match handle");
            }
        }
        Ok(())
    }

    /// Finish the drag, committing a pending reorder. Returns the released handle.
    pub fn end(&mut self, ctx: &mut DragContext<'_>) -> TimelineResult<Option<DragHandle>> {
        let Some(session) = self.session.take() else {
            return Ok(None);
        };
        if let (DragAnchor::Reorder { from, .. }, Some(to)) = (&session.anchor, session.drop_index) {
            let gap = ctx.viewport.settings.reorder_gap_px / ctx.viewport.pixels_per_second();
            let reordered = clip_ops::reorder(ctx.clips.clips(), *from, to, ctx.window.start, gap)?;
            ctx.clips.set_clips(reordered);
        }
        tracing::debug!(handle = ?session.handle, "drag ended");
        Ok(Some(session.handle))
    }

    /// Drop the session without committing anything further.
    pub fn cancel(&mut self) -> Option<DragSession> {
        self.session.take()
    }
}
