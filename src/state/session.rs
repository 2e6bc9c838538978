//! The in-memory editing session: one video track, its subtitles, the track window,
//! and the single current time every producer writes to.

use uuid::Uuid;

use super::{Clip, ClipTrack, Subtitle, SubtitleBox, SubtitleTrack, TimelineSettings, TrackWindow};
use crate::core::clip_ops;
use crate::core::drag::{DragContext, DragController, DragHandle, DragSession};
use crate::core::mapper::{ContainerRect, TimeMarker, Viewport};
use crate::core::playback::{MediaElement, MediaSync, PlaybackState, PlaybackTick};
use crate::error::TimelineResult;
use crate::hotkeys::HotkeyAction;

/// Editing state plus the media-element synchronizer that plays it.
///
/// The default element type is `Send`, so a session behind a mutex can be ticked from a
/// [`FrameLoop`](crate::core::playback::FrameLoop) task.
pub struct EditorSession<M = Box<dyn MediaElement + Send>> {
    settings: TimelineSettings,
    zoom_level: f64,
    current_time: f64,
    duration: f64,
    window: TrackWindow,
    clips: ClipTrack,
    subtitles: SubtitleTrack,
    subtitle_box: SubtitleBox,
    show_subtitles: bool,
    drag: DragController,
    media: MediaSync<M>,
}

impl<M: MediaElement> EditorSession<M> {
    pub fn new(settings: TimelineSettings) -> Self {
        let window = TrackWindow::new(0.0, settings.default_window_seconds).unwrap_or_default();
        Self {
            zoom_level: crate::constants::DEFAULT_ZOOM_LEVEL,
            current_time: 0.0,
            duration: 0.0,
            window,
            clips: ClipTrack::default(),
            subtitles: SubtitleTrack::default(),
            subtitle_box: SubtitleBox::default(),
            show_subtitles: true,
            drag: DragController::new(),
            media: MediaSync::new(settings.resync_tolerance),
            settings,
        }
    }

    pub fn settings(&self) -> &TimelineSettings {
        &self.settings
    }

    pub fn zoom_level(&self) -> f64 {
        self.zoom_level
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn track_window(&self) -> TrackWindow {
        self.window
    }

    pub fn clips(&self) -> &ClipTrack {
        &self.clips
    }

    pub fn subtitles(&self) -> &SubtitleTrack {
        &self.subtitles
    }

    pub fn subtitle_box(&self) -> SubtitleBox {
        self.subtitle_box
    }

    pub fn show_subtitles(&self) -> bool {
        self.show_subtitles
    }

    pub fn set_show_subtitles(&mut self, show: bool) {
        self.show_subtitles = show;
    }

    pub fn drag_session(&self) -> Option<&DragSession> {
        self.drag.session()
    }

    pub fn media(&self) -> &MediaSync<M> {
        &self.media
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.media.state()
    }

    pub fn is_playing(&self) -> bool {
        self.media.state() == PlaybackState::Playing
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.settings, self.zoom_level, self.current_time, self.duration)
    }

    pub fn time_markers(&self) -> Vec<TimeMarker> {
        self.viewport().time_markers()
    }

    // ── time ────────────────────────────────────────────────────────

    /// Move the playhead to `time`, clamped to `[0, duration]`.
    pub fn seek(&mut self, time: f64) {
        self.current_time = time.max(0.0).min(self.duration.max(0.0));
        self.media.seek(&self.clips, self.current_time);
    }

    /// Click on the timeline body. Ignored while a drag is in progress.
    pub fn click_seek(&mut self, client_x: f64, rect: ContainerRect) {
        if self.drag.is_active() {
            return;
        }
        let time = self.viewport().pixel_to_time(client_x, rect);
        self.seek(self.window.clamp(time));
    }

    /// Write from a playback producer. Dropped while the user is dragging.
    pub fn apply_playback_time(&mut self, time: f64) -> bool {
        if self.drag.is_active() {
            return false;
        }
        self.current_time = time;
        true
    }

    pub fn skip_forward(&mut self) {
        let time = (self.current_time + self.settings.skip_step).min(self.window.end);
        self.seek(time);
    }

    pub fn skip_backward(&mut self) {
        let time = (self.current_time - self.settings.skip_step).max(self.window.start);
        self.seek(time);
    }

    pub fn set_zoom(&mut self, zoom_level: f64) {
        self.zoom_level = self.settings.clamp_zoom(zoom_level);
    }

    /// Replace the track window; the playhead snaps to the new start when left outside.
    pub fn set_track_window(&mut self, start: f64, end: f64) -> TimelineResult<()> {
        self.window = TrackWindow::new(start, end)?;
        if !self.window.contains(self.current_time) {
            self.seek(self.window.start);
        }
        Ok(())
    }

    /// Source metadata arrived: adopt its duration and fit the window to it.
    ///
    /// A window starting past the new duration is reset to `[0, end]` with the playhead
    /// at 0; otherwise the playhead is clamped to the new duration.
    pub fn on_media_loaded(&mut self, duration: f64) {
        tracing::info!(duration, "media metadata loaded");
        self.duration = duration.max(0.0);
        let end = self.settings.default_window_seconds.min(self.duration);
        if end > self.window.start + self.settings.track_epsilon {
            self.window.end = end;
        } else {
            match TrackWindow::new(0.0, end) {
                Ok(window) => {
                    self.window = window;
                    self.current_time = window.start;
                }
                Err(err) => tracing::warn!(error = %err, "media too short for a track window"),
            }
        }
        self.current_time = self.current_time.min(self.duration);
        if !self.window.contains(self.current_time) {
            self.seek(self.window.start);
        } else {
            self.media.seek(&self.clips, self.current_time);
        }
    }

    /// Grow the timeline to cover the clips; the window end never passes the content.
    pub fn refresh_duration(&mut self) {
        let content_end = self.clips.content_end();
        if content_end > self.duration {
            self.duration = content_end;
            self.window.end = self.window.end.min(content_end);
        }
    }

    // ── playback ────────────────────────────────────────────────────

    pub fn play(&mut self) {
        if self.current_time >= self.window.end {
            self.current_time = self.window.start;
        }
        self.media.play(&self.clips, self.current_time);
    }

    pub fn pause(&mut self) {
        self.media.pause();
    }

    pub fn stop(&mut self) {
        self.media.stop();
    }

    pub fn toggle_playback(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// One frame of the media-driven loop.
    pub fn tick(&mut self) -> Option<PlaybackTick> {
        let tick = self.media.tick(&self.clips, self.window)?;
        self.apply_playback_time(tick.time);
        Some(tick)
    }

    // ── pointer ─────────────────────────────────────────────────────

    pub fn pointer_down(
        &mut self,
        handle: DragHandle,
        pointer: (f64, f64),
        rect: ContainerRect,
    ) -> TimelineResult<()> {
        let (drag, ctx) = self.split_for_drag(rect);
        drag.begin(handle, pointer, &ctx)
    }

    pub fn pointer_move(&mut self, pointer: (f64, f64), rect: ContainerRect) -> TimelineResult<()> {
        let (drag, mut ctx) = self.split_for_drag(rect);
        drag.update(pointer, &mut ctx)?;
        if matches!(
            self.drag.session().map(|s| s.handle),
            Some(DragHandle::Playhead)
        ) {
            self.media.seek(&self.clips, self.current_time);
        }
        Ok(())
    }

    pub fn pointer_up(&mut self, rect: ContainerRect) -> TimelineResult<Option<DragHandle>> {
        let (drag, mut ctx) = self.split_for_drag(rect);
        let released = drag.end(&mut ctx)?;
        match released {
            Some(DragHandle::ClipBody(_))
            | Some(DragHandle::ClipEdge(..))
            | Some(DragHandle::ClipReorder(_)) => self.refresh_duration(),
            Some(DragHandle::TrackStart) | Some(DragHandle::TrackEnd) => {
                if !self.window.contains(self.current_time) {
                    self.seek(self.window.start);
                }
            }
            _ => {}
        }
        Ok(released)
    }

    fn split_for_drag(&mut self, rect: ContainerRect) -> (&mut DragController, DragContext<'_>) {
        let viewport = self.viewport();
        (
            &mut self.drag,
            DragContext {
                viewport,
                rect,
                current_time: &mut self.current_time,
                window: &mut self.window,
                clips: &mut self.clips,
                subtitles: &mut self.subtitles,
                subtitle_box: &mut self.subtitle_box,
            },
        )
    }

    // ── hotkeys ─────────────────────────────────────────────────────

    pub fn apply_hotkey(&mut self, action: HotkeyAction) {
        match action {
            HotkeyAction::TimelineZoomIn => self.set_zoom(self.zoom_level + 1.0),
            HotkeyAction::TimelineZoomOut => self.set_zoom(self.zoom_level - 1.0),
            HotkeyAction::PlayPause => self.toggle_playback(),
            HotkeyAction::SkipBackward => self.skip_backward(),
            HotkeyAction::SkipForward => self.skip_forward(),
            HotkeyAction::SeekStart => self.seek(self.window.start),
            HotkeyAction::SeekEnd => self.seek(self.window.end),
        }
    }

    // ── clips ───────────────────────────────────────────────────────

    /// Place a clip at the playhead (never before the window start) with its element.
    pub fn add_clip(&mut self, clip: Clip, element: M) -> TimelineResult<Uuid> {
        let desired = self.window.start.max(self.current_time);
        let id = self.clips.add_clip(clip, desired)?;
        if self.media.registry_mut().insert(id, element).is_some() {
            tracing::warn!(clip_id = %id, "clip id already had a media element");
        }
        self.refresh_duration();
        Ok(id)
    }

    /// Remove a clip and hand back its element for release.
    pub fn remove_clip(&mut self, id: Uuid) -> TimelineResult<(Clip, Option<M>)> {
        let clip = self.clips.remove_clip(id)?;
        let element = self.media.registry_mut().remove(id);
        self.media.align(&self.clips, self.current_time);
        Ok((clip, element))
    }

    /// Swap the source element of a clip, returning the old one for release.
    pub fn replace_media(&mut self, id: Uuid, element: M) -> TimelineResult<Option<M>> {
        if self.clips.get(id).is_none() {
            return Err(crate::error::TimelineError::UnknownClip(id));
        }
        let previous = self.media.registry_mut().insert(id, element);
        self.media.align(&self.clips, self.current_time);
        Ok(previous)
    }

    /// Move the clip at `from` into slot `to` and lay the track out from the window start.
    pub fn reorder_clips(&mut self, from: usize, to: usize) -> TimelineResult<()> {
        let gap = self.settings.reorder_gap_px / self.viewport().pixels_per_second();
        let reordered = clip_ops::reorder(self.clips.clips(), from, to, self.window.start, gap)?;
        self.clips.set_clips(reordered);
        self.refresh_duration();
        Ok(())
    }

    // ── subtitles ───────────────────────────────────────────────────

    pub fn add_subtitle(&mut self) -> Uuid {
        self.subtitles.add_at(
            self.current_time,
            self.window,
            self.settings.new_subtitle_span,
            self.settings.min_subtitle_duration,
        )
    }

    pub fn set_subtitle_text(&mut self, id: Uuid, text: impl Into<String>) -> TimelineResult<()> {
        self.subtitles.set_text(id, text)
    }

    pub fn remove_subtitle(&mut self, id: Uuid) -> TimelineResult<Subtitle> {
        self.subtitles.remove(id)
    }

    /// The subtitle to draw at the current time, if subtitles are shown.
    pub fn visible_subtitle(&self) -> Option<&Subtitle> {
        if !self.show_subtitles {
            return None;
        }
        self.subtitles.active_at(self.current_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::playback::fakes::{FakeMedia, MediaLog};
    use approx::assert_relative_eq;

    fn session() -> (EditorSession<FakeMedia>, MediaLog) {
        let mut session = EditorSession::new(TimelineSettings::default());
        session.on_media_loaded(60.0);
        (session, MediaLog::default())
    }

    #[test]
    fn test_media_loaded_fits_window() {
        let mut session: EditorSession<FakeMedia> = EditorSession::new(TimelineSettings::default());
        session.on_media_loaded(12.0);
        assert_eq!(session.track_window(), TrackWindow::new(0.0, 12.0).unwrap());
        session.on_media_loaded(90.0);
        assert_eq!(session.track_window().end, 30.0);
    }

    #[test]
    fn test_shorter_media_resets_window_past_duration() {
        let (mut session, _) = session();
        session.set_track_window(20.0, 30.0).unwrap();
        assert_eq!(session.current_time(), 20.0);
        session.on_media_loaded(10.0);
        assert_eq!(session.duration(), 10.0);
        assert_eq!(session.track_window(), TrackWindow::new(0.0, 10.0).unwrap());
        assert_eq!(session.current_time(), 0.0);
    }

    #[test]
    fn test_shorter_media_clamps_playhead_inside_kept_window() {
        let (mut session, _) = session();
        session.seek(25.0);
        session.on_media_loaded(12.0);
        assert_eq!(session.track_window(), TrackWindow::new(0.0, 12.0).unwrap());
        assert_eq!(session.current_time(), 12.0);
    }

    #[test]
    fn test_track_window_change_snaps_playhead() {
        let (mut session, _) = session();
        session.seek(20.0);
        session.set_track_window(5.0, 15.0).unwrap();
        assert_eq!(session.current_time(), 5.0);
        session.seek(10.0);
        session.set_track_window(8.0, 12.0).unwrap();
        assert_eq!(session.current_time(), 10.0);
        assert!(session.set_track_window(4.0, 4.0).is_err());
    }

    #[test]
    fn test_skip_clamps_to_window() {
        let (mut session, _) = session();
        session.set_track_window(2.0, 9.0).unwrap();
        session.seek(4.0);
        session.apply_hotkey(HotkeyAction::SkipForward);
        assert_eq!(session.current_time(), 9.0);
        session.apply_hotkey(HotkeyAction::SkipBackward);
        assert_eq!(session.current_time(), 4.0);
        session.apply_hotkey(HotkeyAction::SkipBackward);
        assert_eq!(session.current_time(), 2.0);
    }

    #[test]
    fn test_zoom_hotkeys_clamp() {
        let (mut session, _) = session();
        session.apply_hotkey(HotkeyAction::TimelineZoomIn);
        assert_eq!(session.zoom_level(), 50.0);
        session.set_zoom(1.5);
        session.apply_hotkey(HotkeyAction::TimelineZoomOut);
        assert_eq!(session.zoom_level(), 1.0);
    }

    #[test]
    fn test_playback_writes_ignored_while_dragging() {
        let (mut session, _) = session();
        let rect = ContainerRect::new(0.0, 500.0);
        session.pointer_down(DragHandle::Playhead, (0.0, 0.0), rect).unwrap();
        assert!(!session.apply_playback_time(7.0));
        assert_eq!(session.current_time(), 0.0);
        session.click_seek(250.0, rect);
        assert_eq!(session.current_time(), 0.0);
        session.pointer_up(rect).unwrap();
        assert!(session.apply_playback_time(7.0));
        assert_eq!(session.current_time(), 7.0);
    }

    #[test]
    fn test_add_clip_at_playhead_and_grow_duration() {
        let (mut session, log) = session();
        session.seek(58.0);
        let clip = Clip::new("a.mp4", 10.0, 0.0).with_trim(0.0, 5.0);
        let id = session.add_clip(clip, FakeMedia::new("a", 10.0, log)).unwrap();
        assert_relative_eq!(session.clips().get(id).unwrap().timeline_offset, 58.0);
        assert_relative_eq!(session.duration(), 63.0);
        assert!(session.media().registry().contains(id));

        let (removed, element) = session.remove_clip(id).unwrap();
        assert_eq!(removed.id, id);
        assert_eq!(element.unwrap().label, "a");
        assert!(session.media().registry().is_empty());
    }

    #[test]
    fn test_play_tick_and_end() {
        let (mut session, log) = session();
        session.set_track_window(0.0, 4.0).unwrap();
        let clip = Clip::new("a.mp4", 10.0, 0.0).with_trim(1.0, 9.0);
        let id = session.add_clip(clip, FakeMedia::new("a", 10.0, log)).unwrap();

        session.apply_hotkey(HotkeyAction::PlayPause);
        assert!(session.is_playing());

        session.media.registry_mut().get_mut(id).unwrap().set_time(3.5);
        let tick = session.tick().unwrap();
        assert_relative_eq!(tick.time, 2.5);
        assert_relative_eq!(session.current_time(), 2.5);

        session.media.registry_mut().get_mut(id).unwrap().set_time(5.2);
        let tick = session.tick().unwrap();
        assert!(tick.ended);
        assert_eq!(session.current_time(), 4.0);
        assert_eq!(session.playback_state(), PlaybackState::Stopped);
        assert!(session.tick().is_none());
    }

    #[test]
    fn test_playback_runs_through_reorder_gap_to_window_end() {
        let (mut session, log) = session();
        let b = session
            .add_clip(Clip::new("b.mp4", 10.0, 0.0).with_trim(0.0, 3.0), FakeMedia::new("b", 10.0, log.clone()))
            .unwrap();
        let a = session
            .add_clip(Clip::new("a.mp4", 10.0, 0.0).with_trim(0.0, 2.0), FakeMedia::new("a", 10.0, log))
            .unwrap();
        session.reorder_clips(1, 0).unwrap();
        session.set_track_window(0.0, 5.0).unwrap();
        // a = [0, 2), b = [2.025, 5.025)
        assert_relative_eq!(session.clips().get(b).unwrap().timeline_offset, 2.025, epsilon = 1e-9);

        session.play();
        session.media.registry_mut().get_mut(a).unwrap().set_time(2.0);
        assert_relative_eq!(session.tick().unwrap().time, 2.0);
        assert!(session.is_playing());

        session.media.registry_mut().get_mut(a).unwrap().set_time(2.1);
        assert_relative_eq!(session.tick().unwrap().time, 2.1);
        assert_eq!(session.media().active_clip(), Some(b));

        session.media.registry_mut().get_mut(b).unwrap().set_time(3.0);
        let tick = session.tick().unwrap();
        assert!(tick.ended);
        assert_eq!(session.current_time(), 5.0);
        assert_eq!(session.playback_state(), PlaybackState::Stopped);
    }

    #[tokio::test]
    async fn test_default_session_ticks_on_frame_loop() {
        use crate::core::playback::FrameLoop;
        use std::ops::ControlFlow;
        use std::sync::{Arc, Mutex};
        use std::time::Duration;

        let mut session: EditorSession = EditorSession::new(TimelineSettings::default());
        session.on_media_loaded(60.0);
        session.set_track_window(0.0, 3.0).unwrap();
        let clip = Clip::new("a.mp4", 10.0, 0.0).with_trim(0.0, 5.0);
        let id = session
            .add_clip(clip, Box::new(FakeMedia::new("a", 10.0, MediaLog::default())))
            .unwrap();
        session.play();

        let session = Arc::new(Mutex::new(session));
        let shared = Arc::clone(&session);
        let frame_loop = FrameLoop::spawn(Duration::from_millis(2), move || {
            let Ok(mut session) = shared.lock() else {
                return ControlFlow::Break(());
            };
            // stand-in for decoder progress
            if let Some(element) = session.media.registry_mut().get_mut(id) {
                let now = element.current_time();
                element.seek(now + 0.5);
            }
            match session.tick() {
                Some(tick) if tick.ended => ControlFlow::Break(()),
                _ => ControlFlow::Continue(()),
            }
        });

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!frame_loop.is_running());
        let session = session.lock().unwrap();
        assert_eq!(session.current_time(), 3.0);
        assert_eq!(session.playback_state(), PlaybackState::Stopped);
    }

    #[test]
    fn test_visible_subtitle_respects_toggle() {
        let (mut session, _) = session();
        session.seek(1.0);
        let id = session.add_subtitle();
        session.set_subtitle_text(id, "hi").unwrap();
        assert_eq!(session.visible_subtitle().map(|s| s.text.as_str()), Some("hi"));
        session.set_show_subtitles(false);
        assert!(session.visible_subtitle().is_none());
    }

    #[test]
    fn test_reorder_clips_lays_out_from_window_start() {
        let (mut session, log) = session();
        session.set_track_window(1.0, 20.0).unwrap();
        let a = session
            .add_clip(Clip::new("a.mp4", 10.0, 0.0).with_trim(0.0, 2.0), FakeMedia::new("a", 10.0, log.clone()))
            .unwrap();
        let b = session
            .add_clip(Clip::new("b.mp4", 10.0, 0.0).with_trim(0.0, 3.0), FakeMedia::new("b", 10.0, log))
            .unwrap();
        session.reorder_clips(1, 0).unwrap();
        let clips = session.clips().clips();
        assert_eq!((clips[0].id, clips[1].id), (b, a));
        assert_relative_eq!(clips[0].timeline_offset, 1.0);
        // zoom 50: 80 px per second, 2 px gap
        assert_relative_eq!(clips[1].timeline_offset, 4.025);
    }

    #[test]
    fn test_clip_and_subtitle_drags_through_pointer_events() {
        let (mut session, log) = session();
        // zoom 50 shows 5 s across 500 px
        let rect = ContainerRect::new(0.0, 500.0);
        let id = session
            .add_clip(Clip::new("a.mp4", 10.0, 0.0).with_trim(0.0, 5.0), FakeMedia::new("a", 10.0, log))
            .unwrap();

        session.pointer_down(DragHandle::ClipBody(id), (100.0, 0.0), rect).unwrap();
        assert!(session.pointer_down(DragHandle::Playhead, (0.0, 0.0), rect).is_err());
        session.pointer_move((300.0, 0.0), rect).unwrap();
        assert_eq!(session.pointer_up(rect).unwrap(), Some(DragHandle::ClipBody(id)));
        assert_relative_eq!(session.clips().get(id).unwrap().timeline_offset, 2.0);

        let sub = session.add_subtitle();
        session.pointer_down(DragHandle::SubtitleBlock(sub), (0.0, 0.0), rect).unwrap();
        session.pointer_move((1000.0, 0.0), rect).unwrap();
        session.pointer_up(rect).unwrap();
        let moved = session.subtitles().get(sub).unwrap();
        assert_relative_eq!(moved.start, 10.0);
        assert_relative_eq!(moved.end, 13.0);
        assert!(session.drag_session().is_none());
    }

    #[test]
    fn test_track_end_drag_snaps_playhead_on_release() {
        let (mut session, _) = session();
        let rect = ContainerRect::new(0.0, 500.0);
        session.seek(4.0);
        // viewport scrolled to 1.5 s; x = 100 is 2.5 s
        session.pointer_down(DragHandle::TrackEnd, (400.0, 0.0), rect).unwrap();
        session.pointer_move((100.0, 0.0), rect).unwrap();
        assert_relative_eq!(session.track_window().end, 2.5);
        assert_eq!(session.current_time(), 4.0);
        session.pointer_up(rect).unwrap();
        assert_eq!(session.current_time(), 0.0);
    }
}
