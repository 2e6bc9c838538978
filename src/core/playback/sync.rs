//! Playback synchronizers: turn a media position or an audio clock into timeline time.

use uuid::Uuid;

use super::audio::{AudioScheduler, AudioTrack, SourceId, SourcePlan};
use super::clock::AudioClock;
use super::media::{MediaElement, MediaRegistry};
use crate::state::{ClipTrack, TrackWindow};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Fires once when playback reaches the end, until re-armed by moving back before it.
#[derive(Clone, Copy, Debug, Default)]
pub struct EndLatch {
    fired: bool,
}

impl EndLatch {
    /// True only for the first observation at or past `end`.
    pub fn observe(&mut self, time: f64, end: f64) -> bool {
        if time < end {
            self.fired = false;
            return false;
        }
        if self.fired {
            return false;
        }
        self.fired = true;
        true
    }

    pub fn rearm(&mut self) {
        self.fired = false;
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }
}

/// Timeline time produced by one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackTick {
    pub time: f64,
    /// Playback crossed the track window end on this frame and has been stopped.
    pub ended: bool,
}

/// Media-element-driven sync: the active clip's element position is the source of truth.
///
/// Across a gap between clips the element of the clip just left keeps playing hidden and
/// carries the time until the next clip's interval is reached. When that element has run
/// out of source, playback jumps to the next clip start (or the window end).
#[derive(Debug)]
pub struct MediaSync<M> {
    registry: MediaRegistry<M>,
    state: PlaybackState,
    active: Option<Uuid>,
    carrier: Option<Uuid>,
    position: f64,
    latch: EndLatch,
    resync_tolerance: f64,
}

impl<M: MediaElement> MediaSync<M> {
    pub fn new(resync_tolerance: f64) -> Self {
        Self {
            registry: MediaRegistry::new(),
            state: PlaybackState::Stopped,
            active: None,
            carrier: None,
            position: 0.0,
            latch: EndLatch::default(),
            resync_tolerance,
        }
    }

    pub fn registry(&self) -> &MediaRegistry<M> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut MediaRegistry<M> {
        &mut self.registry
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn active_clip(&self) -> Option<Uuid> {
        self.active
    }

    pub fn play(&mut self, clips: &ClipTrack, time: f64) {
        tracing::debug!(time, "media playback started");
        self.state = PlaybackState::Playing;
        self.latch.rearm();
        self.align(clips, time);
    }

    pub fn pause(&mut self) {
        tracing::debug!("media playback paused");
        self.state = PlaybackState::Paused;
        self.registry.pause_all();
    }

    pub fn stop(&mut self) {
        tracing::debug!("media playback stopped");
        self.state = PlaybackState::Stopped;
        self.registry.pause_all();
    }

    pub fn seek(&mut self, clips: &ClipTrack, time: f64) {
        tracing::debug!(time, state = ?self.state, "media seek");
        self.latch.rearm();
        self.align(clips, time);
    }

    /// Make the clip under `time` the only visible element and bring it to `time`.
    ///
    /// The element is only seeked when it has drifted past the resync tolerance.
    pub fn align(&mut self, clips: &ClipTrack, time: f64) -> Option<Uuid> {
        let clip = clips.active_clip_at(time);
        self.active = clip.map(|c| c.id);
        self.carrier = self.active;
        self.position = time;
        let playing = self.state == PlaybackState::Playing;
        let tolerance = self.resync_tolerance;

        let element = self.registry.isolate(self.active)?;
        let clip = clip?;
        let target = clip.source_time_at(time);
        if (element.current_time() - target).abs() > tolerance {
            element.seek(target);
        }
        if playing && element.is_paused() {
            element.play();
        } else if !playing && !element.is_paused() {
            element.pause();
        }
        Some(clip.id)
    }

    /// Read the carrying element once and translate its position to timeline time.
    ///
    /// Returns `None` only when not playing.
    pub fn tick(&mut self, clips: &ClipTrack, window: TrackWindow) -> Option<PlaybackTick> {
        if self.state != PlaybackState::Playing {
            return None;
        }
        let time = match self.carried_time(clips) {
            Some(time) => time,
            None => self.next_clip_start(clips, window.end),
        };
        self.position = time;

        let in_active = self
            .active
            .and_then(|id| clips.get(id))
            .is_some_and(|clip| clip.contains(time));
        if !in_active {
            if clips.active_clip_at(time).is_some() {
                self.align(clips, time);
            } else {
                self.enter_gap();
            }
        }

        if self.latch.observe(time, window.end) {
            tracing::info!(time, end = window.end, "playback reached track end");
            self.stop();
            return Some(PlaybackTick {
                time: window.end,
                ended: true,
            });
        }
        Some(PlaybackTick { time, ended: false })
    }

    /// Timeline time from the carrier's element, unless it has no source left.
    fn carried_time(&self, clips: &ClipTrack) -> Option<f64> {
        let clip = clips.get(self.carrier?)?;
        let element = self.registry.get(clip.id)?;
        let duration = element.duration();
        if duration > 0.0 && element.current_time() >= duration {
            return None;
        }
        Some(clip.timeline_time_at(element.current_time()))
    }

    fn next_clip_start(&self, clips: &ClipTrack, end: f64) -> f64 {
        clips
            .clips()
            .iter()
            .map(|c| c.timeline_offset)
            .find(|&offset| offset > self.position)
            .unwrap_or(end)
            .min(end)
    }

    /// No clip under the playhead: hide the carrier but let it keep running.
    fn enter_gap(&mut self) {
        self.active = None;
        if let Some(element) = self.carrier.and_then(|id| self.registry.get_mut(id)) {
            element.set_visible(false);
        }
        tracing::debug!(time = self.position, "playback entered a gap between clips");
    }
}

/// Clock reading and timeline position captured when playback (re)started.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClockAnchor {
    pub clock_at_start: f64,
    pub timeline_at_start: f64,
}

/// Audio-clock-driven sync: the output clock is the source of truth and every audio
/// buffer is (re)started against the same anchor.
pub struct AudioClockSync<C, S> {
    clock: C,
    scheduler: S,
    tracks: Vec<AudioTrack>,
    video: Option<Box<dyn MediaElement + Send>>,
    sources: Vec<SourceId>,
    state: PlaybackState,
    anchor: ClockAnchor,
    latch: EndLatch,
}

impl<C: AudioClock, S: AudioScheduler> AudioClockSync<C, S> {
    pub fn new(clock: C, scheduler: S) -> Self {
        Self {
            clock,
            scheduler,
            tracks: Vec::new(),
            video: None,
            sources: Vec::new(),
            state: PlaybackState::Stopped,
            anchor: ClockAnchor::default(),
            latch: EndLatch::default(),
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn anchor(&self) -> ClockAnchor {
        self.anchor
    }

    pub fn tracks(&self) -> &[AudioTrack] {
        &self.tracks
    }

    /// Replace the track set; while playing, the new set starts at the current position.
    pub fn set_tracks(&mut self, tracks: Vec<AudioTrack>) {
        self.tracks = tracks;
        if self.state == PlaybackState::Playing {
            let time = self.current_time();
            self.stop_sources();
            self.anchor = ClockAnchor {
                clock_at_start: self.clock.now(),
                timeline_at_start: time,
            };
            self.schedule_sources(time);
        }
    }

    /// Video element that follows the clock muted; returns the one it replaces.
    pub fn attach_video(&mut self, video: Box<dyn MediaElement + Send>) -> Option<Box<dyn MediaElement + Send>> {
        self.video.replace(video)
    }

    pub fn current_time(&self) -> f64 {
        match self.state {
            PlaybackState::Playing => {
                self.anchor.timeline_at_start + (self.clock.now() - self.anchor.clock_at_start)
            }
            _ => self.anchor.timeline_at_start,
        }
    }

    pub fn play(&mut self, time: f64) {
        if self.state == PlaybackState::Playing {
            return;
        }
        tracing::debug!(time, "clock playback started");
        self.anchor = ClockAnchor {
            clock_at_start: self.clock.now(),
            timeline_at_start: time,
        };
        self.latch.rearm();
        self.seek_video(time);
        if let Some(video) = self.video.as_mut() {
            video.play();
        }
        self.schedule_sources(time);
        self.state = PlaybackState::Playing;
    }

    pub fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        self.halt(PlaybackState::Paused);
    }

    pub fn stop(&mut self) {
        self.halt(PlaybackState::Stopped);
    }

    /// Jump to `time`. While playing, every source is stopped and started again.
    pub fn seek(&mut self, time: f64) {
        tracing::debug!(time, state = ?self.state, "clock seek");
        self.stop_sources();
        self.seek_video(time);
        self.anchor = ClockAnchor {
            clock_at_start: self.clock.now(),
            timeline_at_start: time,
        };
        self.latch.rearm();
        if self.state == PlaybackState::Playing {
            self.schedule_sources(time);
        }
    }

    pub fn tick(&mut self, end: f64) -> Option<PlaybackTick> {
        if self.state != PlaybackState::Playing {
            return None;
        }
        let time = self.current_time();
        if self.latch.observe(time, end) {
            tracing::info!(time, end, "playback reached track end");
            self.halt(PlaybackState::Stopped);
            self.anchor.timeline_at_start = end;
            return Some(PlaybackTick { time: end, ended: true });
        }
        Some(PlaybackTick { time, ended: false })
    }

    fn halt(&mut self, state: PlaybackState) {
        let time = self.current_time();
        tracing::debug!(time, ?state, "clock playback halted");
        self.stop_sources();
        if let Some(video) = self.video.as_mut() {
            video.pause();
        }
        self.anchor.timeline_at_start = time;
        self.state = state;
    }

    fn seek_video(&mut self, time: f64) {
        if let Some(video) = self.video.as_mut() {
            let duration = video.duration();
            let target = if duration > 0.0 { time.min(duration) } else { time };
            video.seek(target);
        }
    }

    fn schedule_sources(&mut self, time: f64) {
        let now = self.clock.now();
        for track in &self.tracks {
            let Some(plan) = SourcePlan::for_track(track, now, time) else {
                continue;
            };
            match self.scheduler.start(track, plan.when, plan.offset, plan.duration) {
                Ok(source) => self.sources.push(source),
                Err(err) => {
                    tracing::warn!(track = %track.name, error = %err, "audio source failed to start");
                }
            }
        }
    }

    fn stop_sources(&mut self) {
        for source in self.sources.drain(..) {
            self.scheduler.stop(source);
        }
    }
}
