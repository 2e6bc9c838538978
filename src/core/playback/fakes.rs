//! Hardware-free stand-ins for the playback seams, used by tests and headless runs.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use super::audio::{AudioScheduler, AudioTrack, SourceId};
use super::media::MediaElement;
use crate::error::PlaybackError;

#[derive(Clone, Debug, PartialEq)]
pub enum MediaCall {
    Seek(String, f64),
    Play(String),
    Pause(String),
}

/// Call log shared by several fake elements, so ordering across elements is visible.
#[derive(Clone, Debug, Default)]
pub struct MediaLog(Arc<Mutex<Vec<MediaCall>>>);

impl MediaLog {
    fn record(&self, call: MediaCall) {
        if let Ok(mut calls) = self.0.lock() {
            calls.push(call);
        }
    }

    pub fn calls(&self) -> Vec<MediaCall> {
        self.0.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut calls) = self.0.lock() {
            calls.clear();
        }
    }
}

/// Media element whose position only changes through `seek` or [`FakeMedia::set_time`].
#[derive(Clone, Debug)]
pub struct FakeMedia {
    pub label: String,
    pub time: f64,
    pub duration: f64,
    pub paused: bool,
    pub visible: bool,
    pub size: Option<(u32, u32)>,
    log: MediaLog,
}

impl FakeMedia {
    pub fn new(label: impl Into<String>, duration: f64, log: MediaLog) -> Self {
        Self {
            label: label.into(),
            time: 0.0,
            duration,
            paused: true,
            visible: false,
            size: Some((1280, 720)),
            log,
        }
    }

    /// Simulate decoder progress.
    pub fn set_time(&mut self, time: f64) {
        self.time = time;
    }
}

impl MediaElement for FakeMedia {
    fn seek(&mut self, time: f64) {
        self.time = time;
        self.log.record(MediaCall::Seek(self.label.clone(), time));
    }

    fn play(&mut self) {
        self.paused = false;
        self.log.record(MediaCall::Play(self.label.clone()));
    }

    fn pause(&mut self) {
        self.paused = true;
        self.log.record(MediaCall::Pause(self.label.clone()));
    }

    fn current_time(&self) -> f64 {
        self.time
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn video_size(&self) -> Option<(u32, u32)> {
        self.size
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StartedSource {
    pub source: SourceId,
    pub track_id: Uuid,
    pub when: f64,
    pub offset: f64,
    pub duration: f64,
}

/// Scheduler that records every start and stop instead of producing sound.
#[derive(Debug, Default)]
pub struct RecordingScheduler {
    pub started: Vec<StartedSource>,
    pub stopped: Vec<SourceId>,
    failing: HashSet<Uuid>,
    next_id: u64,
}

impl RecordingScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later start of `track_id` fail.
    pub fn fail_track(&mut self, track_id: Uuid) {
        self.failing.insert(track_id);
    }

    /// Sources started and not yet stopped.
    pub fn active(&self) -> Vec<StartedSource> {
        self.started
            .iter()
            .filter(|s| !self.stopped.contains(&s.source))
            .copied()
            .collect()
    }
}

impl AudioScheduler for RecordingScheduler {
    fn start(
        &mut self,
        track: &AudioTrack,
        when: f64,
        offset: f64,
        duration: f64,
    ) -> Result<SourceId, PlaybackError> {
        if self.failing.contains(&track.id) {
            return Err(PlaybackError::SourceStart(format!(
                "track {} rejected",
                track.name
            )));
        }
        self.next_id += 1;
        let source = SourceId(self.next_id);
        self.started.push(StartedSource {
            source,
            track_id: track.id,
            when,
            offset,
            duration,
        });
        Ok(source)
    }

    fn stop(&mut self, source: SourceId) {
        if !self.stopped.contains(&source) {
            self.stopped.push(source);
        }
    }
}
