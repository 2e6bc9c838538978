//! Decoded audio tracks and the buffer-source scheduling seam.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::PlaybackError;

/// Handle of one started buffer source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SourceId(pub u64);

/// Interleaved f32 samples at a fixed rate.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedAudio {
    pub samples: Arc<Vec<f32>>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl DecodedAudio {
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Self {
        Self {
            samples: Arc::new(samples),
            sample_rate,
            channels,
        }
    }

    pub fn frames(&self) -> u64 {
        let channels = self.channels.max(1) as usize;
        (self.samples.len() / channels) as u64
    }

    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / self.sample_rate as f64
    }
}

/// Narration, voice, or effect buffer placed on the timeline.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioTrack {
    pub id: Uuid,
    pub name: String,
    /// Timeline second the buffer starts at
    pub start_at: f64,
    pub gain: f32,
    pub buffer: DecodedAudio,
}

impl AudioTrack {
    pub fn new(name: impl Into<String>, start_at: f64, buffer: DecodedAudio) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            start_at,
            gain: 1.0,
            buffer,
        }
    }

    pub fn end(&self) -> f64 {
        self.start_at + self.buffer.duration()
    }
}

/// Where and how far into its buffer a track starts for a given timeline position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourcePlan {
    /// Clock time to start at
    pub when: f64,
    /// Seconds into the buffer
    pub offset: f64,
    /// Seconds of buffer left to play
    pub duration: f64,
}

impl SourcePlan {
    /// `None` when the track has already finished at `timeline_time`.
    pub fn for_track(track: &AudioTrack, clock_now: f64, timeline_time: f64) -> Option<Self> {
        if timeline_time >= track.end() {
            return None;
        }
        let offset = (timeline_time - track.start_at).max(0.0);
        Some(Self {
            when: clock_now + (track.start_at - timeline_time).max(0.0),
            offset,
            duration: track.buffer.duration() - offset,
        })
    }
}

/// Starts one-shot buffer sources. A started source cannot be paused, only stopped.
pub trait AudioScheduler {
    fn start(
        &mut self,
        track: &AudioTrack,
        when: f64,
        offset: f64,
        duration: f64,
    ) -> Result<SourceId, PlaybackError>;

    /// Stopping an already finished or unknown source is a no-op.
    fn stop(&mut self, source: SourceId);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn track(start_at: f64, seconds: usize) -> AudioTrack {
        AudioTrack::new("voice", start_at, DecodedAudio::new(vec![0.0; seconds * 200], 100, 2))
    }

    #[test]
    fn test_decoded_duration() {
        let audio = DecodedAudio::new(vec![0.0; 96_000], 48_000, 2);
        assert_eq!(audio.frames(), 48_000);
        assert_relative_eq!(audio.duration(), 1.0);
    }

    #[test]
    fn test_plan_for_track_starting_later() {
        let plan = SourcePlan::for_track(&track(5.0, 4), 100.0, 2.0).unwrap();
        assert_relative_eq!(plan.when, 103.0);
        assert_relative_eq!(plan.offset, 0.0);
        assert_relative_eq!(plan.duration, 4.0);
    }

    #[test]
    fn test_plan_for_track_in_progress() {
        let plan = SourcePlan::for_track(&track(1.0, 4), 100.0, 2.5).unwrap();
        assert_relative_eq!(plan.when, 100.0);
        assert_relative_eq!(plan.offset, 1.5);
        assert_relative_eq!(plan.duration, 2.5);
    }

    #[test]
    fn test_finished_track_is_skipped() {
        assert!(SourcePlan::for_track(&track(1.0, 4), 100.0, 5.0).is_none());
    }
}
