//! Output device mixer (cpal). Serves as both the audio clock and the source scheduler.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex,
};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::core::playback::{AudioClock, AudioScheduler, AudioTrack, SourceId};
use crate::error::PlaybackError;

#[derive(Clone)]
struct ScheduledItem {
    source: SourceId,
    samples: Arc<Vec<f32>>,
    channels: u16,
    /// Source frames per output frame
    rate_ratio: f64,
    gain: f32,
    start_frame: u64,
    source_offset_frames: u64,
    frames: u64,
}

impl ScheduledItem {
    fn end_frame(&self) -> u64 {
        self.start_frame + self.frames
    }
}

pub struct DeviceOutput {
    stream: cpal::Stream,
    items: Arc<Mutex<Vec<ScheduledItem>>>,
    clock_frames: Arc<AtomicU64>,
    next_source: u64,
    sample_rate: u32,
    channels: u16,
}

impl DeviceOutput {
    pub fn new() -> Result<Self, PlaybackError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or_else(|| {
            PlaybackError::AudioDevice("no default audio output device found".to_string())
        })?;
        let config = select_output_config(&device)?;
        let sample_rate = config.sample_rate.0;
        let channels = config.channels;

        let items = Arc::new(Mutex::new(Vec::<ScheduledItem>::new()));
        let clock_frames = Arc::new(AtomicU64::new(0));

        let items_for_cb = Arc::clone(&items);
        let clock_for_cb = Arc::clone(&clock_frames);
        let out_channels = channels as usize;

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _| {
                    for sample in data.iter_mut() {
                        *sample = 0.0;
                    }
                    let frames = (data.len() / out_channels) as u64;
                    let start_frame = clock_for_cb.load(Ordering::Relaxed);
                    let end_frame = start_frame + frames;

                    if let Ok(mut items) = items_for_cb.lock() {
                        items.retain(|item| item.end_frame() > start_frame);
                        for item in items.iter() {
                            mix_item(item, data, out_channels, start_frame, end_frame);
                        }
                    }

                    clock_for_cb.store(end_frame, Ordering::Relaxed);
                },
                move |err| {
                    tracing::error!(error = %err, "audio output error");
                },
                None,
            )
            .map_err(|err| PlaybackError::AudioDevice(err.to_string()))?;

        stream
            .play()
            .map_err(|err| PlaybackError::AudioDevice(err.to_string()))?;
        tracing::info!(sample_rate, channels, "audio output opened");

        Ok(Self {
            stream,
            items,
            clock_frames,
            next_source: 0,
            sample_rate,
            channels,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn suspend(&self) -> Result<(), PlaybackError> {
        self.stream
            .pause()
            .map_err(|err| PlaybackError::AudioDevice(err.to_string()))
    }

    pub fn resume(&self) -> Result<(), PlaybackError> {
        self.stream
            .play()
            .map_err(|err| PlaybackError::AudioDevice(err.to_string()))
    }
}

impl AudioClock for DeviceOutput {
    fn now(&self) -> f64 {
        self.clock_frames.load(Ordering::Relaxed) as f64 / self.sample_rate as f64
    }
}

impl AudioScheduler for DeviceOutput {
    fn start(
        &mut self,
        track: &AudioTrack,
        when: f64,
        offset: f64,
        duration: f64,
    ) -> Result<SourceId, PlaybackError> {
        let buffer = &track.buffer;
        if buffer.sample_rate == 0 || buffer.channels == 0 {
            return Err(PlaybackError::SourceStart(format!(
                "track {} has no decodable audio",
                track.name
            )));
        }
        self.next_source += 1;
        let source = SourceId(self.next_source);
        let output_rate = self.sample_rate as f64;
        let item = ScheduledItem {
            source,
            samples: Arc::clone(&buffer.samples),
            channels: buffer.channels,
            rate_ratio: buffer.sample_rate as f64 / output_rate,
            gain: track.gain,
            start_frame: (when.max(0.0) * output_rate).round() as u64,
            source_offset_frames: (offset.max(0.0) * buffer.sample_rate as f64).round() as u64,
            frames: (duration.max(0.0) * output_rate).round() as u64,
        };
        let mut items = self
            .items
            .lock()
            .map_err(|_| PlaybackError::SourceStart("mixer lock poisoned".to_string()))?;
        items.push(item);
        Ok(source)
    }

    fn stop(&mut self, source: SourceId) {
        if let Ok(mut items) = self.items.lock() {
            items.retain(|item| item.source != source);
        }
    }
}

fn mix_item(item: &ScheduledItem, data: &mut [f32], out_channels: usize, start: u64, end: u64) {
    let item_start = item.start_frame;
    let item_end = item.end_frame();
    if item_end <= start || item_start >= end {
        return;
    }
    let in_channels = item.channels.max(1) as usize;
    let source_frames = (item.samples.len() / in_channels) as u64;

    for frame in start.max(item_start)..end.min(item_end) {
        let elapsed = (frame - item_start) as f64 * item.rate_ratio;
        let source_frame = item.source_offset_frames + elapsed as u64;
        if source_frame >= source_frames {
            break;
        }
        let out_base = (frame - start) as usize * out_channels;
        let in_base = source_frame as usize * in_channels;
        for ch in 0..out_channels {
            let in_ch = ch.min(in_channels - 1);
            data[out_base + ch] += item.samples[in_base + in_ch] * item.gain;
        }
    }
}

fn select_output_config(device: &cpal::Device) -> Result<cpal::StreamConfig, PlaybackError> {
    let configs: Vec<_> = device
        .supported_output_configs()
        .map_err(|err| PlaybackError::AudioDevice(err.to_string()))?
        .filter(|config| config.sample_format() == cpal::SampleFormat::F32)
        .collect();

    let target_rate = cpal::SampleRate(48_000);
    if let Some(config) = configs.iter().find(|config| {
        config.min_sample_rate() <= target_rate && config.max_sample_rate() >= target_rate
    }) {
        return Ok(config.with_sample_rate(target_rate).config());
    }

    let default_config = device
        .default_output_config()
        .map_err(|err| PlaybackError::AudioDevice(err.to_string()))?;
    if default_config.sample_format() != cpal::SampleFormat::F32 {
        return Err(PlaybackError::AudioDevice(
            "default output device does not support f32 samples".to_string(),
        ));
    }
    Ok(default_config.config())
}
