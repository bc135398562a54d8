//! Sound hook for landing items
//!
//! Playback is external and fire-and-forget.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Name of a sound sample
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SampleId(pub String);

impl SampleId {
    pub fn new(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// Receives sample playback requests
pub trait SoundSink {
    fn play_sample(&mut self, sample: &SampleId, position: Vec3, gain: f32);
}

/// A playback request, as recorded by [`RecordingSound`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayedSample {
    pub sample: SampleId,
    pub position: Vec3,
    pub gain: f32,
}

/// Keeps every request; handy for tests and replay summaries
#[derive(Debug, Clone, Default)]
pub struct RecordingSound {
    pub played: Vec<PlayedSample>,
}

impl SoundSink for RecordingSound {
    fn play_sample(&mut self, sample: &SampleId, position: Vec3, gain: f32) {
        self.played.push(PlayedSample {
            sample: sample.clone(),
            position,
            gain,
        });
    }
}

/// Writes requests to the log instead of playing them
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSound;

impl SoundSink for TracingSound {
    fn play_sample(&mut self, sample: &SampleId, position: Vec3, gain: f32) {
        tracing::debug!("Playing {} at {:?} (gain {})", sample.0, position, gain);
    }
}
