use serde::{Deserialize, Serialize};

use super::config::CaptureMode;
use crate::processing::downsampler::WaveformPoint;
use crate::processing::wav_codec::WavContainer;

/// Local result of a finished capture session.
///
/// Produced during finalization, before (and independent of) the remote
/// analysis exchange. `wav` is absent only when a streamed-container
/// recording could not be decoded; `container_bytes` then carries the
/// originally captured bytes so the upload can still proceed.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOutput {
    pub duration_secs: f64,
    pub wav: Option<WavContainer>,
    pub container_bytes: Option<Vec<u8>>,
    pub waveform: Vec<WaveformPoint>,
    pub metadata: SessionMetadata,
}

/// Descriptive metadata for a recording, serializable for the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMetadata {
    pub id: String,
    pub created_at: String,
    pub sample_rate: u32,
    pub channel_count: u16,
    pub mode: CaptureMode,
}
