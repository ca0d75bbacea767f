use serde::{Deserialize, Serialize};

use super::error::SessionError;

/// Which remote analysis a finished recording is submitted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisKind {
    /// Full time-series feature extraction.
    General,
    /// Vowel formant measurement for a sustained target vowel.
    Vowel { target: String },
    /// Diadochokinetic (pa-ta-ka) syllable timing.
    Diadochokinetic,
}

/// Finalized bytes handed to the analysis boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisPayload {
    /// A well-formed WAV container, byte-exact as encoded.
    Wav(Vec<u8>),
    /// Originally captured container bytes, forwarded when decoding for
    /// local visualization failed.
    Container(Vec<u8>),
}

impl AnalysisPayload {
    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Wav(bytes) | Self::Container(bytes) => bytes,
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Wav(_) => "recording.wav",
            Self::Container(_) => "recording.webm",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Wav(_) => "audio/wav",
            Self::Container(_) => "application/octet-stream",
        }
    }
}

/// A named time/value series in an analysis response.
///
/// The service may omit any series entirely; both halves default empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    #[serde(default)]
    pub times: Vec<f64>,
    #[serde(default)]
    pub values: Vec<f64>,
}

/// Full feature-extraction result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralAnalysis {
    #[serde(default)]
    pub duration: f64,
    #[serde(default, rename = "sr")]
    pub sample_rate: u32,
    #[serde(default)]
    pub pitch: Option<TimeSeries>,
    #[serde(default)]
    pub rms: Option<TimeSeries>,
    #[serde(default)]
    pub loudness: Option<TimeSeries>,
    #[serde(default)]
    pub jitter: Option<TimeSeries>,
    #[serde(default)]
    pub shimmer: Option<TimeSeries>,
    #[serde(default)]
    pub zcr: Option<TimeSeries>,
    #[serde(default, rename = "spectralCentroid")]
    pub spectral_centroid: Option<TimeSeries>,
    #[serde(default)]
    pub speech_rate_sps: Option<f64>,
    #[serde(default)]
    pub jitter_local: Option<f64>,
    #[serde(default)]
    pub shimmer_local: Option<f64>,
}

/// Vowel formant result. Formant tracking can fail, so both are nullable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VowelAnalysis {
    #[serde(default)]
    pub f1: Option<f64>,
    #[serde(default)]
    pub f2: Option<f64>,
}

/// One detected syllable in a diadochokinetic recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyllableEvent {
    pub text: String,
    pub time: f64,
}

/// Diadochokinetic (pa-ta-ka) result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiadochokineticAnalysis {
    #[serde(default)]
    pub syllables: Vec<SyllableEvent>,
    #[serde(default)]
    pub duration: f64,
    /// Base64-encoded PNG rendered by the service.
    #[serde(default)]
    pub waveform_png: Option<String>,
}

/// A structured result from the analysis service.
///
/// The shape differs per [`AnalysisKind`]; consumers must not assume one
/// shape across modes.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisReport {
    General(GeneralAnalysis),
    Vowel(VowelAnalysis),
    Diadochokinetic(DiadochokineticAnalysis),
}

/// Where the remote exchange stands for a session.
///
/// The exchange is fire-and-forget relative to local output: a session is
/// `Ready` with its waveform while this is still `Awaiting`.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisStatus {
    NotRequested,
    Awaiting,
    Complete(AnalysisReport),
    /// Terminal for the session; there is no retry.
    Failed(SessionError),
}

impl AnalysisStatus {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Complete(_) | Self::Failed(_))
    }
}
