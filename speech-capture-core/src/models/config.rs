use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::analysis::AnalysisKind;

/// How captured audio reaches the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaptureMode {
    /// Float sample blocks delivered directly from the capture pipeline.
    RawPcm,
    /// Opaque container chunks recorded by the platform, decoded after stop.
    StreamedContainer,
}

/// Configuration for a capture session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Capture sample rate in Hz (default: 48000; the analysis service
    /// rejects diadochokinetic recordings at any other rate).
    pub sample_rate: u32,

    /// Number of capture channels (1 or 2, default: 1).
    pub channel_count: u16,

    /// How audio reaches the session.
    pub mode: CaptureMode,

    /// Which remote analysis the finished recording is submitted to.
    pub kind: AnalysisKind,

    /// Level meter tick cadence (default: one 60 Hz display frame).
    pub meter_interval: Duration,
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_rate == 0 {
            return Err("sample rate must be positive".into());
        }
        if !(1..=2).contains(&self.channel_count) {
            return Err(format!("unsupported channel count: {}", self.channel_count));
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            channel_count: 1,
            mode: CaptureMode::RawPcm,
            kind: AnalysisKind::General,
            meter_interval: Duration::from_millis(16),
        }
    }
}
