use crate::models::error::SessionError;

/// Mono samples recovered from a compressed or container-wrapped recording.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    /// The container's native sample rate.
    pub sample_rate: u32,
}

/// External capability that turns recorded container bytes into samples.
///
/// Decoding is best-effort: a failure skips the local waveform but must
/// not abort the upload path, since the captured bytes can still be
/// forwarded as-is.
pub trait ChunkDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedAudio, SessionError>;
}
