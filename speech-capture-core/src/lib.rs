//! # speech-capture-core
//!
//! Platform-agnostic voice capture core.
//!
//! Owns the capture-session lifecycle and the PCM ↔ WAV codec: the state
//! machine governing a recording, the real-time level meter, the sample
//! accumulator, the binary WAV encoder/decoder, and the waveform
//! downsampler used for local display. The hardware input stream,
//! container decoding, and the remote analysis exchange are external
//! collaborators that plug in through traits (an HTTP analysis backend
//! lives in the sibling `speech-analysis-client` crate).
//!
//! ## Architecture
//!
//! ```text
//! speech-capture-core (this crate)
//! ├── traits/       ← InputProvider, ChunkDecoder, SessionDelegate, AnalysisClient
//! ├── models/       ← SessionError, SessionState, SessionConfig, LevelSample, ...
//! ├── processing/   ← WAV codec, level meter, PCM accumulator, downsampler
//! └── session/      ← CaptureSession (orchestrator) + meter loop
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::analysis::{
    AnalysisKind, AnalysisPayload, AnalysisReport, AnalysisStatus, DiadochokineticAnalysis,
    GeneralAnalysis, SyllableEvent, TimeSeries, VowelAnalysis,
};
pub use models::config::{CaptureMode, SessionConfig};
pub use models::error::SessionError;
pub use models::level::LevelSample;
pub use models::output::{SessionMetadata, SessionOutput};
pub use models::state::SessionState;
pub use processing::downsampler::WaveformPoint;
pub use processing::pcm_buffer::PcmBuffer;
pub use processing::wav_codec::WavContainer;
pub use session::capture::CaptureSession;
pub use session::meter_loop::MeterHandle;
pub use traits::analysis_client::AnalysisClient;
pub use traits::chunk_decoder::{ChunkDecoder, DecodedAudio};
pub use traits::input_provider::{
    AudioBlockCallback, CaptureSinks, ContainerChunkCallback, InputDevice, InputProvider,
};
pub use traits::session_delegate::SessionDelegate;
