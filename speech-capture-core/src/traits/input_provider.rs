use std::sync::Arc;

use crate::models::error::SessionError;

/// Callback invoked when a block of live samples is available.
///
/// Parameters:
/// - `samples`: interleaved f32 samples in `[-1, 1]`.
/// - `sample_rate`: the actual rate of the delivered audio.
/// - `channels`: number of interleaved channels.
///
/// Fires on the provider's capture thread; keep processing minimal.
pub type AudioBlockCallback = Arc<dyn Fn(&[f32], f64, u16) + Send + Sync + 'static>;

/// Callback invoked when an opaque container chunk is available
/// (streamed-container mode only).
pub type ContainerChunkCallback = Arc<dyn Fn(&[u8]) + Send + Sync + 'static>;

/// Destinations for data delivered by a running input stream.
#[derive(Clone)]
pub struct CaptureSinks {
    pub on_block: AudioBlockCallback,
    pub on_chunk: Option<ContainerChunkCallback>,
}

/// An audio input device backing a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDevice {
    pub id: String,
    pub name: String,
    pub is_default: bool,
}

/// Interface to the hardware audio input stream.
///
/// The owning session holds the provider exclusively: `start` acquires
/// the stream, `stop` releases it. `stop` is called on every exit path
/// from recording, so implementations must tolerate being stopped after
/// a failed start.
pub trait InputProvider: Send + Sync {
    /// Whether an input device is currently present.
    fn is_available(&self) -> bool;

    /// Acquire the stream and begin delivering data to `sinks`.
    ///
    /// Permission denial maps to [`SessionError::PermissionDenied`].
    fn start(&mut self, sinks: CaptureSinks) -> Result<(), SessionError>;

    /// Stop delivering and release the hardware stream.
    fn stop(&mut self) -> Result<(), SessionError>;

    /// Information about the backing device.
    fn device_info(&self) -> InputDevice;
}
