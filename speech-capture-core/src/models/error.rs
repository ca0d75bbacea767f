use thiserror::Error;

/// Errors surfaced by the capture lifecycle and its collaborators.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("microphone permission denied")]
    PermissionDenied,

    #[error("no input device available")]
    DeviceNotAvailable,

    #[error("a capture session is already active")]
    AlreadyRecording,

    #[error("decode failed: {0}")]
    DecodeFailed(String),

    #[error("encode invariant violated: {0}")]
    EncodeInvariant(String),

    #[error("upload failed: {0}")]
    UploadFailed(String),
}

impl SessionError {
    /// Device-class failures; recoverable by starting a fresh session.
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::PermissionDenied | Self::DeviceNotAvailable)
    }
}
