use super::error::SessionError;
use super::output::SessionOutput;

/// Capture session state machine.
///
/// State transitions:
/// ```text
/// idle → requesting → recording → stopping → finalizing → ready
///           ↓                                     ↓
///          idle                                 failed
/// ```
///
/// `Ready` and `Failed` are terminal: a session records once. A failed
/// device request drops back to `Idle` so `start()` can be retried.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    Requesting,
    Recording,
    Stopping,
    Finalizing,
    Ready(Box<SessionOutput>),
    Failed(SessionError),
}

impl SessionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ready(_) | Self::Failed(_))
    }

    /// The finalized output, if the session reached `Ready`.
    pub fn output(&self) -> Option<&SessionOutput> {
        match self {
            Self::Ready(output) => Some(output),
            _ => None,
        }
    }
}
