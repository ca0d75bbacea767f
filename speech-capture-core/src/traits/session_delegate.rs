use crate::models::analysis::AnalysisStatus;
use crate::models::error::SessionError;
use crate::models::level::LevelSample;
use crate::models::output::SessionOutput;
use crate::models::state::SessionState;

/// Event sink for capture session notifications.
///
/// Methods are called from worker threads (the meter loop, the upload
/// thread) as well as the owning thread; implementations should marshal
/// to the UI thread if needed.
pub trait SessionDelegate: Send + Sync {
    /// Called on every state transition.
    fn on_state_changed(&self, state: &SessionState);

    /// Called once per meter tick while recording.
    fn on_level(&self, level: &LevelSample);

    /// Called when the session fails.
    fn on_error(&self, error: &SessionError);

    /// Called when finalization produced the local output.
    fn on_output_ready(&self, output: &SessionOutput);

    /// Called when the remote analysis exchange resolves, either way.
    fn on_analysis_resolved(&self, status: &AnalysisStatus);
}
