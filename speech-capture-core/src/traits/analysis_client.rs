use crate::models::analysis::{AnalysisKind, AnalysisPayload, AnalysisReport};
use crate::models::error::SessionError;

/// Boundary to the remote acoustic-analysis service.
///
/// Invoked from the session's upload thread with a finalized payload.
/// Blocking; the core imposes no timeout, so a hung exchange leaves the
/// session awaiting its result. A non-success response or malformed body
/// maps to [`SessionError::UploadFailed`] and is terminal; there is no
/// retry.
pub trait AnalysisClient: Send + Sync {
    fn analyze(
        &self,
        kind: &AnalysisKind,
        payload: &AnalysisPayload,
    ) -> Result<AnalysisReport, SessionError>;
}
