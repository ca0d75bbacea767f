//! HTTP client for the acoustic-analysis service.
//!
//! One multipart POST per finished recording; the endpoint and the
//! response shape are selected by the session's [`AnalysisKind`].

use reqwest::blocking::{multipart, Client};

use speech_capture_core::models::analysis::{
    AnalysisKind, AnalysisPayload, AnalysisReport, DiadochokineticAnalysis, GeneralAnalysis,
    VowelAnalysis,
};
use speech_capture_core::models::error::SessionError;
use speech_capture_core::traits::analysis_client::AnalysisClient;

const USER_AGENT: &str = concat!("speech-capture/", env!("CARGO_PKG_VERSION"));

const GENERAL_PATH: &str = "/analyze";
const VOWEL_PATH: &str = "/analyze_vowel";
const DIADOCHOKINETIC_PATH: &str = "/process-pata-ka";

/// The multipart field the service reads the recording from.
const FILE_FIELD: &str = "file";

/// Blocking multipart uploader implementing the core's analysis boundary.
///
/// Deliberately carries no request timeout: the core treats the exchange
/// as unbounded and a hung request simply leaves the session awaiting its
/// result. Failures of any kind map to [`SessionError::UploadFailed`] and
/// are terminal; the caller never retries.
pub struct HttpAnalysisClient {
    http: Client,
    base_url: String,
}

impl HttpAnalysisClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, SessionError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SessionError::UploadFailed(format!("http client setup failed: {}", e)))?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self { http, base_url })
    }

    fn endpoint(&self, kind: &AnalysisKind) -> String {
        let path = match kind {
            AnalysisKind::General => GENERAL_PATH,
            AnalysisKind::Vowel { .. } => VOWEL_PATH,
            AnalysisKind::Diadochokinetic => DIADOCHOKINETIC_PATH,
        };
        format!("{}{}", self.base_url, path)
    }

    fn build_form(
        kind: &AnalysisKind,
        payload: &AnalysisPayload,
    ) -> Result<multipart::Form, SessionError> {
        let part = multipart::Part::bytes(payload.bytes().to_vec())
            .file_name(payload.file_name())
            .mime_str(payload.mime_type())
            .map_err(|e| SessionError::UploadFailed(format!("invalid payload mime type: {}", e)))?;

        let mut form = multipart::Form::new().part(FILE_FIELD, part);
        if let AnalysisKind::Vowel { target } = kind {
            form = form.text("vowel", target.clone());
        }
        Ok(form)
    }
}

impl AnalysisClient for HttpAnalysisClient {
    fn analyze(
        &self,
        kind: &AnalysisKind,
        payload: &AnalysisPayload,
    ) -> Result<AnalysisReport, SessionError> {
        let url = self.endpoint(kind);
        let form = Self::build_form(kind, payload)?;

        log::debug!("uploading {} bytes to {}", payload.bytes().len(), url);

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .map_err(|e| SessionError::UploadFailed(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SessionError::UploadFailed(format!(
                "{} returned {}",
                url, status
            )));
        }

        let body = response
            .text()
            .map_err(|e| SessionError::UploadFailed(format!("reading response body: {}", e)))?;
        parse_report(kind, &body)
    }
}

/// Parse a response body into the shape matching the requested analysis.
///
/// The three endpoints return different shapes; none is assumed beyond
/// the mode that was requested, and any named series may be absent.
pub(crate) fn parse_report(kind: &AnalysisKind, body: &str) -> Result<AnalysisReport, SessionError> {
    let malformed = |e: serde_json::Error| {
        SessionError::UploadFailed(format!("malformed analysis result: {}", e))
    };

    Ok(match kind {
        AnalysisKind::General => {
            AnalysisReport::General(serde_json::from_str::<GeneralAnalysis>(body).map_err(malformed)?)
        }
        AnalysisKind::Vowel { .. } => {
            AnalysisReport::Vowel(serde_json::from_str::<VowelAnalysis>(body).map_err(malformed)?)
        }
        AnalysisKind::Diadochokinetic => AnalysisReport::Diadochokinetic(
            serde_json::from_str::<DiadochokineticAnalysis>(body).map_err(malformed)?,
        ),
    })
}
