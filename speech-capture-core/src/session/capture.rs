use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::models::analysis::{AnalysisPayload, AnalysisStatus};
use crate::models::config::{CaptureMode, SessionConfig};
use crate::models::error::SessionError;
use crate::models::level::LevelSample;
use crate::models::output::{SessionMetadata, SessionOutput};
use crate::models::state::SessionState;
use crate::processing::downsampler::{self, WaveformPoint};
use crate::processing::level_meter;
use crate::processing::meter_window::MeterWindow;
use crate::processing::pcm_buffer::PcmBuffer;
use crate::processing::wav_codec::{self, WavContainer};
use crate::session::meter_loop::MeterHandle;
use crate::traits::analysis_client::AnalysisClient;
use crate::traits::chunk_decoder::ChunkDecoder;
use crate::traits::input_provider::{
    AudioBlockCallback, CaptureSinks, ContainerChunkCallback, InputDevice, InputProvider,
};
use crate::traits::session_delegate::SessionDelegate;

/// Mutable session state shared with the meter and upload threads.
struct SessionInner {
    state: SessionState,
    level: LevelSample,
    analysis: AnalysisStatus,
}

/// One capture session: the state machine owning the hardware input
/// stream, the level-meter loop, and the sample accumulator, and the
/// producer of the finalized WAV payload.
///
/// Generic over the hardware backend via [`InputProvider`]. A session
/// records once (`Ready` and `Failed` are terminal) and holds its
/// provider exclusively, so "one active stream" is enforced by ownership
/// rather than process-wide flags. Data flow:
///
/// ```text
/// [InputProvider] → blocks → [MeterWindow] → meter loop → LevelSample
///                        ↘ → [PcmBuffer]  (raw-pcm mode)
///                 → chunks → chunk list    (streamed-container mode)
/// stop() → release stream → finalize → WavContainer + waveform
///        → [AnalysisClient] upload thread (fire-and-forget)
/// ```
pub struct CaptureSession<P: InputProvider> {
    id: Uuid,
    provider: P,
    config: SessionConfig,
    created_at: String,
    inner: Arc<Mutex<SessionInner>>,
    pcm: Arc<Mutex<PcmBuffer>>,
    chunks: Arc<Mutex<Vec<u8>>>,
    window: Arc<Mutex<MeterWindow>>,
    meter: Option<MeterHandle>,
    delegate: Option<Arc<dyn SessionDelegate>>,
    decoder: Option<Arc<dyn ChunkDecoder>>,
    analyzer: Option<Arc<dyn AnalysisClient>>,
}

impl<P: InputProvider> CaptureSession<P> {
    pub fn new(provider: P, config: SessionConfig) -> Self {
        let channel_count = config.channel_count;
        Self {
            id: Uuid::new_v4(),
            provider,
            config,
            created_at: chrono::Utc::now().to_rfc3339(),
            inner: Arc::new(Mutex::new(SessionInner {
                state: SessionState::Idle,
                level: LevelSample::default(),
                analysis: AnalysisStatus::NotRequested,
            })),
            pcm: Arc::new(Mutex::new(PcmBuffer::new(channel_count))),
            chunks: Arc::new(Mutex::new(Vec::new())),
            window: Arc::new(Mutex::new(MeterWindow::new(level_meter::METER_WINDOW))),
            meter: None,
            delegate: None,
            decoder: None,
            analyzer: None,
        }
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn SessionDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn set_chunk_decoder(&mut self, decoder: Arc<dyn ChunkDecoder>) {
        self.decoder = Some(decoder);
    }

    pub fn set_analysis_client(&mut self, client: Arc<dyn AnalysisClient>) {
        self.analyzer = Some(client);
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.inner.lock().state.clone()
    }

    /// The most recent meter tick.
    pub fn level(&self) -> LevelSample {
        self.inner.lock().level
    }

    /// Where the remote exchange stands; `Awaiting` after a successful
    /// stop until the upload thread resolves.
    pub fn analysis_status(&self) -> AnalysisStatus {
        self.inner.lock().analysis.clone()
    }

    pub fn input_device(&self) -> InputDevice {
        self.provider.device_info()
    }

    /// Acquire the input stream and begin recording.
    ///
    /// Only valid from `Idle`; any other state signals `AlreadyRecording`
    /// and leaves the session untouched. Device-class failures return the
    /// session to `Idle` so a fresh attempt can be made.
    pub fn start(&mut self) -> Result<(), SessionError> {
        {
            let inner = self.inner.lock();
            if !inner.state.is_idle() {
                return Err(SessionError::AlreadyRecording);
            }
        }
        self.config
            .validate()
            .map_err(SessionError::EncodeInvariant)?;

        self.set_state(SessionState::Requesting);

        if !self.provider.is_available() {
            self.set_state(SessionState::Idle);
            return Err(SessionError::DeviceNotAvailable);
        }

        // Fresh buffers for this recording.
        *self.pcm.lock() = PcmBuffer::new(self.config.channel_count);
        self.chunks.lock().clear();
        self.window.lock().clear();

        let sinks = self.build_sinks();
        if let Err(error) = self.provider.start(sinks) {
            self.set_state(SessionState::Idle);
            return Err(error);
        }

        self.set_state(SessionState::Recording);
        self.start_meter_loop();
        Ok(())
    }

    /// Stop recording and finalize.
    ///
    /// A stop while not recording is a no-op (`Ok(None)`). The hardware
    /// stream is released and the meter loop cancelled before
    /// finalization on every path, so neither survives a finalization
    /// failure.
    pub fn stop(&mut self) -> Result<Option<SessionOutput>, SessionError> {
        {
            let inner = self.inner.lock();
            if !inner.state.is_recording() {
                return Ok(None);
            }
        }

        self.set_state(SessionState::Stopping);
        self.release_input();
        self.set_state(SessionState::Finalizing);

        match self.finalize() {
            Ok(output) => {
                self.set_state(SessionState::Ready(Box::new(output.clone())));
                if let Some(ref delegate) = self.delegate {
                    delegate.on_output_ready(&output);
                }
                self.dispatch_analysis(&output);
                Ok(Some(output))
            }
            Err(error) => {
                self.set_state(SessionState::Failed(error.clone()));
                if let Some(ref delegate) = self.delegate {
                    delegate.on_error(&error);
                }
                Err(error)
            }
        }
    }

    fn set_state(&self, state: SessionState) {
        {
            let mut inner = self.inner.lock();
            inner.state = state.clone();
        }
        if let Some(ref delegate) = self.delegate {
            delegate.on_state_changed(&state);
        }
    }

    fn build_sinks(&self) -> CaptureSinks {
        let window = Arc::clone(&self.window);
        let pcm = Arc::clone(&self.pcm);
        let accumulate = matches!(self.config.mode, CaptureMode::RawPcm);
        let expected_channels = self.config.channel_count;

        let on_block: AudioBlockCallback =
            Arc::new(move |samples: &[f32], _sample_rate: f64, channels: u16| {
                let mono = level_meter::fold_to_mono(samples, channels as usize);
                window.lock().push(&mono);

                if accumulate {
                    if channels == expected_channels {
                        pcm.lock().push_block(samples);
                    } else {
                        log::warn!(
                            "dropping block with {} channels, session expects {}",
                            channels,
                            expected_channels
                        );
                    }
                }
            });

        let on_chunk: Option<ContainerChunkCallback> = match self.config.mode {
            CaptureMode::StreamedContainer => {
                let chunks = Arc::clone(&self.chunks);
                Some(Arc::new(move |bytes: &[u8]| {
                    chunks.lock().extend_from_slice(bytes);
                }))
            }
            CaptureMode::RawPcm => None,
        };

        CaptureSinks { on_block, on_chunk }
    }

    fn start_meter_loop(&mut self) {
        let inner = Arc::clone(&self.inner);
        let delegate = self.delegate.clone();
        self.meter = Some(MeterHandle::spawn(
            self.config.meter_interval,
            Arc::clone(&self.window),
            move |level| {
                inner.lock().level = level;
                if let Some(ref delegate) = delegate {
                    delegate.on_level(&level);
                }
            },
        ));
    }

    /// Release the hardware stream and cancel the meter loop.
    ///
    /// Runs on every exit path from `Recording`, exactly once per path.
    fn release_input(&mut self) {
        if let Err(error) = self.provider.stop() {
            log::warn!("input stream release reported an error: {}", error);
        }
        if let Some(mut meter) = self.meter.take() {
            meter.cancel();
        }
    }

    fn finalize(&mut self) -> Result<SessionOutput, SessionError> {
        match self.config.mode {
            CaptureMode::RawPcm => {
                let pcm = self.pcm.lock();
                let wav = wav_codec::encode(&pcm, self.config.sample_rate)?;
                let waveform = downsampler::downsample(&pcm.channel(0), self.config.sample_rate);
                Ok(self.output(Some(wav), None, waveform))
            }
            CaptureMode::StreamedContainer => {
                let chunks = std::mem::take(&mut *self.chunks.lock());
                let decoded = self.decoder.as_ref().and_then(|decoder| {
                    match decoder.decode(&chunks) {
                        Ok(audio) => Some(audio),
                        Err(error) => {
                            log::warn!("container decode failed, forwarding raw bytes: {}", error);
                            None
                        }
                    }
                });

                match decoded {
                    Some(audio) => {
                        let waveform = downsampler::downsample(&audio.samples, audio.sample_rate);
                        let pcm = PcmBuffer::from_mono(&audio.samples);
                        let wav = wav_codec::encode(&pcm, audio.sample_rate)?;
                        Ok(self.output(Some(wav), Some(chunks), waveform))
                    }
                    None if chunks.is_empty() => Err(SessionError::DecodeFailed(
                        "no container data captured".into(),
                    )),
                    // Waveform is skipped, but the captured bytes still go
                    // to the analysis service.
                    None => Ok(self.output(None, Some(chunks), Vec::new())),
                }
            }
        }
    }

    fn output(
        &self,
        wav: Option<WavContainer>,
        container_bytes: Option<Vec<u8>>,
        waveform: Vec<WaveformPoint>,
    ) -> SessionOutput {
        // Without a decodable payload the duration is unknown.
        let duration_secs = wav.as_ref().map(WavContainer::duration_secs).unwrap_or(0.0);
        SessionOutput {
            duration_secs,
            wav,
            container_bytes,
            waveform,
            metadata: SessionMetadata {
                id: self.id.to_string(),
                created_at: self.created_at.clone(),
                sample_rate: self.config.sample_rate,
                channel_count: self.config.channel_count,
                mode: self.config.mode,
            },
        }
    }

    /// Hand the finalized payload to the analysis client on a detached
    /// thread. Local output never waits on this exchange.
    fn dispatch_analysis(&mut self, output: &SessionOutput) {
        let Some(client) = self.analyzer.clone() else {
            return;
        };

        let payload = match (&output.wav, &output.container_bytes) {
            (Some(wav), _) => AnalysisPayload::Wav(wav.to_bytes()),
            (None, Some(bytes)) if !bytes.is_empty() => AnalysisPayload::Container(bytes.clone()),
            _ => {
                log::warn!("no payload available for analysis upload");
                return;
            }
        };

        self.inner.lock().analysis = AnalysisStatus::Awaiting;

        let kind = self.config.kind.clone();
        let inner = Arc::clone(&self.inner);
        let delegate = self.delegate.clone();

        let spawned = thread::Builder::new()
            .name("analysis-upload".into())
            .spawn(move || {
                let status = match client.analyze(&kind, &payload) {
                    Ok(report) => AnalysisStatus::Complete(report),
                    Err(error) => {
                        log::error!("analysis upload failed: {}", error);
                        AnalysisStatus::Failed(error)
                    }
                };
                inner.lock().analysis = status.clone();
                if let Some(ref delegate) = delegate {
                    delegate.on_analysis_resolved(&status);
                }
            });

        if let Err(error) = spawned {
            log::error!("failed to spawn analysis upload thread: {}", error);
            self.inner.lock().analysis = AnalysisStatus::Failed(SessionError::UploadFailed(
                "upload thread could not be spawned".into(),
            ));
        }
    }
}

impl<P: InputProvider> Drop for CaptureSession<P> {
    fn drop(&mut self) {
        let active = {
            let inner = self.inner.lock();
            matches!(
                inner.state,
                SessionState::Requesting | SessionState::Recording
            )
        };
        if active {
            self.release_input();
        }
    }
}
