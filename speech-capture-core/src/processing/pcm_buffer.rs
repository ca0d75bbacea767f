/// Append-only accumulator of captured sample frames for one session.
///
/// Stores interleaved f32 samples with a fixed channel count; always holds
/// a whole number of frames. Grows only by append, keeps insertion order,
/// and is owned exclusively by its session (wrap in `Arc<Mutex<_>>` to
/// share with the capture callback).
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBuffer {
    channel_count: u16,
    samples: Vec<f32>,
}

impl PcmBuffer {
    pub fn new(channel_count: u16) -> Self {
        Self {
            channel_count: channel_count.max(1),
            samples: Vec::new(),
        }
    }

    /// Build a mono buffer from an already-decoded sample sequence.
    pub fn from_mono(samples: &[f32]) -> Self {
        Self {
            channel_count: 1,
            samples: samples.to_vec(),
        }
    }

    /// Append one delivered block of interleaved samples.
    ///
    /// A trailing partial frame is dropped so the buffer never holds a
    /// torn frame.
    pub fn push_block(&mut self, block: &[f32]) {
        let channels = self.channel_count as usize;
        let whole = block.len() - block.len() % channels;
        if whole < block.len() {
            log::warn!(
                "dropping {} trailing samples of a partial frame",
                block.len() - whole
            );
        }
        self.samples.extend_from_slice(&block[..whole]);
    }

    pub fn channel_count(&self) -> u16 {
        self.channel_count
    }

    /// Number of frames accumulated so far.
    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.channel_count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The full interleaved sample sequence.
    pub fn as_interleaved(&self) -> &[f32] {
        &self.samples
    }

    /// Extract one channel as a contiguous sequence.
    pub fn channel(&self, index: u16) -> Vec<f32> {
        let channels = self.channel_count as usize;
        self.samples
            .iter()
            .skip(index as usize)
            .step_by(channels)
            .copied()
            .collect()
    }

    pub fn duration_secs(&self, sample_rate: u32) -> f64 {
        if sample_rate == 0 {
            return 0.0;
        }
        self.frame_count() as f64 / sample_rate as f64
    }
}
