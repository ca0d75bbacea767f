//! Canonical PCM ↔ WAV codec.
//!
//! One quantization rule, applied uniformly on both paths: clamp to
//! `[-1, 1]`, scale by 32767, round half away from zero.
//!
//! Container layout (all multi-byte fields little-endian):
//! ```text
//! [0-3]    "RIFF"
//! [4-7]    chunk size = 36 + data bytes
//! [8-11]   "WAVE"
//! [12-15]  "fmt "
//! [16-19]  16 (PCM format chunk size)
//! [20-21]  1 (PCM format code)
//! [22-23]  channel count
//! [24-27]  sample rate
//! [28-31]  byte rate = sample rate * block align
//! [32-33]  block align = channel count * 2
//! [34-35]  16 (bits per sample)
//! [36-39]  "data"
//! [40-43]  data bytes = sample count * block align
//! [44-..]  interleaved 16-bit PCM: frame i, channel c at 44 + (i*channels + c)*2
//! ```

use crate::models::error::SessionError;
use crate::processing::pcm_buffer::PcmBuffer;

/// Size of the RIFF/WAVE/fmt/data header in bytes.
pub const WAV_HEADER_SIZE: usize = 44;

/// The codec emits 16-bit linear PCM only.
pub const BITS_PER_SAMPLE: u16 = 16;

const BYTES_PER_SAMPLE: usize = 2;
const PCM_FORMAT_CODE: u16 = 1;

/// Quantize one float sample to 16-bit PCM.
pub fn quantize(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16
}

/// Recover a float sample from its 16-bit quantized form.
///
/// `i16::MIN` (which this codec never writes but foreign files may) lands
/// just below -1.0 and is clamped back to full scale.
pub fn dequantize(value: i16) -> f32 {
    (value as f32 / i16::MAX as f32).max(-1.0)
}

/// An immutable, well-formed WAV payload.
///
/// Invariant, checked at construction: `data.len() == sample_count *
/// channel_count * 2`. `sample_count` counts frames, not individual
/// channel samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavContainer {
    sample_rate: u32,
    channel_count: u16,
    sample_count: u32,
    data: Vec<u8>,
}

impl WavContainer {
    fn new(
        sample_rate: u32,
        channel_count: u16,
        sample_count: u32,
        data: Vec<u8>,
    ) -> Result<Self, SessionError> {
        let expected = sample_count as usize * channel_count as usize * BYTES_PER_SAMPLE;
        if data.len() != expected {
            return Err(SessionError::EncodeInvariant(format!(
                "payload is {} bytes, header promises {} ({} frames x {} channels)",
                data.len(),
                expected,
                sample_count,
                channel_count
            )));
        }
        Ok(Self {
            sample_rate,
            channel_count,
            sample_count,
            data,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> u16 {
        self.channel_count
    }

    /// Number of frames in the payload.
    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// The raw interleaved 16-bit PCM payload, header excluded.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn duration_secs(&self) -> f64 {
        self.sample_count as f64 / self.sample_rate as f64
    }

    /// Serialize the full container: 44-byte header followed by the payload.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(WAV_HEADER_SIZE + self.data.len());
        write_header(
            &mut bytes,
            self.sample_rate,
            self.channel_count,
            self.data.len() as u32,
        );
        bytes.extend_from_slice(&self.data);
        bytes
    }

    /// Dequantize the payload back to interleaved float samples.
    pub fn samples(&self) -> Vec<f32> {
        self.data
            .chunks_exact(BYTES_PER_SAMPLE)
            .map(|pair| dequantize(i16::from_le_bytes([pair[0], pair[1]])))
            .collect()
    }
}

/// Encode an accumulated PCM buffer into a WAV container.
pub fn encode(pcm: &PcmBuffer, sample_rate: u32) -> Result<WavContainer, SessionError> {
    if sample_rate == 0 {
        return Err(SessionError::EncodeInvariant(
            "sample rate must be positive".into(),
        ));
    }

    let samples = pcm.as_interleaved();
    let mut data = Vec::with_capacity(samples.len() * BYTES_PER_SAMPLE);
    for &sample in samples {
        data.extend_from_slice(&quantize(sample).to_le_bytes());
    }

    WavContainer::new(sample_rate, pcm.channel_count(), pcm.frame_count() as u32, data)
}

/// Parse WAV container bytes produced by this codec (or any compatible
/// 16-bit linear PCM writer).
pub fn decode(bytes: &[u8]) -> Result<WavContainer, SessionError> {
    if bytes.len() < WAV_HEADER_SIZE {
        return Err(SessionError::DecodeFailed(format!(
            "container is {} bytes, shorter than a WAV header",
            bytes.len()
        )));
    }
    if &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return Err(SessionError::DecodeFailed("missing RIFF/WAVE magic".into()));
    }
    if &bytes[12..16] != b"fmt " || &bytes[36..40] != b"data" {
        return Err(SessionError::DecodeFailed(
            "missing fmt/data sub-chunks".into(),
        ));
    }
    if read_u16(bytes, 20) != PCM_FORMAT_CODE {
        return Err(SessionError::DecodeFailed("not linear PCM".into()));
    }
    if read_u16(bytes, 34) != BITS_PER_SAMPLE {
        return Err(SessionError::DecodeFailed(format!(
            "unsupported bit depth: {}",
            read_u16(bytes, 34)
        )));
    }

    let channel_count = read_u16(bytes, 22);
    let sample_rate = read_u32(bytes, 24);
    if channel_count == 0 || sample_rate == 0 {
        return Err(SessionError::DecodeFailed(
            "zero channel count or sample rate".into(),
        ));
    }

    let block_align = read_u16(bytes, 32);
    if block_align != channel_count * BYTES_PER_SAMPLE as u16 {
        return Err(SessionError::DecodeFailed(format!(
            "block align {} inconsistent with {} channels",
            block_align, channel_count
        )));
    }

    let data_len = read_u32(bytes, 40) as usize;
    if bytes.len() < WAV_HEADER_SIZE + data_len {
        return Err(SessionError::DecodeFailed(format!(
            "data chunk promises {} bytes, only {} present",
            data_len,
            bytes.len() - WAV_HEADER_SIZE
        )));
    }
    if data_len % block_align as usize != 0 {
        return Err(SessionError::DecodeFailed(
            "data chunk is not a whole number of frames".into(),
        ));
    }

    let data = bytes[WAV_HEADER_SIZE..WAV_HEADER_SIZE + data_len].to_vec();
    let sample_count = (data_len / block_align as usize) as u32;
    WavContainer::new(sample_rate, channel_count, sample_count, data)
}

fn write_header(buf: &mut Vec<u8>, sample_rate: u32, channel_count: u16, data_len: u32) {
    let block_align = channel_count * BYTES_PER_SAMPLE as u16;
    let byte_rate = sample_rate * block_align as u32;

    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&(36 + data_len).to_le_bytes());
    buf.extend_from_slice(b"WAVE");

    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes());
    buf.extend_from_slice(&PCM_FORMAT_CODE.to_le_bytes());
    buf.extend_from_slice(&channel_count.to_le_bytes());
    buf.extend_from_slice(&sample_rate.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_len.to_le_bytes());
}

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn mono_buffer(samples: &[f32]) -> PcmBuffer {
        let mut pcm = PcmBuffer::new(1);
        pcm.push_block(samples);
        pcm
    }

    fn constant_buffer(frames: usize, channels: u16, value: f32) -> PcmBuffer {
        let mut pcm = PcmBuffer::new(channels);
        pcm.push_block(&vec![value; frames * channels as usize]);
        pcm
    }

    #[test]
    fn quantize_full_scale_and_zero() {
        assert_eq!(quantize(0.0), 0);
        assert_eq!(quantize(1.0), i16::MAX);
        assert_eq!(quantize(-1.0), -i16::MAX);
    }

    #[test]
    fn quantize_clamps_out_of_range() {
        assert_eq!(quantize(2.5), i16::MAX);
        assert_eq!(quantize(-3.0), -i16::MAX);
    }

    #[test]
    fn quantize_rounds_half_away_from_zero() {
        // 0.5 * 32767 = 16383.5
        assert_eq!(quantize(0.5), 16384);
        assert_eq!(quantize(-0.5), -16384);
    }

    #[test]
    fn dequantize_clamps_negative_extreme() {
        assert_eq!(dequantize(i16::MIN), -1.0);
        assert_eq!(dequantize(i16::MAX), 1.0);
    }

    #[test]
    fn header_exact_for_representative_sizes() {
        for (frames, channels) in [(0usize, 1u16), (0, 2), (1, 1), (1, 2), (44_100, 1), (44_100, 2)] {
            let wav = encode(&constant_buffer(frames, channels, 0.25), 44_100).unwrap();
            let bytes = wav.to_bytes();
            let data_len = (frames * channels as usize * 2) as u32;

            assert_eq!(&bytes[0..4], b"RIFF");
            assert_eq!(read_u32(&bytes, 4), 36 + data_len);
            assert_eq!(&bytes[8..12], b"WAVE");
            assert_eq!(&bytes[12..16], b"fmt ");
            assert_eq!(read_u32(&bytes, 16), 16);
            assert_eq!(read_u16(&bytes, 20), 1);
            assert_eq!(read_u16(&bytes, 22), channels);
            assert_eq!(read_u32(&bytes, 24), 44_100);
            assert_eq!(read_u32(&bytes, 28), 44_100 * channels as u32 * 2);
            assert_eq!(read_u16(&bytes, 32), channels * 2);
            assert_eq!(read_u16(&bytes, 34), 16);
            assert_eq!(&bytes[36..40], b"data");
            assert_eq!(read_u32(&bytes, 40), data_len);
            assert_eq!(bytes.len(), WAV_HEADER_SIZE + data_len as usize);
        }
    }

    #[test]
    fn one_second_mono_scenario() {
        // 1 second at 48 kHz, constant 0.5.
        let wav = encode(&constant_buffer(48_000, 1, 0.5), 48_000).unwrap();
        assert_eq!(wav.data().len(), 96_000);

        let bytes = wav.to_bytes();
        assert_eq!(read_u32(&bytes, 4), 96_036);
        assert_eq!(read_u32(&bytes, 40), 96_000);

        for pair in wav.data().chunks_exact(2) {
            assert_eq!(i16::from_le_bytes([pair[0], pair[1]]), 16_384);
        }
    }

    #[test]
    fn interleaving_offsets() {
        let mut pcm = PcmBuffer::new(2);
        pcm.push_block(&[0.1, 0.2, 0.3, 0.4]); // two stereo frames
        let bytes = encode(&pcm, 48_000).unwrap().to_bytes();

        // Frame i, channel c lives at 44 + (i*2 + c)*2.
        let at = |i: usize, c: usize| {
            let offset = WAV_HEADER_SIZE + (i * 2 + c) * 2;
            i16::from_le_bytes([bytes[offset], bytes[offset + 1]])
        };
        assert_eq!(at(0, 0), quantize(0.1));
        assert_eq!(at(0, 1), quantize(0.2));
        assert_eq!(at(1, 0), quantize(0.3));
        assert_eq!(at(1, 1), quantize(0.4));
    }

    #[test]
    fn round_trip_within_quantization_error() {
        let samples: Vec<f32> = (0..1000)
            .map(|i| ((i as f32) * 0.37).sin() * 0.9)
            .chain([0.0, 1.0, -1.0, 0.5, -0.5])
            .collect();

        let wav = encode(&mono_buffer(&samples), 16_000).unwrap();
        let decoded = decode(&wav.to_bytes()).unwrap();

        assert_eq!(decoded.sample_rate(), 16_000);
        assert_eq!(decoded.channel_count(), 1);
        assert_eq!(decoded.sample_count() as usize, samples.len());

        for (original, restored) in samples.iter().zip(decoded.samples()) {
            assert_abs_diff_eq!(*original, restored, epsilon = 1.0 / 32_768.0);
        }
    }

    #[test]
    fn decode_rejects_truncated_input() {
        let wav = encode(&mono_buffer(&[0.1, 0.2, 0.3]), 8_000).unwrap();
        let bytes = wav.to_bytes();

        assert!(matches!(
            decode(&bytes[..20]),
            Err(SessionError::DecodeFailed(_))
        ));
        // Header intact, data chunk cut short.
        assert!(matches!(
            decode(&bytes[..bytes.len() - 2]),
            Err(SessionError::DecodeFailed(_))
        ));
    }

    #[test]
    fn decode_rejects_foreign_magic() {
        let mut bytes = encode(&mono_buffer(&[0.1]), 8_000).unwrap().to_bytes();
        bytes[0..4].copy_from_slice(b"OggS");
        assert!(matches!(decode(&bytes), Err(SessionError::DecodeFailed(_))));
    }

    #[test]
    fn decode_rejects_non_pcm_format_code() {
        let mut bytes = encode(&mono_buffer(&[0.1]), 8_000).unwrap().to_bytes();
        bytes[20..22].copy_from_slice(&3u16.to_le_bytes()); // IEEE float
        assert!(matches!(decode(&bytes), Err(SessionError::DecodeFailed(_))));
    }

    #[test]
    fn empty_buffer_encodes_to_header_only() {
        let wav = encode(&PcmBuffer::new(1), 48_000).unwrap();
        assert_eq!(wav.sample_count(), 0);
        assert_eq!(wav.to_bytes().len(), WAV_HEADER_SIZE);

        let decoded = decode(&wav.to_bytes()).unwrap();
        assert_eq!(decoded.sample_count(), 0);
        assert!(decoded.samples().is_empty());
    }

    #[test]
    fn encode_rejects_zero_sample_rate() {
        assert!(matches!(
            encode(&mono_buffer(&[0.1]), 0),
            Err(SessionError::EncodeInvariant(_))
        ));
    }
}
