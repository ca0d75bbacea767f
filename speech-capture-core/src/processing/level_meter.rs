//! Window loudness measurement for the live level meter.

use crate::models::level::{LevelSample, DB_FLOOR};

/// Number of most-recent samples measured per tick.
pub const METER_WINDOW: usize = 2048;

/// Below this RMS the meter reports the dB floor instead of -inf.
const RMS_FLOOR: f32 = 1e-12;

/// Width of the displayed dB range: -60 dB maps to 0, 0 dB to 1.
const DB_SPAN: f32 = 60.0;

/// Measure one window of live samples.
///
/// An empty window measures as silence.
pub fn measure(window: &[f32]) -> LevelSample {
    if window.is_empty() {
        return LevelSample::default();
    }

    let mean_square = window.iter().map(|s| s * s).sum::<f32>() / window.len() as f32;
    let rms = mean_square.sqrt();
    let peak = window.iter().map(|s| s.abs()).fold(0.0f32, f32::max);

    let decibels = if rms <= RMS_FLOOR {
        DB_FLOOR
    } else {
        20.0 * rms.log10()
    };
    let normalized = ((decibels + DB_SPAN) / DB_SPAN).clamp(0.0, 1.0);

    LevelSample {
        rms,
        decibels,
        normalized,
        peak,
    }
}

/// Fold an interleaved multi-channel block to mono by per-frame mean.
pub fn fold_to_mono(samples: &[f32], channel_count: usize) -> Vec<f32> {
    if channel_count <= 1 {
        return samples.to_vec();
    }
    let scale = 1.0 / channel_count as f32;
    samples
        .chunks_exact(channel_count)
        .map(|frame| frame.iter().sum::<f32>() * scale)
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn silent_window_hits_floor() {
        let level = measure(&[0.0; METER_WINDOW]);
        assert_eq!(level.decibels, DB_FLOOR);
        assert_eq!(level.normalized, 0.0);
        assert_eq!(level.rms, 0.0);
        assert_eq!(level.peak, 0.0);
    }

    #[test]
    fn empty_window_measures_as_silence() {
        assert_eq!(measure(&[]), LevelSample::default());
    }

    #[test]
    fn full_scale_window() {
        let level = measure(&[1.0; 64]);
        assert_abs_diff_eq!(level.rms, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(level.decibels, 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(level.normalized, 1.0, epsilon = 1e-5);
        assert_eq!(level.peak, 1.0);
    }

    #[test]
    fn hot_window_clamps_normalized_to_one() {
        // RMS above full scale pushes dB positive; display still caps at 1.
        let level = measure(&[2.0; 64]);
        assert!(level.decibels > 0.0);
        assert_eq!(level.normalized, 1.0);
    }

    #[test]
    fn quiet_window_sits_between_floor_and_ceiling() {
        // -40 dB tone: normalized should land at (−40+60)/60 = 1/3.
        let level = measure(&[0.01; 1024]);
        assert_abs_diff_eq!(level.decibels, -40.0, epsilon = 0.01);
        assert_abs_diff_eq!(level.normalized, 1.0 / 3.0, epsilon = 1e-3);
    }

    #[test]
    fn fold_stereo_to_mono_averages_frames() {
        let mono = fold_to_mono(&[0.2, 0.8, 0.4, 0.6], 2);
        assert_eq!(mono.len(), 2);
        assert_abs_diff_eq!(mono[0], 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(mono[1], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn fold_mono_is_passthrough() {
        let samples = vec![0.1, 0.2, 0.3];
        assert_eq!(fold_to_mono(&samples, 1), samples);
    }
}
