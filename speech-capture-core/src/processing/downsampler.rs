//! Stride decimation of a capture to a bounded plot-point series.

use serde::Serialize;

/// Hard cap on points handed to the plotting layer.
pub const MAX_POINTS: usize = 20_000;

/// One display point of the local waveform preview.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WaveformPoint {
    /// Seconds from capture start.
    pub time: f64,
    pub value: f32,
}

/// Decimate `samples` to at most [`MAX_POINTS`] points.
pub fn downsample(samples: &[f32], sample_rate: u32) -> Vec<WaveformPoint> {
    downsample_to(samples, sample_rate, MAX_POINTS)
}

/// Decimate to an explicit point budget.
///
/// One point per `step`-th sample with `step = ceil(len / max_points)`,
/// so the first sample (time 0.0) is always kept and the budget holds for
/// every input length. Empty input yields an empty series.
pub fn downsample_to(samples: &[f32], sample_rate: u32, max_points: usize) -> Vec<WaveformPoint> {
    if samples.is_empty() || max_points == 0 || sample_rate == 0 {
        return Vec::new();
    }

    let step = samples.len().div_ceil(max_points).max(1);
    let mut points = Vec::with_capacity(samples.len().div_ceil(step));
    let mut index = 0;
    while index < samples.len() {
        points.push(WaveformPoint {
            time: index as f64 / sample_rate as f64,
            value: samples[index],
        });
        index += step;
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_empty_series() {
        assert!(downsample(&[], 48_000).is_empty());
    }

    #[test]
    fn short_input_is_kept_verbatim() {
        let points = downsample(&[0.1, 0.2, 0.3], 10);
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].time, 0.0);
        assert_eq!(points[1].time, 0.1);
        assert_eq!(points[2].value, 0.3);
    }

    #[test]
    fn never_exceeds_the_point_cap() {
        for len in [1usize, 9_999, 20_000, 20_001, 39_999, 40_000, 123_456] {
            let samples = vec![0.5f32; len];
            let points = downsample(&samples, 48_000);
            assert!(
                points.len() <= MAX_POINTS,
                "{} samples produced {} points",
                len,
                points.len()
            );
            assert_eq!(points[0].time, 0.0);
        }
    }

    #[test]
    fn exact_multiple_fills_the_budget() {
        let samples = vec![0.0f32; MAX_POINTS * 3];
        assert_eq!(downsample(&samples, 48_000).len(), MAX_POINTS);
    }

    #[test]
    fn times_follow_the_sample_rate() {
        let samples: Vec<f32> = (0..100).map(|i| i as f32).collect();
        let points = downsample_to(&samples, 50, 10);
        // step = 10, so consecutive points are 10 samples = 0.2 s apart.
        assert_eq!(points.len(), 10);
        assert_eq!(points[0].time, 0.0);
        assert_eq!(points[1].time, 0.2);
        assert_eq!(points[1].value, 10.0);
    }

    #[test]
    fn points_serialize_for_the_ui() {
        let json = serde_json::to_string(&WaveformPoint {
            time: 0.25,
            value: -0.5,
        })
        .unwrap();
        assert_eq!(json, r#"{"time":0.25,"value":-0.5}"#);
    }
}
