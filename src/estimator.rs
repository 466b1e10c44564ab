//! Zero-crossing frequency estimation over a sample window.
//!
//! A crossing is a sign change of `sample - window_mean` between adjacent
//! samples; consecutive crossing-index gaps are period estimates in samples.
//! With the device emitting one sample per [`SAMPLE_INTERVAL_MS`]
//! millisecond, an average gap of `p` samples converts to
//! `1000 / (p * SAMPLE_INTERVAL_MS)` Hz.

use crate::constants::SAMPLE_INTERVAL_MS;

/// Estimates the dominant frequency of `window` in Hz.
///
/// Returns `None` when the window carries no usable periodicity: fewer than
/// two crossings (a flat or monotone window), a non-positive sample
/// interval, or a degenerate average period. "Unknown" is a defined outcome
/// here, not an error, and never surfaces as zero, infinity or NaN.
pub fn estimate(window: &[u16], sample_interval_ms: f64) -> Option<f64> {
    if window.len() < 2 || sample_interval_ms <= 0.0 {
        return None;
    }

    let mean = window.iter().map(|&v| v as f64).sum::<f64>() / window.len() as f64;

    // A value exactly on the mean counts as non-negative, so a flat window
    // produces no crossings at all.
    let below = |v: u16| (v as f64 - mean) < 0.0;

    let mut crossings: Vec<usize> = Vec::new();
    for i in 0..window.len() - 1 {
        if below(window[i]) != below(window[i + 1]) {
            crossings.push(i);
        }
    }
    if crossings.len() < 2 {
        return None;
    }

    let gap_sum: usize = crossings.windows(2).map(|pair| pair[1] - pair[0]).sum();
    let avg_period_samples = gap_sum as f64 / (crossings.len() - 1) as f64;

    let period_ms = avg_period_samples * sample_interval_ms;
    if period_ms <= f64::EPSILON {
        return None;
    }
    Some(1000.0 / period_ms)
}

/// [`estimate`] at the nominal acquisition cadence.
pub fn estimate_nominal(window: &[u16]) -> Option<f64> {
    estimate(window, SAMPLE_INTERVAL_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Square wave alternating `stride` samples high, `stride` samples low.
    fn alternating(stride: usize, cycles: usize) -> Vec<u16> {
        let mut out = Vec::with_capacity(stride * 2 * cycles);
        for _ in 0..cycles {
            out.extend(std::iter::repeat(3000u16).take(stride));
            out.extend(std::iter::repeat(1000u16).take(stride));
        }
        out
    }

    #[test]
    fn flat_window_has_no_estimate() {
        assert_eq!(estimate(&[2048; 64], 1.0), None);
    }

    #[test]
    fn monotone_window_with_single_crossing_has_no_estimate() {
        // One crossing only: below the mean then above it.
        let window: Vec<u16> = (0..64).map(|i| i * 10).collect();
        assert_eq!(estimate(&window, 1.0), None);
    }

    #[test]
    fn short_window_has_no_estimate() {
        assert_eq!(estimate(&[1000], 1.0), None);
        assert_eq!(estimate(&[], 1.0), None);
    }

    #[test]
    fn alternating_window_estimates_crossing_rate() {
        // Crossings every 8 samples at 1 ms per sample: 1000/8 Hz.
        let window = alternating(8, 16);
        let freq = estimate(&window, 1.0).unwrap();
        assert!((freq - 125.0).abs() < 1e-9, "got {freq}");
    }

    #[test]
    fn estimate_scales_with_sample_interval() {
        let window = alternating(10, 10);
        // 10-sample gaps at 2 ms per sample: 1000 / 20 Hz.
        let freq = estimate(&window, 2.0).unwrap();
        assert!((freq - 50.0).abs() < 1e-9, "got {freq}");
    }

    #[test]
    fn nominal_interval_matches_firmware_cadence() {
        let window = alternating(4, 32);
        let freq = estimate_nominal(&window).unwrap();
        assert!((freq - 250.0).abs() < 1e-9, "got {freq}");
    }

    #[test]
    fn non_positive_interval_has_no_estimate() {
        let window = alternating(4, 8);
        assert_eq!(estimate(&window, 0.0), None);
        assert_eq!(estimate(&window, -1.0), None);
    }
}
