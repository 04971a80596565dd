//! Silence gate: rejects frames that carry no meaningful energy before the
//! lag search runs.

/// Root-mean-square amplitude of `samples`, zero for an empty slice.
///
/// Accumulates in `f64` so long frames of small values do not lose precision.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_sq / samples.len() as f64).sqrt() as f32
}

/// Returns `true` when the frame should be treated as silence.
///
/// Empty frames and frames whose RMS is non-finite are always silent.
pub fn is_silent(samples: &[f32], silence_rms_threshold: f32) -> bool {
    if samples.is_empty() {
        return true;
    }
    let level = rms(samples);
    !(level.is_finite() && level >= silence_rms_threshold)
}
