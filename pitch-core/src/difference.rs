//! # Difference Function Module
//!
//! Steps 2 and 3 of YIN: the difference function `d(τ)` and its cumulative
//! mean normalized form `d'(τ)`.
//!
//! For every candidate lag `τ` in `1..=max_lag` the frame is compared with a
//! copy of itself shifted by `τ` samples over a fixed integration window of
//! `W = len - max_lag` samples, so every lag sums the same number of terms:
//!
//! `d(τ) = Σ_{j=0}^{W-1} (x_j - x_{j+τ})²`
//!
//! The normalized form divides each value by the running mean of all the
//! values before it:
//!
//! `d'(0) = 1`, `d'(τ) = d(τ) · τ / Σ_{j=1}^{τ} d(j)`
//!
//! This is what lets a single absolute threshold work across signals of
//! different loudness and harmonic content.

/// Number of samples each lag is integrated over.
#[inline]
pub fn integration_window(frame_len: usize, max_lag: usize) -> usize {
    frame_len.saturating_sub(max_lag)
}

/// Computes `d(τ)` for `τ` in `0..=max_lag` into `out` by direct summation.
///
/// `out` must hold `max_lag + 1` values and `max_lag` must not exceed half
/// the frame. `out[0]` is always zero. Cost is O(W · max_lag); nothing is
/// allocated.
pub fn difference_direct(samples: &[f32], max_lag: usize, out: &mut [f32]) {
    debug_assert!(out.len() > max_lag);
    debug_assert!(max_lag <= samples.len() / 2);

    let window = integration_window(samples.len(), max_lag);
    let reference = &samples[..window];
    out[0] = 0.0;

    for tau in 1..=max_lag {
        let shifted = &samples[tau..tau + window];
        let mut diff = 0.0f32;
        for (&a, &b) in reference.iter().zip(shifted) {
            let delta = a - b;
            diff += delta * delta;
        }
        out[tau] = diff;
    }
}

/// Turns `d(τ)` into `d'(τ)` in place.
///
/// A lag whose running sum is still zero (a perfectly constant frame) gets
/// `1.0`, which no threshold below one accepts.
pub fn cumulative_mean_normalize(diff: &mut [f32]) {
    if diff.is_empty() {
        return;
    }
    diff[0] = 1.0;

    let mut running_sum = 0.0f64;
    for tau in 1..diff.len() {
        running_sum += diff[tau] as f64;
        if running_sum > 0.0 {
            diff[tau] = (diff[tau] as f64 * tau as f64 / running_sum) as f32;
        } else {
            diff[tau] = 1.0;
        }
    }
}
