//! # FFT Difference Module
//!
//! Computes the YIN difference function through the frequency domain. The
//! squared difference expands into two window energies and one
//! cross-correlation term:
//!
//! `d(τ) = e(0) + e(τ) - 2 r(τ)`
//!
//! where `e(τ)` is the energy of the `W` samples starting at `τ` (taken from a
//! running sum of squares) and `r(τ) = Σ_{j<W} x_j x_{j+τ}` comes from one
//! forward/inverse transform pair, bringing the cost down from O(W · max_lag)
//! to O(n log n).
//!
//! ## Features
//! - High-performance FFT using RustFFT
//! - Plans and buffers kept across calls, rebuilt only when the frame length changes
//! - No heap allocation per call at a fixed frame length

use std::sync::Arc;

use rustfft::{Fft, FftPlanner, num_complex::Complex};

use crate::difference::integration_window;

/// Reusable FFT state for computing `d(τ)` on frames of one length.
pub struct FftDifference {
    fft_len: usize,
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
    window_spectrum: Vec<Complex<f32>>,
    frame_spectrum: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    energy_prefix: Vec<f64>,
}

impl std::fmt::Debug for FftDifference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FftDifference")
            .field("fft_len", &self.fft_len)
            .finish()
    }
}

impl FftDifference {
    /// Plans transforms large enough for frames of `frame_len` samples.
    pub fn new(frame_len: usize) -> Self {
        let fft_len = frame_len.max(1).next_power_of_two();
        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(fft_len);
        let inverse = planner.plan_fft_inverse(fft_len);
        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());

        Self {
            fft_len,
            forward,
            inverse,
            window_spectrum: vec![Complex::new(0.0, 0.0); fft_len],
            frame_spectrum: vec![Complex::new(0.0, 0.0); fft_len],
            scratch: vec![Complex::new(0.0, 0.0); scratch_len],
            energy_prefix: vec![0.0; frame_len + 1],
        }
    }

    /// Whether this state can serve frames of `frame_len` samples without replanning.
    pub fn fits(&self, frame_len: usize) -> bool {
        frame_len.max(1).next_power_of_two() == self.fft_len
            && self.energy_prefix.len() == frame_len + 1
    }

    /// Computes `d(τ)` for `τ` in `0..=max_lag` into `out`.
    ///
    /// Same contract as [`crate::difference::difference_direct`]. The caller
    /// must check [`FftDifference::fits`] first.
    pub fn compute(&mut self, samples: &[f32], max_lag: usize, out: &mut [f32]) {
        debug_assert!(self.fits(samples.len()));
        debug_assert!(out.len() > max_lag);

        let n = samples.len();
        let window = integration_window(n, max_lag);
        let zero = Complex::new(0.0, 0.0);

        // d(τ) ignores a constant offset, but e(0), e(τ) and r(τ) do not. The
        // frame is centered first so a DC bias does not swamp the f32
        // correlation and cancel out in the subtraction below.
        let mean = if n == 0 {
            0.0
        } else {
            (samples.iter().map(|&x| x as f64).sum::<f64>() / n as f64) as f32
        };

        // Running sum of squares: energy of x[a..b] is prefix[b] - prefix[a].
        self.energy_prefix[0] = 0.0;
        let mut acc = 0.0f64;
        for (i, &x) in samples.iter().enumerate() {
            let centered = (x - mean) as f64;
            acc += centered * centered;
            self.energy_prefix[i + 1] = acc;
        }

        for (i, slot) in self.window_spectrum.iter_mut().enumerate() {
            *slot = if i < window { Complex::new(samples[i] - mean, 0.0) } else { zero };
        }
        for (i, slot) in self.frame_spectrum.iter_mut().enumerate() {
            *slot = if i < n { Complex::new(samples[i] - mean, 0.0) } else { zero };
        }

        self.forward
            .process_with_scratch(&mut self.window_spectrum, &mut self.scratch);
        self.forward
            .process_with_scratch(&mut self.frame_spectrum, &mut self.scratch);

        // conj(W) * X correlates the window against the frame.
        for (w, x) in self.window_spectrum.iter_mut().zip(&self.frame_spectrum) {
            *w = w.conj() * x;
        }
        self.inverse
            .process_with_scratch(&mut self.window_spectrum, &mut self.scratch);

        // Indices j + τ stay below n <= fft_len, so nothing wraps around.
        let scale = 1.0 / self.fft_len as f64;
        let head_energy = self.energy_prefix[window];
        out[0] = 0.0;
        for tau in 1..=max_lag {
            let shifted_energy = self.energy_prefix[tau + window] - self.energy_prefix[tau];
            let correlation = self.window_spectrum[tau].re as f64 * scale;
            let diff = head_energy + shifted_energy - 2.0 * correlation;
            out[tau] = diff.max(0.0) as f32;
        }
    }
}
