#![allow(dead_code)]

use std::f32::consts::PI;

pub const SAMPLE_RATE: f32 = 44100.0;

pub fn gen_sine(freq_hz: f32, sr: f32, n: usize, amplitude: f32) -> Vec<f32> {
    (0..n)
        .map(|i| amplitude * (2.0 * PI * freq_hz * i as f32 / sr).sin())
        .collect()
}

/// Fundamental plus harmonics; `amplitudes[k]` scales harmonic `k + 1`.
pub fn gen_harmonic_tone(f0: f32, amplitudes: &[f32], sr: f32, n: usize) -> Vec<f32> {
    (0..n)
        .map(|i| {
            let t = i as f32 / sr;
            amplitudes
                .iter()
                .enumerate()
                .map(|(k, &a)| a * (2.0 * PI * f0 * (k + 1) as f32 * t).sin())
                .sum()
        })
        .collect()
}

/// Deterministic uniform noise in `[-amplitude, amplitude]`.
pub fn gen_white_noise(n: usize, amplitude: f32, seed: u64) -> Vec<f32> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let unit = (state >> 33) as f32 / (1u64 << 31) as f32;
            amplitude * (unit * 2.0 - 1.0)
        })
        .collect()
}

pub fn samples_for(duration_secs: f32) -> usize {
    (SAMPLE_RATE * duration_secs) as usize
}

pub fn relative_error(measured: f32, expected: f32) -> f32 {
    (measured - expected).abs() / expected
}
