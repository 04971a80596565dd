//! # Pitch Detection Module
//!
//! This module implements the YIN fundamental-frequency estimator and its
//! public entry points.
//!
//! ## Features
//! - RMS silence gate before any lag search
//! - Cumulative mean normalized difference with direct or FFT back-end
//! - First-dip lag selection to avoid octave errors on harmonic-rich tones
//! - Parabolic interpolation for sub-sample accuracy
//! - Range filter on the supported detection band
//!
//! Every input degrades to `0.0` ("no pitch") instead of failing, so callers
//! can always trust the returned value.

use crate::{
    config::{ConfigError, DetectorConfig, DifferenceMethod},
    difference::{cumulative_mean_normalize, difference_direct},
    fft::FftDifference,
    frame::AudioFrame,
    gate,
    selector::select_lag,
};

/// Shortest lag range worth searching; parabolic refinement needs neighbours.
const MIN_LAG_RANGE: usize = 2;

/// Why a frame produced no pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnvoicedReason {
    /// Zero-length frame or unusable sample rate.
    Empty,
    /// RMS below the silence floor.
    Silent,
    /// No dip below the absolute threshold in the searched lag range.
    Aperiodic,
    /// A dip was accepted but its frequency lies outside the band.
    OutOfRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Voiced,
    Unvoiced(UnvoicedReason),
}

/// Result of analyzing one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchEstimate {
    /// Detected frequency in Hz, `0.0` when unvoiced.
    pub frequency: f32,
    /// `1 - d'` at the selected dip, clamped to `[0, 1]`. Zero when no dip
    /// was accepted.
    pub confidence: f32,
    /// Refined lag in samples, when a dip was accepted.
    pub lag: Option<f32>,
    pub outcome: Outcome,
}

impl PitchEstimate {
    fn unvoiced(reason: UnvoicedReason) -> Self {
        Self {
            frequency: 0.0,
            confidence: 0.0,
            lag: None,
            outcome: Outcome::Unvoiced(reason),
        }
    }

    pub fn is_voiced(&self) -> bool {
        self.outcome == Outcome::Voiced
    }
}

/// A YIN detector with immutable configuration and reusable scratch space.
///
/// The detector keeps no state between frames besides its buffers: the same
/// frame always yields the same estimate. Once the buffers are sized for a
/// frame geometry (see [`PitchDetector::prepare`]) detection does not
/// allocate, which makes it usable from an audio callback. Each channel or
/// thread should own its own detector.
#[derive(Debug)]
pub struct PitchDetector {
    config: DetectorConfig,
    cmnd: Vec<f32>,
    fft: Option<FftDifference>,
}

impl PitchDetector {
    /// Creates a detector after validating `config`.
    pub fn new(config: DetectorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            cmnd: Vec::new(),
            fft: None,
        })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Sizes the scratch buffers for frames of `frame_len` samples at
    /// `sample_rate`, so the first real frame does not allocate.
    pub fn prepare(&mut self, frame_len: usize, sample_rate: f32) {
        let max_lag = self.config.max_lag(sample_rate, frame_len);
        self.reserve_lags(max_lag);
        if self.config.difference_method == DifferenceMethod::Fft {
            self.ensure_fft(frame_len);
        }
    }

    /// Detects the pitch of one frame.
    ///
    /// # Returns
    /// * Frequency in Hz, or `0.0` when no pitch was detected
    pub fn detect(&mut self, frame: AudioFrame<'_>) -> f32 {
        self.analyze(frame).frequency
    }

    /// Like [`PitchDetector::detect`] but also reports the confidence, the
    /// refined lag and why a frame was rejected.
    pub fn analyze(&mut self, frame: AudioFrame<'_>) -> PitchEstimate {
        let estimate = self.run(frame);
        log::trace!(
            "frame of {} samples: {:?} ({:.2} Hz)",
            frame.len(),
            estimate.outcome,
            estimate.frequency
        );
        estimate
    }

    fn run(&mut self, frame: AudioFrame<'_>) -> PitchEstimate {
        let samples = frame.samples;
        let sample_rate = frame.sample_rate;

        if samples.is_empty() || !(sample_rate.is_finite() && sample_rate > 0.0) {
            return PitchEstimate::unvoiced(UnvoicedReason::Empty);
        }

        // --- Silence gate ---
        if gate::is_silent(samples, self.config.silence_rms_threshold) {
            return PitchEstimate::unvoiced(UnvoicedReason::Silent);
        }

        let max_lag = self.config.max_lag(sample_rate, samples.len());
        if max_lag < MIN_LAG_RANGE {
            return PitchEstimate::unvoiced(UnvoicedReason::Aperiodic);
        }

        // --- Difference function and its normalized form ---
        self.reserve_lags(max_lag);
        if self.config.difference_method == DifferenceMethod::Fft {
            self.ensure_fft(samples.len());
        }
        let cmnd = &mut self.cmnd[..=max_lag];
        match self.config.difference_method {
            DifferenceMethod::Direct => difference_direct(samples, max_lag, cmnd),
            DifferenceMethod::Fft => {
                if let Some(engine) = self.fft.as_mut() {
                    engine.compute(samples, max_lag, cmnd);
                }
            }
        }
        cumulative_mean_normalize(cmnd);

        // --- Lag selection ---
        let Some(candidate) = select_lag(cmnd, self.config.absolute_threshold) else {
            return PitchEstimate::unvoiced(UnvoicedReason::Aperiodic);
        };

        // --- Range filter ---
        let frequency = sample_rate / candidate.refined_lag;
        let confidence = (1.0 - candidate.dip).clamp(0.0, 1.0);
        if !in_band(frequency, &self.config) {
            return PitchEstimate {
                confidence,
                lag: Some(candidate.refined_lag),
                ..PitchEstimate::unvoiced(UnvoicedReason::OutOfRange)
            };
        }

        PitchEstimate {
            frequency,
            confidence,
            lag: Some(candidate.refined_lag),
            outcome: Outcome::Voiced,
        }
    }

    fn reserve_lags(&mut self, max_lag: usize) {
        if self.cmnd.len() < max_lag + 1 {
            self.cmnd.resize(max_lag + 1, 0.0);
        }
    }

    fn ensure_fft(&mut self, frame_len: usize) {
        let needs_plan = self.fft.as_ref().is_none_or(|engine| !engine.fits(frame_len));
        if needs_plan {
            log::debug!("planning FFT difference for {} sample frames", frame_len);
            self.fft = Some(FftDifference::new(frame_len));
        }
    }
}

/// Whether `frequency` lies inside the configured detection band.
///
/// Both edges are inclusive, but refinement on `d'` reads pure tones about
/// 0.1% sharp near the top of the band, so a tone sitting exactly on
/// `max_frequency` is usually rejected.
fn in_band(frequency: f32, config: &DetectorConfig) -> bool {
    frequency.is_finite()
        && frequency >= config.min_frequency
        && frequency <= config.max_frequency
}

/// Detects the fundamental frequency of a monophonic frame.
///
/// A stateless convenience over [`PitchDetector`] that sizes a fresh scratch
/// buffer on every call. Audio callbacks should keep a `PitchDetector`
/// instead.
///
/// # Arguments
/// * `samples` - One channel of audio
/// * `sample_rate` - Sample rate in Hz
/// * `config` - Detector tunables
///
/// # Returns
/// * Frequency in Hz, or `0.0` for empty, silent, aperiodic or out-of-band
///   input and for an invalid configuration
pub fn detect_pitch(samples: &[f32], sample_rate: f32, config: &DetectorConfig) -> f32 {
    match PitchDetector::new(config.clone()) {
        Ok(mut detector) => detector.detect(AudioFrame::new(samples, sample_rate)),
        Err(e) => {
            log::warn!("pitch detection skipped: {}", e);
            0.0
        }
    }
}
