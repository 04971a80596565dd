//! # Detector Configuration Module
//!
//! This module holds the immutable tunables of the pitch detector and the
//! error type returned when a configuration does not describe a usable
//! detector.
//!
//! ## Features
//! - Serde support so partial JSON files fill the rest from defaults
//! - Builder-style `with_*` methods for programmatic use
//! - Validation of the detection band and thresholds

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default lower bound of the detection band in Hz.
pub const DEFAULT_MIN_FREQUENCY: f32 = 50.0;
/// Default upper bound of the detection band in Hz.
pub const DEFAULT_MAX_FREQUENCY: f32 = 2000.0;
/// Default dip-acceptance threshold, the value used in the YIN paper.
pub const DEFAULT_ABSOLUTE_THRESHOLD: f32 = 0.10;
/// Default RMS floor (about -60 dBFS).
pub const DEFAULT_SILENCE_RMS_THRESHOLD: f32 = 0.001;

/// Errors raised when a configuration or framing request is unusable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("minimum frequency must be positive and finite, got {0}")]
    InvalidMinFrequency(f32),

    #[error("detection band is empty: min {min} Hz >= max {max} Hz")]
    EmptyBand { min: f32, max: f32 },

    #[error("absolute threshold must lie in (0, 1), got {0}")]
    InvalidThreshold(f32),

    #[error("silence RMS threshold must be non-negative and finite, got {0}")]
    InvalidSilenceThreshold(f32),

    #[error(
        "frame size must lie in 1..={max} and hop must be non-zero (frame {frame_size}, hop {hop})",
        max = crate::frame::MAX_FRAME_SIZE
    )]
    InvalidFraming { frame_size: usize, hop: usize },
}

/// How the YIN difference function is computed.
///
/// Both methods produce the same `d(τ)` up to rounding. `Direct` has no setup
/// cost and wins on short frames; `Fft` wins once frames reach several
/// thousand samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifferenceMethod {
    #[default]
    Direct,
    Fft,
}

/// Immutable set of detector tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Lowest detectable pitch in Hz. Also bounds the longest lag searched.
    pub min_frequency: f32,
    /// Highest detectable pitch in Hz.
    pub max_frequency: f32,
    /// YIN dip threshold on the normalized difference, in (0, 1).
    pub absolute_threshold: f32,
    /// Frames with a lower RMS amplitude are treated as silence.
    pub silence_rms_threshold: f32,
    pub difference_method: DifferenceMethod,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_frequency: DEFAULT_MIN_FREQUENCY,
            max_frequency: DEFAULT_MAX_FREQUENCY,
            absolute_threshold: DEFAULT_ABSOLUTE_THRESHOLD,
            silence_rms_threshold: DEFAULT_SILENCE_RMS_THRESHOLD,
            difference_method: DifferenceMethod::Direct,
        }
    }
}

impl DetectorConfig {
    pub fn with_band(mut self, min_frequency: f32, max_frequency: f32) -> Self {
        self.min_frequency = min_frequency;
        self.max_frequency = max_frequency;
        self
    }

    pub fn with_absolute_threshold(mut self, threshold: f32) -> Self {
        self.absolute_threshold = threshold;
        self
    }

    pub fn with_silence_rms_threshold(mut self, threshold: f32) -> Self {
        self.silence_rms_threshold = threshold;
        self
    }

    pub fn with_difference_method(mut self, method: DifferenceMethod) -> Self {
        self.difference_method = method;
        self
    }

    /// Checks the band and threshold invariants.
    ///
    /// # Returns
    /// * `Ok(())` - The configuration describes a usable detector
    /// * `Err(e)` - The first violated invariant
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_frequency.is_finite() && self.min_frequency > 0.0) {
            return Err(ConfigError::InvalidMinFrequency(self.min_frequency));
        }
        // NaN max compares false, so it lands here too.
        if !(self.max_frequency > self.min_frequency) {
            return Err(ConfigError::EmptyBand {
                min: self.min_frequency,
                max: self.max_frequency,
            });
        }
        if !(self.absolute_threshold > 0.0 && self.absolute_threshold < 1.0) {
            return Err(ConfigError::InvalidThreshold(self.absolute_threshold));
        }
        if !(self.silence_rms_threshold.is_finite() && self.silence_rms_threshold >= 0.0) {
            return Err(ConfigError::InvalidSilenceThreshold(
                self.silence_rms_threshold,
            ));
        }
        log::debug!(
            "detector config ok: band {}-{} Hz, threshold {}, silence rms {}, {:?}",
            self.min_frequency,
            self.max_frequency,
            self.absolute_threshold,
            self.silence_rms_threshold,
            self.difference_method
        );
        Ok(())
    }

    /// Longest lag searched for a frame of `frame_len` samples.
    ///
    /// `floor(sample_rate / min_frequency)`, clamped to half the frame so the
    /// integration window is never shorter than the lag range.
    pub fn max_lag(&self, sample_rate: f32, frame_len: usize) -> usize {
        let by_band = (sample_rate / self.min_frequency).floor();
        let by_band = if by_band.is_finite() && by_band > 0.0 {
            by_band as usize
        } else {
            0
        };
        by_band.min(frame_len / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(DetectorConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_inverted_band() {
        let config = DetectorConfig::default().with_band(500.0, 100.0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyBand { min: 500.0, max: 100.0 })
        );
    }

    #[test]
    fn rejects_threshold_outside_unit_interval() {
        for t in [0.0, 1.0, -0.2, f32::NAN] {
            let config = DetectorConfig::default().with_absolute_threshold(t);
            assert!(config.validate().is_err(), "threshold {} accepted", t);
        }
    }

    #[test]
    fn rejects_zero_min_frequency() {
        let config = DetectorConfig::default().with_band(0.0, 100.0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidMinFrequency(0.0)));
    }

    #[test]
    fn max_lag_is_clamped_to_half_frame() {
        let config = DetectorConfig::default();
        // 44100 / 50 = 882
        assert_eq!(config.max_lag(44100.0, 4096), 882);
        assert_eq!(config.max_lag(44100.0, 1024), 512);
        assert_eq!(config.max_lag(0.0, 1024), 0);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: DetectorConfig =
            serde_json::from_str(r#"{ "max_frequency": 1000.0, "difference_method": "fft" }"#)
                .unwrap();
        assert_eq!(config.max_frequency, 1000.0);
        assert_eq!(config.min_frequency, DEFAULT_MIN_FREQUENCY);
        assert_eq!(config.difference_method, DifferenceMethod::Fft);
    }
}
