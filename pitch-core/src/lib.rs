// pitch-core/src/lib.rs

//! The core logic of the real-time pitch estimator.
//! This crate extracts one fundamental-frequency estimate per audio frame
//! using the YIN method. Detection is synchronous and allocation-free once
//! the scratch buffers are sized. Microphone capture is available behind
//! the `capture` feature.
//!
//! ```
//! use pitch_core::{DetectorConfig, detect_pitch};
//!
//! let tone: Vec<f32> = (0..4096)
//!     .map(|i| (2.0 * std::f32::consts::PI * 220.0 * i as f32 / 44100.0).sin())
//!     .collect();
//! let frequency = detect_pitch(&tone, 44100.0, &DetectorConfig::default());
//! assert!((frequency - 220.0).abs() < 2.2);
//! ```

#[cfg(feature = "capture")]
pub mod capture;
pub mod config;
pub mod difference;
pub mod fft;
pub mod frame;
pub mod gate;
pub mod pitch;
pub mod selector;

pub use config::{ConfigError, DetectorConfig, DifferenceMethod};
pub use frame::{AudioFrame, Framer, MAX_FRAME_SIZE, frames, validate_framing};
pub use pitch::{Outcome, PitchDetector, PitchEstimate, UnvoicedReason, detect_pitch};
