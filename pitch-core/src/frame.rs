//! # Frame Management Module
//!
//! Turns sample streams of arbitrary chunk sizes into the fixed-length
//! frames the detector consumes.
//!
//! ## Features
//! - `AudioFrame`: a borrowed mono frame paired with its sample rate
//! - `Framer`: accumulates capture callbacks and emits overlapping frames
//! - `frames`: iterates the full frames of an in-memory signal

use crate::config::ConfigError;

/// Largest accepted frame, about six minutes of audio at 44.1 kHz.
pub const MAX_FRAME_SIZE: usize = 1 << 24;

/// Checks a frame geometry before any buffer is sized from it.
pub fn validate_framing(frame_size: usize, hop: usize) -> Result<(), ConfigError> {
    if frame_size == 0 || frame_size > MAX_FRAME_SIZE || hop == 0 {
        return Err(ConfigError::InvalidFraming { frame_size, hop });
    }
    Ok(())
}

/// One channel of audio samples together with the rate they were captured at.
#[derive(Debug, Clone, Copy)]
pub struct AudioFrame<'a> {
    pub samples: &'a [f32],
    /// Samples per second.
    pub sample_rate: f32,
}

impl<'a> AudioFrame<'a> {
    pub fn new(samples: &'a [f32], sample_rate: f32) -> Self {
        Self { samples, sample_rate }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Frame duration in seconds, zero for an invalid sample rate.
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate > 0.0 {
            self.samples.len() as f32 / self.sample_rate
        } else {
            0.0
        }
    }
}

/// Accumulates incoming chunks and hands out fixed-size frames.
///
/// Consecutive frames start `hop` samples apart, so `hop < frame_size` gives
/// overlapping frames. The internal buffer is sized once and reused.
#[derive(Debug, Clone)]
pub struct Framer {
    frame_size: usize,
    hop: usize,
    buffer: Vec<f32>,
}

impl Framer {
    pub fn new(frame_size: usize, hop: usize) -> Result<Self, ConfigError> {
        validate_framing(frame_size, hop)?;
        Ok(Self {
            frame_size,
            hop,
            buffer: Vec::with_capacity(frame_size * 2),
        })
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    pub fn hop(&self) -> usize {
        self.hop
    }

    /// Samples buffered but not yet emitted as part of a full frame.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Appends `chunk` and calls `on_frame` for every frame that became full.
    pub fn push<F>(&mut self, chunk: &[f32], mut on_frame: F)
    where
        F: FnMut(&[f32]),
    {
        self.buffer.extend_from_slice(chunk);

        while self.buffer.len() >= self.frame_size {
            on_frame(&self.buffer[..self.frame_size]);
            let advance = self.hop.min(self.buffer.len());
            self.buffer.drain(..advance);
        }
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
    }
}

/// Iterates the full frames of `signal`, `hop` samples apart.
///
/// A trailing partial frame is dropped. Zero `frame_size` or `hop` yields
/// nothing.
pub fn frames(signal: &[f32], frame_size: usize, hop: usize) -> impl Iterator<Item = &[f32]> {
    let count = if frame_size == 0 || hop == 0 || signal.len() < frame_size {
        0
    } else {
        (signal.len() - frame_size) / hop + 1
    };
    (0..count).map(move |i| &signal[i * hop..i * hop + frame_size])
}
