//! Live pitch readout from the default input device.
//!
//! The capture callback only frames and forwards samples; detection runs on
//! this thread, which owns the detector and the smoother.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::Result;
use cpal::traits::StreamTrait;
use crossbeam_channel::{RecvTimeoutError, bounded};
use pitch_core::{AudioFrame, DetectorConfig, PitchDetector, capture};

use crate::FramingArgs;
use crate::smoothing::ExponentialSmoother;

/// Frames queued between the capture callback and the detector.
const CHANNEL_CAPACITY: usize = 8;

pub fn run(framing: &FramingArgs, config: DetectorConfig) -> Result<()> {
    let (sender, receiver) = bounded::<Vec<f32>>(CHANNEL_CAPACITY);
    let (stream, sample_rate) = capture::start_capture(sender, framing.frame_size, framing.hop)?;
    let sample_rate = sample_rate as f32;

    let mut detector = PitchDetector::new(config)?;
    detector.prepare(framing.frame_size, sample_rate);
    let mut smoother = ExponentialSmoother::new(framing.smooth.unwrap_or(1.0));

    let running = Arc::new(AtomicBool::new(true));
    {
        let r = running.clone();
        ctrlc::set_handler(move || r.store(false, Ordering::SeqCst))?;
    }

    log::info!("Listening at {} Hz, press Ctrl-C to stop", sample_rate);
    let mut last_voiced = false;
    while running.load(Ordering::SeqCst) {
        match receiver.recv_timeout(Duration::from_millis(100)) {
            Ok(frame) => {
                let estimate = detector.analyze(AudioFrame::new(&frame, sample_rate));
                let frequency = smoother.update(estimate.frequency);
                if estimate.is_voiced() {
                    println!("{:8.2} Hz  (confidence {:.2})", frequency, estimate.confidence);
                } else if last_voiced {
                    println!("       -- {:?}", estimate.outcome);
                }
                last_voiced = estimate.is_voiced();
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                log::warn!("Audio channel closed");
                break;
            }
        }
    }

    log::info!("Stopping stream and exiting...");
    if let Err(e) = stream.pause() {
        log::error!("Error pausing stream: {}", e);
    }
    Ok(())
}
