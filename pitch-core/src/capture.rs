//! # Audio Capture Module
//!
//! This module handles real-time audio capture using CPAL (Cross-Platform Audio Library)
//! and delivers fixed-size mono frames to the analysis thread.
//!
//! ## Features
//! - Automatic input device selection
//! - Prefers 32-bit float mono near 44.1 kHz, downmixes multi-channel input
//! - Overlapping frames through [`Framer`]
//! - Drops frames instead of blocking when the analysis side falls behind

use anyhow::{Context, Result, anyhow};
use cpal::SupportedStreamConfigRange;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::Sender;

use crate::frame::Framer;

/// Default number of samples per analysis frame (~46 ms at 44.1 kHz).
pub const DEFAULT_FRAME_SIZE: usize = 2048;

/// Sample rate requested from the device when it offers a choice.
pub const TARGET_SAMPLE_RATE: u32 = 44100;

/// Starts capture from the default input device.
///
/// Frames of `frame_size` samples, `hop` samples apart, are sent through
/// `sender` with `try_send`; a full channel drops the frame.
///
/// # Returns
/// * `Ok((stream, sample_rate))` - Running stream handle and its sample rate
/// * `Err(e)` - No device, no f32 input format, or the stream failed to start
pub fn start_capture(
    sender: Sender<Vec<f32>>,
    frame_size: usize,
    hop: usize,
) -> Result<(cpal::Stream, u32)> {
    let mut framer = Framer::new(frame_size, hop)?;

    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or_else(|| anyhow!("No input device available"))?;

    log::info!("Using audio input device: {}", device.name()?);

    let configs = device.supported_input_configs()?.collect::<Vec<_>>();
    let supported_config = find_supported_config(configs, TARGET_SAMPLE_RATE)
        .ok_or_else(|| anyhow!("No suitable f32 input format found"))?;

    let rate = TARGET_SAMPLE_RATE.clamp(
        supported_config.min_sample_rate().0,
        supported_config.max_sample_rate().0,
    );
    let config = supported_config.with_sample_rate(cpal::SampleRate(rate));
    let channels = config.channels().max(1) as usize;
    let sample_rate = config.sample_rate().0;
    let config: cpal::StreamConfig = config.into();

    log::info!(
        "Selected sample rate: {} Hz, {} channel(s), frames of {} (hop {})",
        sample_rate,
        channels,
        frame_size,
        hop
    );

    let err_fn = |err| log::error!("An error occurred on the audio stream: {}", err);

    // Reused across callbacks for the downmix.
    let mut mono: Vec<f32> = Vec::with_capacity(frame_size);

    let stream = device
        .build_input_stream(
            &config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                let chunk: &[f32] = if channels == 1 {
                    data
                } else {
                    mono.clear();
                    mono.extend(
                        data.chunks_exact(channels)
                            .map(|c| c.iter().sum::<f32>() / channels as f32),
                    );
                    &mono
                };

                framer.push(chunk, |frame| {
                    if sender.try_send(frame.to_vec()).is_err() {
                        log::trace!("analysis channel full, dropping frame");
                    }
                });
            },
            err_fn,
            None,
        )
        .context("failed to build input stream")?;

    stream.play()?;

    Ok((stream, sample_rate))
}

/// Picks the f32 input configuration closest to `target_rate`, preferring
/// the fewest channels.
fn find_supported_config(
    configs: Vec<SupportedStreamConfigRange>,
    target_rate: u32,
) -> Option<SupportedStreamConfigRange> {
    configs
        .into_iter()
        .filter(|c| c.sample_format() == cpal::SampleFormat::F32)
        .min_by_key(|c| {
            let min = c.min_sample_rate().0;
            let max = c.max_sample_rate().0;
            let rate_diff = if (min..=max).contains(&target_rate) {
                0
            } else {
                min.abs_diff(target_rate).min(max.abs_diff(target_rate))
            };
            (c.channels(), rate_diff)
        })
}
