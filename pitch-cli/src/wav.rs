//! WAV loading for offline analysis.

use std::path::Path;

use anyhow::{Context, Result, anyhow};

/// A decoded file, mixed down to one channel.
#[derive(Debug, Clone)]
pub struct MonoAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// Reads a WAV file, normalizing integer formats to `[-1.0, 1.0]` and
/// averaging all channels into one.
pub fn read_mono(path: &Path) -> Result<MonoAudio> {
    let reader = hound::WavReader::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let spec = reader.spec();
    let channels = spec.channels as usize;
    if channels == 0 {
        return Err(anyhow!("{} declares zero channels", path.display()));
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<f32>, _>>()?,
        hound::SampleFormat::Int => {
            // max_val = 2^(bits-1), e.g. 32768 for 16-bit audio
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<f32>, _>>()?
        }
    };

    let samples = if channels == 1 {
        interleaved
    } else {
        interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    };

    log::info!(
        "loaded {}: {} Hz, {} channel(s), {:.2} s",
        path.display(),
        spec.sample_rate,
        channels,
        samples.len() as f32 / spec.sample_rate.max(1) as f32
    );

    Ok(MonoAudio {
        samples,
        sample_rate: spec.sample_rate,
    })
}
