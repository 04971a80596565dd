//! Offline, frame-by-frame analysis of a WAV file.

use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::Result;
use pitch_core::{AudioFrame, DetectorConfig, PitchDetector, frames, validate_framing};
use serde::Serialize;

use crate::FramingArgs;
use crate::smoothing::ExponentialSmoother;
use crate::wav;

/// One output row.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FrameReport {
    pub time_s: f32,
    pub frequency_hz: f32,
    pub confidence: f32,
    pub voiced: bool,
}

pub fn run(path: &Path, framing: &FramingArgs, config: DetectorConfig, json: bool) -> Result<()> {
    let audio = wav::read_mono(path)?;
    let reports = analyze_signal(
        &audio.samples,
        audio.sample_rate as f32,
        framing,
        config,
    )?;

    let stdout = io::stdout();
    write_reports(BufWriter::new(stdout.lock()), &reports, json)?;

    let voiced = reports.iter().filter(|r| r.voiced).count();
    log::info!("{} frames analyzed, {} voiced", reports.len(), voiced);
    Ok(())
}

/// Writes `reports` as a tab-separated table with a header row, or as one
/// JSON object per line.
pub fn write_reports<W: Write>(mut out: W, reports: &[FrameReport], json: bool) -> Result<()> {
    if !json {
        writeln!(out, "time_s\tfrequency_hz\tconfidence")?;
    }
    for report in reports {
        if json {
            serde_json::to_writer(&mut out, report)?;
            writeln!(out)?;
        } else {
            writeln!(
                out,
                "{:.4}\t{:.2}\t{:.3}",
                report.time_s, report.frequency_hz, report.confidence
            )?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Runs one detector over every full frame of `samples`.
pub fn analyze_signal(
    samples: &[f32],
    sample_rate: f32,
    framing: &FramingArgs,
    config: DetectorConfig,
) -> Result<Vec<FrameReport>> {
    validate_framing(framing.frame_size, framing.hop)?;

    let mut detector = PitchDetector::new(config)?;
    detector.prepare(framing.frame_size, sample_rate);
    let mut smoother = framing.smooth.map(ExponentialSmoother::new);

    let reports = frames(samples, framing.frame_size, framing.hop)
        .enumerate()
        .map(|(index, frame)| {
            let estimate = detector.analyze(AudioFrame::new(frame, sample_rate));
            let frequency = match smoother.as_mut() {
                Some(s) => s.update(estimate.frequency),
                None => estimate.frequency,
            };
            FrameReport {
                time_s: (index * framing.hop) as f32 / sample_rate,
                frequency_hz: frequency,
                confidence: estimate.confidence,
                voiced: estimate.is_voiced(),
            }
        })
        .collect();

    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn framing(smooth: Option<f32>) -> FramingArgs {
        FramingArgs {
            frame_size: 2048,
            hop: 1024,
            smooth,
        }
    }

    #[test]
    fn tone_then_silence() {
        let sr = 44100.0;
        let mut signal: Vec<f32> = (0..22050)
            .map(|i| 0.5 * (2.0 * PI * 330.0 * i as f32 / sr).sin())
            .collect();
        signal.extend(std::iter::repeat_n(0.0, 22050));

        let reports =
            analyze_signal(&signal, sr, &framing(None), DetectorConfig::default()).unwrap();
        assert_eq!(reports.len(), (44100 - 2048) / 1024 + 1);

        let first = &reports[0];
        assert!(first.voiced);
        assert!((first.frequency_hz - 330.0).abs() < 3.3);
        assert_eq!(first.time_s, 0.0);

        let last = reports.last().unwrap();
        assert!(!last.voiced);
        assert_eq!(last.frequency_hz, 0.0);
    }

    #[test]
    fn smoothing_is_applied_to_voiced_frames() {
        let sr = 44100.0;
        let signal: Vec<f32> = (0..8192)
            .map(|i| 0.5 * (2.0 * PI * 220.0 * i as f32 / sr).sin())
            .collect();
        let reports =
            analyze_signal(&signal, sr, &framing(Some(0.5)), DetectorConfig::default()).unwrap();
        assert!(reports.iter().all(|r| (r.frequency_hz - 220.0).abs() < 2.2));
    }

    #[test]
    fn zero_hop_is_rejected() {
        let bad = FramingArgs {
            frame_size: 2048,
            hop: 0,
            smooth: None,
        };
        assert!(analyze_signal(&[0.0; 4096], 44100.0, &bad, DetectorConfig::default()).is_err());

        let huge = FramingArgs {
            frame_size: usize::MAX,
            hop: 1,
            smooth: None,
        };
        assert!(analyze_signal(&[0.0; 4096], 44100.0, &huge, DetectorConfig::default()).is_err());
    }

    fn sample_reports() -> Vec<FrameReport> {
        vec![
            FrameReport {
                time_s: 0.0,
                frequency_hz: 440.0,
                confidence: 0.5,
                voiced: true,
            },
            FrameReport {
                time_s: 0.25,
                frequency_hz: 0.0,
                confidence: 0.0,
                voiced: false,
            },
        ]
    }

    #[test]
    fn table_output_has_header_and_fixed_precision() {
        let mut out = Vec::new();
        write_reports(&mut out, &sample_reports(), false).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines,
            vec![
                "time_s\tfrequency_hz\tconfidence",
                "0.0000\t440.00\t0.500",
                "0.2500\t0.00\t0.000",
            ]
        );
    }

    #[test]
    fn json_output_is_one_object_per_line() {
        let mut out = Vec::new();
        write_reports(&mut out, &sample_reports(), true).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["time_s"], 0.0);
        assert_eq!(first["frequency_hz"], 440.0);
        assert_eq!(first["confidence"], 0.5);
        assert_eq!(first["voiced"], true);

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["voiced"], false);
        assert_eq!(second["frequency_hz"], 0.0);
    }
}
