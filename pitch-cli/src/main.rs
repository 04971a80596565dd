//! # pitch-cli - command-line front end for the YIN pitch estimator
//!
//! Runs the detector over WAV files or, with the `live` feature, over the
//! default microphone, and prints one pitch estimate per frame.

mod analyze;
#[cfg(feature = "live")]
mod live;
mod smoothing;
mod wav;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pitch_core::{DetectorConfig, DifferenceMethod};

/// Real-time fundamental-frequency estimation (YIN)
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a WAV file frame by frame
    Analyze(AnalyzeArgs),
    /// Detect pitch from the default input device until Ctrl-C
    #[cfg(feature = "live")]
    Listen(ListenArgs),
    /// Print the effective detector configuration as JSON
    Config(DetectorArgs),
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// WAV file to analyze
    path: PathBuf,
    #[command(flatten)]
    framing: FramingArgs,
    #[command(flatten)]
    detector: DetectorArgs,
    /// Print one JSON object per frame instead of tab-separated columns
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[cfg(feature = "live")]
#[derive(Args, Debug)]
struct ListenArgs {
    #[command(flatten)]
    framing: FramingArgs,
    #[command(flatten)]
    detector: DetectorArgs,
}

#[derive(Args, Debug, Clone)]
struct FramingArgs {
    /// Samples per analysis frame
    #[arg(long, default_value_t = 2048)]
    frame_size: usize,
    /// Samples between the starts of consecutive frames
    #[arg(long, default_value_t = 1024)]
    hop: usize,
    /// Exponential smoothing weight of the newest estimate, in (0, 1]
    #[arg(long)]
    smooth: Option<f32>,
}

#[derive(Args, Debug, Clone)]
struct DetectorArgs {
    /// JSON file with detector settings; missing keys use defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Lowest detectable pitch in Hz
    #[arg(long)]
    min_frequency: Option<f32>,
    /// Highest detectable pitch in Hz
    #[arg(long)]
    max_frequency: Option<f32>,
    /// YIN absolute threshold, in (0, 1)
    #[arg(long)]
    threshold: Option<f32>,
    /// RMS floor below which frames count as silence
    #[arg(long)]
    silence_rms: Option<f32>,
    /// Compute the difference function through the FFT
    #[arg(long, default_value_t = false)]
    fft: bool,
}

impl DetectorArgs {
    /// Merges the optional config file with the command-line overrides and
    /// validates the result.
    fn resolve(&self) -> Result<DetectorConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("failed to open config {}", path.display()))?;
                serde_json::from_reader(BufReader::new(file))
                    .with_context(|| format!("invalid config {}", path.display()))?
            }
            None => DetectorConfig::default(),
        };

        if let Some(min) = self.min_frequency {
            config.min_frequency = min;
        }
        if let Some(max) = self.max_frequency {
            config.max_frequency = max;
        }
        if let Some(threshold) = self.threshold {
            config.absolute_threshold = threshold;
        }
        if let Some(silence) = self.silence_rms {
            config.silence_rms_threshold = silence;
        }
        if self.fft {
            config.difference_method = DifferenceMethod::Fft;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Analyze(args) => {
            let config = args.detector.resolve()?;
            analyze::run(&args.path, &args.framing, config, args.json)
        }
        #[cfg(feature = "live")]
        Command::Listen(args) => {
            let config = args.detector.resolve()?;
            live::run(&args.framing, config)
        }
        Command::Config(args) => {
            let config = args.resolve()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}
