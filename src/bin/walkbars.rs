//! walkbars: animated bar charts of bounded random walks
//!
//! Run: `walkbars --series 5 --duration 10 --fps 10 -o walk.gif`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use walkbars::{render_animation, AnimationConfig, Error};

/// walkbars: animated bar charts of bounded random walks
#[derive(Parser, Debug)]
#[command(name = "walkbars")]
#[command(author = "PAIML Team")]
#[command(version)]
#[command(about = "Render random-walk series as an animated GIF bar chart", long_about = None)]
struct Cli {
    /// Config file path (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output GIF path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of series (bars)
    #[arg(long)]
    series: Option<usize>,

    /// Total duration in seconds
    #[arg(long)]
    duration: Option<f64>,

    /// Frames per second
    #[arg(long)]
    fps: Option<f64>,

    /// Standard deviation of each random-walk step
    #[arg(long)]
    std_dev: Option<f64>,

    /// RNG seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Also write each frame as a PNG into this directory
    #[arg(long)]
    frames_dir: Option<PathBuf>,

    /// Frame width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Frame height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Play the animation once instead of looping
    #[arg(long)]
    no_loop: bool,

    /// Verbose logging (per-frame statistics)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Flags override file values, file values override defaults.
    fn into_config(self) -> Result<AnimationConfig> {
        let mut config = match &self.config {
            Some(path) => AnimationConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => AnimationConfig::default(),
        };

        if let Some(output) = self.output {
            config.output_path = output;
        }
        if let Some(series) = self.series {
            config.series_count = series;
        }
        if let Some(duration) = self.duration {
            config.total_duration = duration;
        }
        if let Some(fps) = self.fps {
            config.frames_per_second = fps;
        }
        if let Some(std_dev) = self.std_dev {
            config.step_std_dev = std_dev;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.frames_dir.is_some() {
            config.frames_dir = self.frames_dir;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if self.no_loop {
            config.looping = false;
        }

        Ok(config)
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.into_config()?;

    match render_animation(&config) {
        Ok(summary) => {
            println!(
                "{} frames x {} series -> {}",
                summary.frame_count,
                summary.series_count,
                summary.output_path.display()
            );
            Ok(())
        }
        Err(e) => {
            report(&e);
            std::process::exit(1);
        }
    }
}

fn report(error: &Error) {
    eprintln!("Error ({} stage): {error}", error.stage());
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["walkbars"]);
        assert_eq!(cli.into_config().unwrap(), AnimationConfig::default());
    }

    #[test]
    fn test_cli_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("walk.yaml");
        std::fs::write(&path, "series_count: 8\nframes_per_second: 5\n").unwrap();

        let cli = Cli::parse_from([
            "walkbars",
            "--config",
            path.to_str().unwrap(),
            "--series",
            "3",
            "--no-loop",
            "-o",
            "out.gif",
        ]);
        let config = cli.into_config().unwrap();

        assert_eq!(config.series_count, 3);
        assert_eq!(config.frames_per_second, 5.0);
        assert!(!config.looping);
        assert_eq!(config.output_path, PathBuf::from("out.gif"));
    }

    #[test]
    fn test_cli_missing_config() {
        let cli = Cli::parse_from(["walkbars", "--config", "/nonexistent/walk.yaml"]);
        assert!(cli.into_config().is_err());
    }
}
