//! liquid-launch - render and check the liquid launch screen headlessly

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use liquid_launch::headless_runner::run_loaded_scenario;
use liquid_launch::{render_sequence_with, HeadlessScenario, LaunchConfig};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Headless renderer and snapshot checker for the liquid launch screen
#[derive(Parser, Debug)]
#[command(name = "liquid-launch")]
#[command(about = "Render and check the liquid launch screen headlessly")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the launch to numbered PNG frames plus report.json
    Render {
        /// Output directory
        #[arg(short, long)]
        out: PathBuf,

        /// Launch configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Keep one frame every N milliseconds
        #[arg(long, default_value = "100")]
        every_ms: f32,
    },

    /// Run a JSON scenario; exits non-zero when an assertion fails
    Check {
        /// Scenario file
        scenario: PathBuf,

        /// Launch configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the report to this relative path instead of stdout
        #[arg(long)]
        report: Option<PathBuf>,

        /// Export captured frames to this directory
        #[arg(long)]
        captures: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match Cli::parse().command {
        Command::Render {
            out,
            config,
            every_ms,
        } => render(&out, config.as_deref(), every_ms),
        Command::Check {
            scenario,
            config,
            report,
            captures,
        } => check(&scenario, config.as_deref(), report.as_deref(), captures.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> Result<LaunchConfig> {
    match path {
        Some(path) => LaunchConfig::load(path)
            .with_context(|| format!("loading configuration {}", path.display())),
        None => Ok(LaunchConfig::default()),
    }
}

fn render(out: &Path, config: Option<&Path>, every_ms: f32) -> Result<()> {
    let config = load_config(config)?;
    std::fs::create_dir_all(out).with_context(|| format!("creating {}", out.display()))?;

    let mut written = 0usize;
    let report = render_sequence_with(&config, every_ms, |frame| {
        let path = out.join(format!("frame_{written:04}.png"));
        frame
            .save_png(&path)
            .with_context(|| format!("writing {}", path.display()))?;
        written += 1;
        Ok(())
    })?;

    let report_path = out.join("report.json");
    let file = File::create(&report_path)
        .with_context(|| format!("creating {}", report_path.display()))?;
    let mut writer = BufWriter::new(file);
    report.write_to_writer(&mut writer)?;
    writer.flush()?;

    tracing::info!(frames = written, out = %out.display(), "render complete");
    Ok(())
}

fn check(
    scenario: &Path,
    config: Option<&Path>,
    report: Option<&Path>,
    captures: Option<&Path>,
) -> Result<()> {
    let config = load_config(config)?;
    let scenario = HeadlessScenario::from_path(scenario)?;
    let outcome = run_loaded_scenario(&scenario, &config)?;

    match report {
        Some(path) => outcome.report().write_to_path(path)?,
        None => outcome.report().write_to_writer(&mut std::io::stdout().lock())?,
    }

    if let Some(dir) = captures {
        outcome
            .captures()
            .export_frames(dir, "capture")
            .with_context(|| format!("writing captures to {}", dir.display()))?;
    }

    if outcome.is_failed() {
        let report = outcome.report();
        bail!(
            "scenario failed at step {}: {}",
            report.failed_step_index.unwrap_or_default(),
            report.message.as_deref().unwrap_or("assertion failed")
        );
    }
    Ok(())
}
