use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Aeolus continuous wavelet analysis toolkit.
#[derive(Parser)]
#[command(
    name = "aeolus",
    version,
    about = "Continuous wavelet analysis for multi-component field measurements"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Run the analysis pipeline on a signal file.
    Analyze(AnalyzeArgs),
    /// Write a synthetic signal file for trying the pipeline.
    Synth(SynthArgs),
}

/// Arguments for the `analyze` subcommand.
#[derive(clap::Args)]
pub struct AnalyzeArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "aeolus.toml")]
    pub config: PathBuf,

    /// Override input signal JSON path from config.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Override output JSON path from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `synth` subcommand.
#[derive(clap::Args)]
pub struct SynthArgs {
    /// Scenario to synthesize: "bands", "circular", or "aligned".
    #[arg(short, long, default_value = "bands")]
    pub scenario: String,

    /// Path for the signal JSON file.
    #[arg(short, long, default_value = "signal.json")]
    pub output: PathBuf,

    /// Number of samples.
    #[arg(short = 'n', long, default_value_t = 4096)]
    pub samples: usize,

    /// Sampling interval in seconds.
    #[arg(long, default_value_t = 1.0)]
    pub dt: f64,

    /// RNG seed for the noise floor.
    #[arg(long)]
    pub seed: Option<u64>,
}
