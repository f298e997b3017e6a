//! CLI argument definitions for the swirgen command-line interface.
//!
//! All `#[derive(Parser)]` and `#[derive(Subcommand)]` types are defined here,
//! keeping `main.rs` focused on dispatch logic.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

/// swirgen - Calibrated speech-in-noise stimulus generation
#[derive(Parser)]
#[command(name = "swirgen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    /// Project config file (default: ./swirgen.json if present, else built-in defaults)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Output machine-readable JSON (no colored output)
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Write a project config with default values
    Init {
        /// Where to write the config
        #[arg(short, long, default_value = "swirgen.json")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Generate the calibration tone
    Tone,

    /// Build the multi-talker babble masker
    Babble {
        /// Override the project seed
        #[arg(long)]
        seed: Option<u32>,

        /// Override the number of talkers
        #[arg(long)]
        voices: Option<usize>,

        /// Override the masker duration in seconds
        #[arg(long)]
        duration: Option<f64>,
    },

    /// Build the speech-shaped noise masker
    Noise {
        /// Override the project seed
        #[arg(long)]
        seed: Option<u32>,

        /// Override the FIR filter length (odd)
        #[arg(long)]
        taps: Option<usize>,

        /// Override the masker duration in seconds
        #[arg(long)]
        duration: Option<f64>,
    },

    /// Normalize maskers and sentences to the calibration tone's RMS
    Normalize,

    /// Check masker and sentence levels against the calibration tone
    Verify {
        /// Override the allowed deviation in dB
        #[arg(long)]
        tolerance: Option<f64>,
    },

    /// Compare a masker's level with the average sentence level
    Levels {
        /// Masker to compare, relative to the working directory
        /// (default: the configured babble output under the project root)
        #[arg(short, long)]
        masker: Option<PathBuf>,
    },

    /// Run tone, babble, noise, normalize and verify in order
    Run,
}
