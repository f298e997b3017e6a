//! Tone command implementation
//!
//! Writes the calibration tone every level is referenced to.

use std::process::ExitCode;

use anyhow::{Context, Result};
use swirgen_audio::{tone, wav};
use swirgen_spec::ProjectConfig;

use super::reporting::{self, GeneratedFile};

/// Generates and writes the calibration tone.
pub fn execute(config: &ProjectConfig) -> Result<GeneratedFile> {
    let path = config.resolve(&config.calibration.output);
    let buffer = tone::calibration_tone(&config.calibration, config.sample_rate)
        .context("Failed to generate calibration tone")?;
    let written = wav::write_file(&path, &buffer)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(GeneratedFile::new("tone", &path, &written, None))
}

/// Run the tone command
pub fn run(config: &ProjectConfig, json_output: bool) -> Result<ExitCode> {
    let file = execute(config)?;
    if json_output {
        reporting::print_json("tone", true, &file)?;
    } else {
        reporting::print_generated(&file);
    }
    Ok(ExitCode::SUCCESS)
}
