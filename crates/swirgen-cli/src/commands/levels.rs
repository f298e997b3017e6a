//! Levels command implementation
//!
//! Compares a masker with the average sentence level and recommends the
//! offset that would bring them together.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use swirgen_audio::corpus::discover;
use swirgen_audio::verify::{compare_masker_to_speech, LevelComparison};
use swirgen_spec::ProjectConfig;

use super::reporting;
use crate::project;

/// Masker to measure.
///
/// A path given on the command line is used as is, relative to the working
/// directory; the default babble output resolves against the project root.
pub fn masker_path(config: &ProjectConfig, masker: Option<&Path>) -> PathBuf {
    match masker {
        Some(path) => path.to_path_buf(),
        None => config.resolve(&config.babble.output),
    }
}

/// Compares `masker` (default: the babble output) with the target sentences.
pub fn execute(config: &ProjectConfig, masker: Option<&Path>) -> Result<LevelComparison> {
    let masker = masker_path(config, masker);
    let sources = project::resolve_sources(config, &config.normalize.targets);
    let speech = discover(&sources).context("Failed to scan target folders")?;

    compare_masker_to_speech(&masker, &speech)
        .with_context(|| format!("Failed to compare {}", masker.display()))
}

/// Run the levels command
pub fn run(config: &ProjectConfig, masker: Option<&Path>, json_output: bool) -> Result<ExitCode> {
    let comparison = execute(config, masker)?;
    if json_output {
        reporting::print_json("levels", true, &comparison)?;
    } else {
        println!("{}", "Masker vs. speech:".cyan().bold());
        reporting::print_comparison(&comparison);
    }
    Ok(ExitCode::SUCCESS)
}
