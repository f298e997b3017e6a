//! Normalize command implementation
//!
//! Scales the maskers and every target sentence to the calibration tone's
//! RMS, reducing the gain of files that would otherwise clip.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use swirgen_audio::corpus::discover;
use swirgen_audio::gain::BatchReport;
use swirgen_audio::{CalibrationReference, GainEngine};
use swirgen_spec::ProjectConfig;
use tracing::warn;

use super::reporting;
use crate::project;

/// Files the normalization pass touches: maskers first, then sentences.
pub fn collect_targets(config: &ProjectConfig) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if config.normalize.include_maskers {
        for output in [&config.babble.output, &config.noise.output] {
            let path = config.resolve(output);
            if path.is_file() {
                files.push(path);
            } else {
                warn!(file = %path.display(), "masker not found, not normalized");
            }
        }
    }

    let sources = project::resolve_sources(config, &config.normalize.targets);
    files.extend(discover(&sources).context("Failed to scan target folders")?);
    Ok(files)
}

/// Normalizes every target against the calibration tone.
///
/// Fails only when the tone is missing or silent; per-file problems are
/// recorded in the report.
pub fn execute(config: &ProjectConfig) -> Result<BatchReport> {
    let tone = config.resolve(&config.calibration.output);
    let reference = CalibrationReference::from_file(&tone)
        .with_context(|| format!("Calibration reference unavailable: {}", tone.display()))?;
    let engine = GainEngine::new(reference, config.normalize.ceiling_fraction());

    let files = collect_targets(config)?;
    Ok(engine.normalize_batch(&files))
}

/// Run the normalize command
pub fn run(config: &ProjectConfig, json_output: bool) -> Result<ExitCode> {
    if !json_output {
        println!(
            "{} target {:.2} dBFS, ceiling {}",
            "Normalizing:".cyan().bold(),
            CalibrationReference::from_tone_level(config.calibration.level_dbfs).target_dbfs(),
            config.normalize.clip_ceiling
        );
    }

    let report = execute(config)?;
    if json_output {
        reporting::print_json("normalize", report.failures.is_empty(), &report)?;
    } else {
        reporting::print_batch(&report);
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tone_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let config = ProjectConfig {
            root: dir.path().to_path_buf(),
            ..ProjectConfig::default()
        };
        let err = execute(&config).unwrap_err();
        assert!(err.to_string().contains("Calibration reference unavailable"));
    }

    #[test]
    fn test_collect_targets_skips_missing_maskers() {
        let dir = tempfile::tempdir().unwrap();
        let config = ProjectConfig {
            root: dir.path().to_path_buf(),
            ..ProjectConfig::default()
        };
        assert!(collect_targets(&config).unwrap().is_empty());
    }
}
