//! Verify command implementation
//!
//! Reports masker and sentence levels relative to the calibration tone.

use std::process::ExitCode;

use anyhow::{Context, Result};
use swirgen_audio::corpus::discover;
use swirgen_audio::verify::{verify_levels, NamedFile, VerificationReport, Verdict};
use swirgen_spec::ProjectConfig;

use super::reporting;
use crate::project;

/// Applies a `--tolerance` override to a copy of `config` and re-validates it.
pub fn with_tolerance(config: &ProjectConfig, tolerance_db: Option<f64>) -> Result<ProjectConfig> {
    let mut config = config.clone();
    if let Some(tolerance_db) = tolerance_db {
        config.verify.tolerance_db = tolerance_db;
        project::check(&config)?;
    }
    Ok(config)
}

/// Measures all levels against the tone.
pub fn execute(config: &ProjectConfig, tolerance_db: Option<f64>) -> Result<VerificationReport> {
    let config = &with_tolerance(config, tolerance_db)?;
    let tolerance_db = config.verify.tolerance_db;
    let tone = config.resolve(&config.calibration.output);
    let maskers = [
        NamedFile::new("Babble noise", config.resolve(&config.babble.output)),
        NamedFile::new("Speech-shaped noise", config.resolve(&config.noise.output)),
    ];

    let sources = project::resolve_sources(config, &config.normalize.targets);
    let sentences = discover(&sources).context("Failed to scan target folders")?;

    verify_levels(&tone, &maskers, &sentences, tolerance_db)
        .with_context(|| format!("Failed to verify against {}", tone.display()))
}

/// Run the verify command
///
/// # Returns
/// Exit code: 0 on PASS, 1 on FAIL
pub fn run(
    config: &ProjectConfig,
    tolerance_db: Option<f64>,
    json_output: bool,
) -> Result<ExitCode> {
    let report = execute(config, tolerance_db)?;
    let passed = report.verdict == Verdict::Pass;

    if json_output {
        reporting::print_json("verify", passed, &report)?;
    } else {
        reporting::print_verification(&report);
    }

    Ok(if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tolerance_override_is_validated() {
        let config = ProjectConfig::default();
        for bad in [-0.5, 0.0, f64::NAN] {
            let err = with_tolerance(&config, Some(bad)).unwrap_err();
            assert!(err.to_string().contains("C011"), "{}", err);
        }

        let dir = tempfile::tempdir().unwrap();
        let config = ProjectConfig {
            root: dir.path().to_path_buf(),
            ..ProjectConfig::default()
        };
        let err = execute(&config, Some(-1.0)).unwrap_err();
        assert!(err.to_string().contains("C011"));
    }

    #[test]
    fn test_tolerance_override_applies() {
        let config = ProjectConfig::default();
        let overridden = with_tolerance(&config, Some(0.5)).unwrap();
        assert_eq!(overridden.verify.tolerance_db, 0.5);
        assert_eq!(with_tolerance(&config, None).unwrap(), config);
    }
}
