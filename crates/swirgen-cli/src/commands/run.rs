//! Run command implementation
//!
//! Produces the whole stimulus set in dependency order: tone, babble, noise,
//! normalization, then verification.

use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use swirgen_audio::gain::BatchReport;
use swirgen_audio::verify::{VerificationReport, Verdict};
use swirgen_spec::ProjectConfig;

use super::reporting::{self, GeneratedFile};
use super::{babble, noise, normalize, tone, verify};

/// Everything the pipeline produced.
#[derive(Debug, Serialize)]
pub struct PipelineReport {
    /// Files written by the generation stages.
    pub generated: Vec<GeneratedFile>,
    /// Normalization batch.
    pub normalization: BatchReport,
    /// Final level check.
    pub verification: VerificationReport,
}

/// Runs every stage, stopping at the first stage that fails outright.
pub fn execute(config: &ProjectConfig, print_text: bool) -> Result<PipelineReport> {
    let stage = |name: &str| {
        if print_text {
            println!("\n{} {}", "==>".cyan().bold(), name.bold());
        }
    };

    let mut generated = Vec::with_capacity(3);

    stage("calibration tone");
    generated.push(tone::execute(config)?);
    stage("babble masker");
    generated.push(babble::execute(config)?);
    stage("speech-shaped noise");
    generated.push(noise::execute(config)?);
    if print_text {
        generated.iter().for_each(reporting::print_generated);
    }

    stage("normalization");
    let normalization = normalize::execute(config)?;
    if print_text {
        reporting::print_batch(&normalization);
    }

    stage("verification");
    let verification = verify::execute(config, None)?;
    if print_text {
        reporting::print_verification(&verification);
    }

    Ok(PipelineReport {
        generated,
        normalization,
        verification,
    })
}

/// Run the run command
///
/// # Returns
/// Exit code: 0 when verification passes, 1 otherwise
pub fn run(config: &ProjectConfig, json_output: bool) -> Result<ExitCode> {
    let report = execute(config, !json_output)?;
    let passed = report.verification.verdict == Verdict::Pass;

    if json_output {
        reporting::print_json("run", passed, &report)?;
    }

    Ok(if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}
