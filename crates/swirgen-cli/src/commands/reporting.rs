//! Shared human and JSON output for commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use swirgen_audio::gain::BatchReport;
use swirgen_audio::verify::{LevelComparison, LevelStatus, VerificationReport, Verdict};
use swirgen_audio::{AudioError, WavResult};

/// Error code used for failures that do not come from the audio core.
pub const CLI_ERROR_CODE: &str = "CLI_001";

/// A WAV file written by a generation command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedFile {
    /// Which stimulus this is ("tone", "babble", "noise").
    pub stage: String,
    /// Where it was written.
    pub path: PathBuf,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Length in samples.
    pub num_samples: usize,
    /// Length in seconds.
    pub duration_seconds: f64,
    /// BLAKE3 hash of the PCM data.
    pub pcm_hash: String,
    /// Seed the stage was generated with, for randomized stages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
}

impl GeneratedFile {
    /// Describes a written file.
    pub fn new(stage: &str, path: &Path, wav: &WavResult, seed: Option<u32>) -> Self {
        Self {
            stage: stage.to_string(),
            path: path.to_path_buf(),
            sample_rate: wav.sample_rate,
            num_samples: wav.num_samples,
            duration_seconds: wav.duration_seconds(),
            pcm_hash: wav.pcm_hash.clone(),
            seed,
        }
    }
}

/// Envelope for `--json` output.
#[derive(Debug, Serialize)]
pub struct JsonOutput<'a, T: Serialize> {
    /// Whether the command succeeded.
    pub success: bool,
    /// Command name.
    pub command: &'a str,
    /// Command-specific payload.
    pub result: T,
}

/// Structured error for `--json` output.
#[derive(Debug, Serialize)]
pub struct JsonError {
    /// Stable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

impl JsonError {
    /// Builds an error entry, keeping the audio core's code when available.
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let code = err
            .chain()
            .find_map(|cause| cause.downcast_ref::<AudioError>())
            .map(|audio| audio.code())
            .unwrap_or(CLI_ERROR_CODE);
        Self {
            code: code.to_string(),
            message: format!("{:#}", err),
        }
    }
}

/// Prints a pretty JSON envelope to stdout.
pub fn print_json<T: Serialize>(command: &str, success: bool, result: T) -> Result<()> {
    let output = JsonOutput {
        success,
        command,
        result,
    };
    let json = serde_json::to_string_pretty(&output).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

/// Prints a generated file summary.
pub fn print_generated(file: &GeneratedFile) {
    println!(
        "{} {} {}",
        "Generated".green().bold(),
        file.stage.bold(),
        file.path.display()
    );
    println!(
        "  {} {:.2} s at {} Hz ({} samples)",
        "Length:".dimmed(),
        file.duration_seconds,
        file.sample_rate,
        file.num_samples
    );
    if let Some(seed) = file.seed {
        println!("  {} {}", "Seed:".dimmed(), seed);
    }
    println!("  {} {}", "PCM hash:".dimmed(), &file.pcm_hash[..16]);
}

/// Prints a normalization batch summary.
pub fn print_batch(report: &BatchReport) {
    for file in &report.files {
        if let Some(event) = file.outcome.clip_protection() {
            println!(
                "  {} {} clip protected (x{:.4})",
                "!".yellow(),
                file.path.display(),
                event.safety_ratio
            );
        }
    }
    for failure in &report.failures {
        println!(
            "  {} {} [{}] {}",
            "x".red(),
            failure.path.display(),
            failure.code,
            failure.message
        );
    }
    println!(
        "{} {} normalized, {} clip protected, {} silent, {} failed",
        "Normalized:".green().bold(),
        report.files.len() - report.skipped(),
        report.clip_protected(),
        report.skipped(),
        report.failures.len()
    );
}

fn status_label(status: LevelStatus) -> colored::ColoredString {
    match status {
        LevelStatus::Match => status.to_string().green(),
        LevelStatus::Mismatch => status.to_string().red(),
    }
}

/// Prints a verification report.
pub fn print_verification(report: &VerificationReport) {
    println!("{}", "Reference (calibration tone):".cyan().bold());
    println!("  RMS: {:.4}", report.reference_rms);
    println!("  dB:  {:.2}", report.reference_dbfs);

    println!("{}", "Maskers:".cyan().bold());
    for masker in &report.maskers {
        match (masker.dbfs, masker.difference_db, masker.status) {
            (Some(dbfs), Some(diff), Some(status)) => println!(
                "  {}: {:.2} dB (diff {:+.2} dB) -> {}",
                masker.name,
                dbfs,
                diff,
                status_label(status)
            ),
            _ => println!("  {}: {}", masker.name, "not found".yellow()),
        }
    }

    println!("{}", "Sentences:".cyan().bold());
    match &report.sentences {
        Some(summary) => {
            println!("  Average level:         {:.2} dB", summary.average_dbfs);
            println!("  Difference from ref:   {:+.2} dB", summary.difference_db);
            println!(
                "  Individual mismatches: {}/{}",
                summary.mismatches, summary.measured
            );
            if !summary.unreadable.is_empty() {
                println!("  Unreadable files:      {}", summary.unreadable.len());
            }
        }
        None => println!("  {}", "no sentence files found".yellow()),
    }

    let verdict = match report.verdict {
        Verdict::Pass => format!(
            "PASS (all levels within {} dB of the reference)",
            report.tolerance_db
        )
        .green()
        .bold(),
        Verdict::Fail => "FAIL (normalization required)".red().bold(),
    };
    println!("\n{} {}", "Overall:".bold(), verdict);
}

/// Prints a masker-vs-speech comparison.
pub fn print_comparison(comparison: &LevelComparison) {
    println!("  Masker level:         {:.2} dB", comparison.masker_dbfs);
    println!(
        "  Average speech level: {:.2} dB ({} files)",
        comparison.average_speech_dbfs, comparison.speech_files
    );
    println!(
        "  Difference:           {:+.2} dB",
        comparison.difference_db
    );
    println!(
        "{} {:.2} dB",
        "Recommended offset:".green().bold(),
        comparison.recommended_offset_db
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_keeps_audio_code() {
        let err = anyhow::Error::new(AudioError::EmptyCorpus).context("babble failed");
        let json = JsonError::from_anyhow(&err);
        assert_eq!(json.code, "AUDIO_005");
        assert!(json.message.contains("babble failed"));
        assert!(json.message.contains("corpus is empty"));
    }

    #[test]
    fn test_json_error_default_code() {
        let json = JsonError::from_anyhow(&anyhow::anyhow!("boom"));
        assert_eq!(json.code, CLI_ERROR_CODE);
    }

    #[test]
    fn test_generated_file_serialization() {
        let wav = WavResult::from_buffer(&swirgen_audio::SignalBuffer::zeros(441, 44100));
        let file = GeneratedFile::new("tone", Path::new("out/tone.wav"), &wav, None);
        let value = serde_json::to_value(&file).unwrap();
        assert_eq!(value["stage"], "tone");
        assert_eq!(value["num_samples"], 441);
        assert!(value.get("seed").is_none());
    }
}
