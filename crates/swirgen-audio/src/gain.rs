//! RMS calibration against a reference tone, with clip protection.
//!
//! The reference RMS is measured once from the calibration tone and shared
//! read-only across a batch. Each file is scaled so its RMS equals the
//! reference, unless that would push its peak past the ceiling, in which case
//! the gain is reduced just enough to land on the ceiling.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::buffer::SignalBuffer;
use crate::error::{AudioError, AudioResult};
use crate::level::{peak, rms, to_dbfs};
use crate::wav;

/// Target RMS shared by every file of a batch, in normalized units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalibrationReference {
    /// RMS every file is scaled to.
    pub target_rms: f64,
}

impl CalibrationReference {
    /// Measures the RMS of a tone; `None` if the tone is silent.
    pub fn from_buffer(tone: &SignalBuffer) -> Option<Self> {
        let target_rms = rms(&tone.samples);
        (target_rms > 0.0).then_some(Self { target_rms })
    }

    /// Loads and measures a tone file.
    ///
    /// # Errors
    /// `SilentReference` if the tone has no energy, plus any load error.
    pub fn from_file(path: &Path) -> AudioResult<Self> {
        let tone = wav::load(path)?;
        Self::from_buffer(&tone).ok_or_else(|| AudioError::SilentReference {
            path: path.to_path_buf(),
        })
    }

    /// Reference for an ideal sine whose peak sits at `level_dbfs`.
    pub fn from_tone_level(level_dbfs: f64) -> Self {
        Self {
            target_rms: 10.0_f64.powf(level_dbfs / 20.0) / std::f64::consts::SQRT_2,
        }
    }

    /// Target level in dBFS.
    pub fn target_dbfs(&self) -> f64 {
        to_dbfs(self.target_rms, 1.0)
    }
}

/// Gain reduction applied to keep a file under the ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClipProtected {
    /// Factor the naive gain was multiplied by, in (0, 1).
    pub safety_ratio: f64,
    /// Peak the naive gain would have produced.
    pub proposed_peak: f64,
}

/// Gain chosen for one buffer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GainDecision {
    /// RMS before scaling.
    pub current_rms: f64,
    /// `target_rms / current_rms`.
    pub naive_gain: f64,
    /// Gain actually applied.
    pub applied_gain: f64,
    /// Set when the naive gain was reduced.
    pub clip_protection: Option<ClipProtected>,
}

/// Result of calibrating one buffer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GainOutcome {
    /// Silent input, left untouched.
    Skipped,
    /// Gain computed (and applied, for [`GainEngine::apply`]).
    Applied(GainDecision),
}

impl GainOutcome {
    /// Clip protection event, if any.
    pub fn clip_protection(&self) -> Option<ClipProtected> {
        match self {
            GainOutcome::Applied(decision) => decision.clip_protection,
            GainOutcome::Skipped => None,
        }
    }
}

/// Calibration result for one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    /// File that was normalized in place.
    pub path: PathBuf,
    /// Gain decision.
    pub outcome: GainOutcome,
    /// RMS level before, in dBFS.
    pub before_dbfs: f64,
    /// RMS level after quantization, in dBFS.
    pub after_dbfs: f64,
}

/// A file the batch could not process.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileFailure {
    /// Offending file.
    pub path: PathBuf,
    /// Stable error code.
    pub code: String,
    /// Error message.
    pub message: String,
}

/// Outcome of a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    /// Files that were processed (including skipped silent files).
    pub files: Vec<FileReport>,
    /// Files that failed to load or write.
    pub failures: Vec<FileFailure>,
}

impl BatchReport {
    /// Number of files whose gain was reduced.
    pub fn clip_protected(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.outcome.clip_protection().is_some())
            .count()
    }

    /// Number of silent files left untouched.
    pub fn skipped(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.outcome == GainOutcome::Skipped)
            .count()
    }
}

/// Scales buffers to a reference RMS without exceeding a peak ceiling.
#[derive(Debug, Clone, Copy)]
pub struct GainEngine {
    reference: CalibrationReference,
    ceiling: f64,
}

impl GainEngine {
    /// Creates an engine. `ceiling` is the largest allowed absolute sample,
    /// as a fraction of full scale.
    pub fn new(reference: CalibrationReference, ceiling: f64) -> Self {
        Self { reference, ceiling }
    }

    /// Reference in use.
    pub fn reference(&self) -> CalibrationReference {
        self.reference
    }

    /// Peak ceiling in use.
    pub fn ceiling(&self) -> f64 {
        self.ceiling
    }

    /// Decides the gain for `samples` without modifying them.
    pub fn compute(&self, samples: &[f64]) -> GainOutcome {
        let current_rms = rms(samples);
        if current_rms == 0.0 {
            return GainOutcome::Skipped;
        }

        let naive_gain = self.reference.target_rms / current_rms;
        let proposed_peak = peak(samples) * naive_gain;

        let (applied_gain, clip_protection) = if proposed_peak > self.ceiling {
            let safety_ratio = self.ceiling / proposed_peak;
            (
                naive_gain * safety_ratio,
                Some(ClipProtected {
                    safety_ratio,
                    proposed_peak,
                }),
            )
        } else {
            (naive_gain, None)
        };

        GainOutcome::Applied(GainDecision {
            current_rms,
            naive_gain,
            applied_gain,
            clip_protection,
        })
    }

    /// Decides and applies the gain in place.
    pub fn apply(&self, buffer: &mut SignalBuffer) -> GainOutcome {
        let outcome = self.compute(&buffer.samples);
        if let GainOutcome::Applied(decision) = outcome {
            buffer.apply_gain(decision.applied_gain);
        }
        outcome
    }

    /// Normalizes a file in place, keeping its bit depth.
    ///
    /// Silent files are not rewritten.
    pub fn normalize_file(&self, path: &Path) -> AudioResult<FileReport> {
        let mut buffer = wav::load(path)?;
        let before_dbfs = to_dbfs(rms(&buffer.samples), 1.0);

        let outcome = self.apply(&mut buffer);
        let after_dbfs = match outcome {
            GainOutcome::Skipped => {
                info!(file = %path.display(), "silent file skipped");
                before_dbfs
            }
            GainOutcome::Applied(decision) => {
                if let Some(event) = decision.clip_protection {
                    info!(
                        file = %path.display(),
                        safety_ratio = event.safety_ratio,
                        "clip protection reduced gain"
                    );
                }
                wav::write_file(path, &buffer)?;
                wav::load(path).map(|b| to_dbfs(rms(&b.samples), 1.0))?
            }
        };

        Ok(FileReport {
            path: path.to_path_buf(),
            outcome,
            before_dbfs,
            after_dbfs,
        })
    }

    /// Normalizes every file, continuing past per-file failures.
    pub fn normalize_batch(&self, paths: &[PathBuf]) -> BatchReport {
        let mut report = BatchReport::default();

        for path in paths {
            match self.normalize_file(path) {
                Ok(file) => report.files.push(file),
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "normalization failed");
                    report.failures.push(FileFailure {
                        path: path.clone(),
                        code: e.code().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        info!(
            files = report.files.len(),
            clip_protected = report.clip_protected(),
            failures = report.failures.len(),
            "batch normalized"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::from_dbfs;
    use std::f64::consts::PI;

    const CEILING: f64 = 32700.0 / 32768.0;

    fn sine(amplitude: f64, len: usize) -> SignalBuffer {
        let samples = (0..len)
            .map(|i| amplitude * (2.0 * PI * 1000.0 * i as f64 / 44100.0).sin())
            .collect();
        SignalBuffer::new(samples, 44100)
    }

    fn engine() -> GainEngine {
        GainEngine::new(CalibrationReference::from_tone_level(-20.0), CEILING)
    }

    #[test]
    fn test_reference_from_tone_level() {
        let reference = CalibrationReference::from_tone_level(-20.0);
        assert!((reference.target_rms - 0.0707).abs() < 1e-4);

        let measured = CalibrationReference::from_buffer(&sine(0.1, 44100)).unwrap();
        assert!((measured.target_rms - reference.target_rms).abs() < 1e-9);
    }

    #[test]
    fn test_silent_reference() {
        assert!(CalibrationReference::from_buffer(&SignalBuffer::zeros(100, 44100)).is_none());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        wav::write_file(&path, &SignalBuffer::zeros(100, 44100)).unwrap();
        assert!(matches!(
            CalibrationReference::from_file(&path),
            Err(AudioError::SilentReference { .. })
        ));
    }

    #[test]
    fn test_example_gain() {
        // rms 0.03 with a low crest factor so no protection triggers
        let samples: Vec<f64> = (0..1000)
            .map(|i| if i % 2 == 0 { 0.03 } else { -0.03 })
            .collect();
        match engine().compute(&samples) {
            GainOutcome::Applied(d) => {
                assert!((d.naive_gain - 2.357).abs() < 1e-3, "gain {}", d.naive_gain);
                assert_eq!(d.applied_gain, d.naive_gain);
                assert!(d.clip_protection.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_clip_protection_reduces_gain() {
        // one loud click in a quiet file: RMS match would push the peak past full scale
        let mut samples = vec![0.001; 10_000];
        samples[500] = 0.5;
        let mut buffer = SignalBuffer::new(samples, 44100);

        let outcome = engine().apply(&mut buffer);
        let decision = match outcome {
            GainOutcome::Applied(d) => d,
            other => panic!("unexpected {:?}", other),
        };
        let event = decision.clip_protection.unwrap();
        assert!(decision.applied_gain < decision.naive_gain);
        assert!(event.safety_ratio > 0.0 && event.safety_ratio < 1.0);
        assert!(peak(&buffer.samples) <= CEILING + 1e-12);
        assert!((peak(&buffer.samples) - CEILING).abs() < 1e-9);
    }

    #[test]
    fn test_converges_to_target() {
        let engine = engine();
        let target_db = engine.reference().target_dbfs();
        for amplitude in [0.01, 0.05, 0.2, 0.6] {
            let mut buffer = sine(amplitude, 44100);
            let outcome = engine.apply(&mut buffer);
            assert!(outcome.clip_protection().is_none());
            let db = to_dbfs(rms(&buffer.samples), 1.0);
            assert!((db - target_db).abs() < 0.01, "amplitude {}: {} dB", amplitude, db);
        }
    }

    #[test]
    fn test_silent_buffer_skipped() {
        let mut buffer = SignalBuffer::zeros(100, 44100);
        assert_eq!(engine().apply(&mut buffer), GainOutcome::Skipped);
        assert!(buffer.samples.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_normalize_batch_continues_past_failures() {
        let dir = tempfile::tempdir().unwrap();
        let quiet = dir.path().join("quiet.wav");
        let silent = dir.path().join("silent.wav");
        let broken = dir.path().join("broken.wav");
        wav::write_file(&quiet, &sine(from_dbfs(-35.0, 1.0), 44100)).unwrap();
        wav::write_file(&silent, &SignalBuffer::zeros(4410, 44100)).unwrap();
        std::fs::write(&broken, b"RIFF").unwrap();

        let engine = engine();
        let report = engine.normalize_batch(&[quiet.clone(), silent.clone(), broken.clone()]);

        assert_eq!(report.files.len(), 2);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, broken);

        let after = wav::load(&quiet).unwrap();
        let db = to_dbfs(rms(&after.samples), 1.0);
        assert!((db - engine.reference().target_dbfs()).abs() < 0.01);
        assert!((report.files[0].after_dbfs - db).abs() < 1e-12);
    }
}
