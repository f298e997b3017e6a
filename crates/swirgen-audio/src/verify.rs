//! Level verification against the calibration tone.
//!
//! Two reports are produced: a conformance check of maskers and sentences
//! against the tone ([`verify_levels`]), and a masker-vs-speech comparison
//! that recommends a presentation offset ([`compare_masker_to_speech`]).

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{AudioError, AudioResult};
use crate::level::{rms, to_dbfs};
use crate::wav;

/// Speech files at or below this level are treated as silent and ignored.
pub const SILENCE_FLOOR_DBFS: f64 = -100.0;

/// RMS (normalized) and dBFS of a file.
pub fn measure_file(path: &Path) -> AudioResult<(f64, f64)> {
    let buffer = wav::load(path)?;
    let level = rms(&buffer.samples);
    Ok((level, to_dbfs(level, 1.0)))
}

/// Whether a level is within tolerance of the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LevelStatus {
    /// Within tolerance.
    Match,
    /// Outside tolerance.
    Mismatch,
}

impl LevelStatus {
    fn from_difference(difference_db: f64, tolerance_db: f64) -> Self {
        if difference_db.abs() <= tolerance_db {
            LevelStatus::Match
        } else {
            LevelStatus::Mismatch
        }
    }
}

impl fmt::Display for LevelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelStatus::Match => write!(f, "MATCH"),
            LevelStatus::Mismatch => write!(f, "MISMATCH"),
        }
    }
}

/// Overall verification result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// Sentence levels agree with the reference.
    Pass,
    /// Normalization is required.
    Fail,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => write!(f, "PASS"),
            Verdict::Fail => write!(f, "FAIL"),
        }
    }
}

/// A masker to check, by display name.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedFile {
    /// Display name, e.g. "babble".
    pub name: String,
    /// File location.
    pub path: PathBuf,
}

impl NamedFile {
    /// Creates a named file.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Level of one masker relative to the reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaskerCheck {
    /// Display name.
    pub name: String,
    /// File location.
    pub path: PathBuf,
    /// Measured level, `None` when the file could not be read.
    pub dbfs: Option<f64>,
    /// Level minus reference.
    pub difference_db: Option<f64>,
    /// Tolerance verdict.
    pub status: Option<LevelStatus>,
}

/// Aggregate level of the sentence corpus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentenceSummary {
    /// Sentences measured.
    pub measured: usize,
    /// dBFS of the mean RMS across sentences.
    pub average_dbfs: f64,
    /// Average minus reference.
    pub difference_db: f64,
    /// Sentences individually outside tolerance.
    pub mismatches: usize,
    /// Sentences that could not be read.
    pub unreadable: Vec<PathBuf>,
}

/// Full verification report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationReport {
    /// Reference RMS (normalized units).
    pub reference_rms: f64,
    /// Reference level in dBFS.
    pub reference_dbfs: f64,
    /// Allowed deviation in dB.
    pub tolerance_db: f64,
    /// Per-masker checks.
    pub maskers: Vec<MaskerCheck>,
    /// Sentence summary, `None` when no sentence could be measured.
    pub sentences: Option<SentenceSummary>,
    /// PASS when the sentence average is within tolerance and no sentence
    /// mismatches individually.
    pub verdict: Verdict,
}

/// Measures maskers and sentences against the calibration tone.
///
/// Unreadable maskers and sentences are reported, not fatal. The verdict only
/// depends on the sentences; with no readable sentence it is FAIL.
///
/// # Errors
/// Any error loading the reference, or `SilentReference`.
pub fn verify_levels(
    reference: &Path,
    maskers: &[NamedFile],
    sentences: &[PathBuf],
    tolerance_db: f64,
) -> AudioResult<VerificationReport> {
    let (reference_rms, reference_dbfs) = measure_file(reference)?;
    if reference_rms == 0.0 {
        return Err(AudioError::SilentReference {
            path: reference.to_path_buf(),
        });
    }

    let maskers = maskers
        .iter()
        .map(|masker| match measure_file(&masker.path) {
            Ok((_, dbfs)) => {
                let difference_db = dbfs - reference_dbfs;
                MaskerCheck {
                    name: masker.name.clone(),
                    path: masker.path.clone(),
                    dbfs: Some(dbfs),
                    difference_db: Some(difference_db),
                    status: Some(LevelStatus::from_difference(difference_db, tolerance_db)),
                }
            }
            Err(e) => {
                warn!(file = %masker.path.display(), error = %e, "masker not measured");
                MaskerCheck {
                    name: masker.name.clone(),
                    path: masker.path.clone(),
                    dbfs: None,
                    difference_db: None,
                    status: None,
                }
            }
        })
        .collect();

    let mut levels = Vec::with_capacity(sentences.len());
    let mut unreadable = Vec::new();
    let mut mismatches = 0;
    for path in sentences {
        match measure_file(path) {
            Ok((level, dbfs)) => {
                let difference_db = dbfs - reference_dbfs;
                if LevelStatus::from_difference(difference_db, tolerance_db)
                    == LevelStatus::Mismatch
                {
                    debug!(file = %path.display(), difference_db, "sentence mismatch");
                    mismatches += 1;
                }
                levels.push(level);
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "sentence not measured");
                unreadable.push(path.clone());
            }
        }
    }

    let sentences = if levels.is_empty() {
        None
    } else {
        let mean_rms = levels.iter().sum::<f64>() / levels.len() as f64;
        let average_dbfs = to_dbfs(mean_rms, 1.0);
        Some(SentenceSummary {
            measured: levels.len(),
            average_dbfs,
            difference_db: average_dbfs - reference_dbfs,
            mismatches,
            unreadable,
        })
    };

    let verdict = match &sentences {
        Some(s) if s.difference_db.abs() <= tolerance_db && s.mismatches == 0 => Verdict::Pass,
        _ => Verdict::Fail,
    };

    Ok(VerificationReport {
        reference_rms,
        reference_dbfs,
        tolerance_db,
        maskers,
        sentences,
        verdict,
    })
}

/// Masker level relative to the speech corpus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelComparison {
    /// Masker level in dBFS.
    pub masker_dbfs: f64,
    /// Speech files included in the average.
    pub speech_files: usize,
    /// Mean of the per-file speech levels in dBFS.
    pub average_speech_dbfs: f64,
    /// Masker minus speech.
    pub difference_db: f64,
    /// Offset that would bring the masker to the speech level.
    pub recommended_offset_db: f64,
}

/// Compares a masker's level with the average level of `speech` files.
///
/// Files that cannot be read or sit at or below [`SILENCE_FLOOR_DBFS`] are
/// left out of the average.
///
/// # Errors
/// Any error loading the masker; `EmptyCorpus` when no speech file qualifies.
pub fn compare_masker_to_speech(
    masker: &Path,
    speech: &[PathBuf],
) -> AudioResult<LevelComparison> {
    let (_, masker_dbfs) = measure_file(masker)?;

    let levels: Vec<f64> = speech
        .iter()
        .filter_map(|path| match measure_file(path) {
            Ok((_, dbfs)) => Some(dbfs),
            Err(e) => {
                warn!(file = %path.display(), error = %e, "speech file not measured");
                None
            }
        })
        .filter(|&dbfs| dbfs > SILENCE_FLOOR_DBFS)
        .collect();

    if levels.is_empty() {
        return Err(AudioError::EmptyCorpus);
    }

    let average_speech_dbfs = levels.iter().sum::<f64>() / levels.len() as f64;
    let difference_db = masker_dbfs - average_speech_dbfs;

    Ok(LevelComparison {
        masker_dbfs,
        speech_files: levels.len(),
        average_speech_dbfs,
        difference_db,
        recommended_offset_db: -difference_db,
    })
}
