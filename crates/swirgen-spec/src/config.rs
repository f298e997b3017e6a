//! Project configuration types.
//!
//! A project is described by a single JSON document (conventionally
//! `swirgen.json`). Every section has defaults matching the reference
//! stimulus set, so an empty object `{}` is a valid configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::validation::validate_config;

/// Full scale of a 16-bit signed sample, used to express the clip ceiling.
pub const PCM16_FULL_SCALE: f64 = 32768.0;

/// Half-open range of seconds `[min, max)` sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecondsRange {
    /// Inclusive lower bound.
    pub min: f64,
    /// Exclusive upper bound.
    pub max: f64,
}

impl SecondsRange {
    /// Creates a new range.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// A folder of corpus clips plus the file-name pattern that selects them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorpusSource {
    /// Directory, relative to the project root unless absolute.
    pub dir: PathBuf,
    /// Glob pattern matched against file names inside `dir`.
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

impl CorpusSource {
    /// Creates a source using the default `swir_*.wav` pattern.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            pattern: default_pattern(),
        }
    }

    /// Overrides the file-name pattern.
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }
}

/// Calibration tone parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalibrationParams {
    /// Output file for the tone.
    pub output: PathBuf,
    /// Tone frequency in Hz.
    pub frequency_hz: f64,
    /// Peak level of the sine in dBFS.
    pub level_dbfs: f64,
    /// Duration in seconds.
    pub duration_seconds: f64,
}

impl Default for CalibrationParams {
    fn default() -> Self {
        Self {
            output: PathBuf::from("calibration_1khz_neg20db.wav"),
            frequency_hz: 1000.0,
            level_dbfs: -20.0,
            duration_seconds: 60.0,
        }
    }
}

/// Babble masker parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BabbleParams {
    /// Folders the talker clips are drawn from.
    pub sources: Vec<CorpusSource>,
    /// Output file for the masker.
    pub output: PathBuf,
    /// Masker duration in seconds.
    pub duration_seconds: f64,
    /// Number of simultaneous talkers.
    pub voices: usize,
    /// Initial per-voice offset.
    pub start_delay: SecondsRange,
    /// Pause inserted after each sentence.
    pub gap: SecondsRange,
    /// Peak level of the mix as a fraction of full scale.
    pub peak_fraction: f64,
}

impl Default for BabbleParams {
    fn default() -> Self {
        Self {
            sources: vec![CorpusSource::new("Form C/wav")],
            output: PathBuf::from("babble_noise.wav"),
            duration_seconds: 300.0,
            voices: 4,
            start_delay: SecondsRange::new(0.0, 2.0),
            gap: SecondsRange::new(0.1, 0.4),
            peak_fraction: 0.9,
        }
    }
}

/// Speech-shaped noise parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NoiseParams {
    /// Folders whose long-term spectrum is matched.
    pub sources: Vec<CorpusSource>,
    /// Output file for the masker.
    pub output: PathBuf,
    /// Masker duration in seconds.
    pub duration_seconds: f64,
    /// Welch segment length in samples.
    pub segment_length: usize,
    /// FIR filter length (odd).
    pub num_taps: usize,
    /// Peak level of the noise as a fraction of full scale.
    pub peak_fraction: f64,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            sources: vec![CorpusSource::new("Form A/wav")],
            output: PathBuf::from("speech_shaped_noise.wav"),
            duration_seconds: 300.0,
            segment_length: 4096,
            num_taps: 1001,
            peak_fraction: 0.9,
        }
    }
}

/// Normalization pass parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizeParams {
    /// Sentence folders to normalize.
    pub targets: Vec<CorpusSource>,
    /// Also normalize the babble and noise maskers.
    pub include_maskers: bool,
    /// Maximum allowed absolute sample value, in 16-bit counts.
    pub clip_ceiling: i32,
}

impl NormalizeParams {
    /// Returns the clip ceiling as a fraction of full scale.
    pub fn ceiling_fraction(&self) -> f64 {
        self.clip_ceiling as f64 / PCM16_FULL_SCALE
    }
}

impl Default for NormalizeParams {
    fn default() -> Self {
        Self {
            targets: ["Form A/wav", "Form B/wav", "Form C/wav", "Form P/wav"]
                .into_iter()
                .map(CorpusSource::new)
                .collect(),
            include_maskers: true,
            clip_ceiling: 32700,
        }
    }
}

/// Level verification parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerifyParams {
    /// Allowed deviation from the reference level in dB.
    pub tolerance_db: f64,
}

impl Default for VerifyParams {
    fn default() -> Self {
        Self { tolerance_db: 0.1 }
    }
}

/// Complete project configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Root folder all relative paths resolve against.
    pub root: PathBuf,
    /// Base seed; per-stage seeds are derived from it.
    pub seed: u32,
    /// Sample rate of generated tones. Maskers inherit the corpus rate.
    pub sample_rate: u32,
    /// Calibration tone section.
    pub calibration: CalibrationParams,
    /// Babble masker section.
    pub babble: BabbleParams,
    /// Speech-shaped noise section.
    pub noise: NoiseParams,
    /// Normalization section.
    pub normalize: NormalizeParams,
    /// Verification section.
    pub verify: VerifyParams,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("audio_output"),
            seed: 42,
            sample_rate: 44100,
            calibration: CalibrationParams::default(),
            babble: BabbleParams::default(),
            noise: NoiseParams::default(),
            normalize: NormalizeParams::default(),
            verify: VerifyParams::default(),
        }
    }
}

impl ProjectConfig {
    /// Parses a config from JSON without validating it.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the config to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Reads, parses, and validates a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        validate_config(&config).map_err(ConfigError::ValidationFailed)?;
        Ok(config)
    }

    /// Resolves a path against the project root.
    ///
    /// Absolute paths are returned unchanged.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Resolves a corpus source directory against the project root.
    pub fn resolve_source(&self, source: &CorpusSource) -> CorpusSource {
        CorpusSource {
            dir: self.resolve(&source.dir),
            pattern: source.pattern.clone(),
        }
    }
}

fn default_pattern() -> String {
    "swir_*.wav".to_string()
}
