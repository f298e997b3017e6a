//! Configuration validation.
//!
//! Validation collects every problem instead of stopping at the first one so
//! the CLI can report them all in a single pass.

use std::path::Path;

use crate::config::{
    BabbleParams, CalibrationParams, CorpusSource, NoiseParams, NormalizeParams, ProjectConfig,
    SecondsRange, VerifyParams,
};
use crate::error::{ErrorCode, ValidationError};

/// Sample rates accepted for generated material.
pub const ALLOWED_SAMPLE_RATES: &[u32] = &[16000, 22050, 32000, 44100, 48000, 96000];

/// Upper bound on babble talkers.
pub const MAX_VOICES: usize = 64;

/// Smallest useful FIR filter length.
pub const MIN_TAPS: usize = 3;

/// Smallest useful Welch segment.
pub const MIN_SEGMENT_LENGTH: usize = 16;

/// Validates a full project configuration.
///
/// # Returns
/// * `Ok(())` when every section is valid
/// * `Err(errors)` listing every problem found
pub fn validate_config(config: &ProjectConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !ALLOWED_SAMPLE_RATES.contains(&config.sample_rate) {
        errors.push(ValidationError::with_path(
            ErrorCode::InvalidSampleRate,
            format!(
                "sample rate {} is not one of {:?}",
                config.sample_rate, ALLOWED_SAMPLE_RATES
            ),
            "sample_rate",
        ));
    }

    validate_calibration(&config.calibration, config.sample_rate, &mut errors);
    validate_babble(&config.babble, &mut errors);
    validate_noise(&config.noise, &mut errors);
    validate_normalize(&config.normalize, &mut errors);
    validate_verify(&config.verify, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_calibration(
    params: &CalibrationParams,
    sample_rate: u32,
    errors: &mut Vec<ValidationError>,
) {
    check_output(&params.output, "calibration.output", errors);
    check_duration(params.duration_seconds, "calibration.duration_seconds", errors);

    let nyquist = sample_rate as f64 / 2.0;
    if !(params.frequency_hz > 0.0 && params.frequency_hz < nyquist) {
        errors.push(ValidationError::with_path(
            ErrorCode::InvalidTone,
            format!(
                "tone frequency must be in (0, {}) Hz, got {}",
                nyquist, params.frequency_hz
            ),
            "calibration.frequency_hz",
        ));
    }
    if !(params.level_dbfs.is_finite() && params.level_dbfs <= 0.0) {
        errors.push(ValidationError::with_path(
            ErrorCode::InvalidTone,
            format!("tone level must be at most 0 dBFS, got {}", params.level_dbfs),
            "calibration.level_dbfs",
        ));
    }
}

fn validate_babble(params: &BabbleParams, errors: &mut Vec<ValidationError>) {
    check_sources(&params.sources, "babble.sources", errors);
    check_output(&params.output, "babble.output", errors);
    check_duration(params.duration_seconds, "babble.duration_seconds", errors);

    if params.voices == 0 || params.voices > MAX_VOICES {
        errors.push(ValidationError::with_path(
            ErrorCode::InvalidVoiceCount,
            format!("voices must be in 1..={}, got {}", MAX_VOICES, params.voices),
            "babble.voices",
        ));
    }

    check_range(&params.start_delay, "babble.start_delay", errors);
    check_range(&params.gap, "babble.gap", errors);
    check_peak_fraction(params.peak_fraction, "babble.peak_fraction", errors);
}

fn validate_noise(params: &NoiseParams, errors: &mut Vec<ValidationError>) {
    check_sources(&params.sources, "noise.sources", errors);
    check_output(&params.output, "noise.output", errors);
    check_duration(params.duration_seconds, "noise.duration_seconds", errors);

    if params.num_taps < MIN_TAPS || params.num_taps % 2 == 0 {
        errors.push(ValidationError::with_path(
            ErrorCode::InvalidTapCount,
            format!(
                "num_taps must be odd and at least {}, got {}",
                MIN_TAPS, params.num_taps
            ),
            "noise.num_taps",
        ));
    }

    if params.segment_length < MIN_SEGMENT_LENGTH {
        errors.push(ValidationError::with_path(
            ErrorCode::InvalidSegmentLength,
            format!(
                "segment_length must be at least {}, got {}",
                MIN_SEGMENT_LENGTH, params.segment_length
            ),
            "noise.segment_length",
        ));
    }

    check_peak_fraction(params.peak_fraction, "noise.peak_fraction", errors);
}

fn validate_normalize(params: &NormalizeParams, errors: &mut Vec<ValidationError>) {
    if params.targets.is_empty() && !params.include_maskers {
        errors.push(ValidationError::with_path(
            ErrorCode::NoSources,
            "normalization has no targets and maskers are excluded",
            "normalize.targets",
        ));
    }

    if params.clip_ceiling <= 0 || params.clip_ceiling > i16::MAX as i32 {
        errors.push(ValidationError::with_path(
            ErrorCode::InvalidClipCeiling,
            format!(
                "clip_ceiling must be in 1..={}, got {}",
                i16::MAX,
                params.clip_ceiling
            ),
            "normalize.clip_ceiling",
        ));
    }
}

fn validate_verify(params: &VerifyParams, errors: &mut Vec<ValidationError>) {
    if !(params.tolerance_db.is_finite() && params.tolerance_db > 0.0) {
        errors.push(ValidationError::with_path(
            ErrorCode::InvalidTolerance,
            format!("tolerance_db must be positive, got {}", params.tolerance_db),
            "verify.tolerance_db",
        ));
    }
}

fn check_output(path: &Path, field: &str, errors: &mut Vec<ValidationError>) {
    if path.as_os_str().is_empty() {
        errors.push(ValidationError::with_path(
            ErrorCode::EmptyPath,
            "output path must not be empty",
            field,
        ));
    }
}

fn check_sources(sources: &[CorpusSource], field: &str, errors: &mut Vec<ValidationError>) {
    if sources.is_empty() {
        errors.push(ValidationError::with_path(
            ErrorCode::NoSources,
            "at least one corpus source is required",
            field,
        ));
    }
}

fn check_duration(seconds: f64, field: &str, errors: &mut Vec<ValidationError>) {
    if !(seconds.is_finite() && seconds > 0.0) {
        errors.push(ValidationError::with_path(
            ErrorCode::InvalidDuration,
            format!("duration must be a positive number of seconds, got {}", seconds),
            field,
        ));
    }
}

fn check_range(range: &SecondsRange, field: &str, errors: &mut Vec<ValidationError>) {
    let finite = range.min.is_finite() && range.max.is_finite();
    if !finite || range.min < 0.0 || range.max < range.min {
        errors.push(ValidationError::with_path(
            ErrorCode::InvalidRange,
            format!(
                "range must satisfy 0 <= min <= max, got [{}, {})",
                range.min, range.max
            ),
            field,
        ));
    }
}

fn check_peak_fraction(fraction: f64, field: &str, errors: &mut Vec<ValidationError>) {
    if !(fraction > 0.0 && fraction <= 1.0) {
        errors.push(ValidationError::with_path(
            ErrorCode::InvalidPeakFraction,
            format!("peak fraction must be in (0, 1], got {}", fraction),
            field,
        ));
    }
}
