//! Calibration tone generation.

use std::f64::consts::PI;

use swirgen_spec::CalibrationParams;

use crate::buffer::SignalBuffer;
use crate::error::{AudioError, AudioResult};
use crate::level::from_dbfs;

/// Generates the 16-bit calibration sine described by `params`.
///
/// The sine's peak sits at `level_dbfs`, so its RMS is 3.01 dB lower.
///
/// # Errors
/// `InvalidParameter` for a frequency outside (0, Nyquist), a positive level,
/// or a negative duration.
pub fn calibration_tone(
    params: &CalibrationParams,
    sample_rate: u32,
) -> AudioResult<SignalBuffer> {
    let nyquist = sample_rate as f64 / 2.0;
    if !(params.frequency_hz > 0.0 && params.frequency_hz < nyquist) {
        return Err(AudioError::invalid_param(
            "frequency_hz",
            format!("must be in (0, {}) Hz, got {}", nyquist, params.frequency_hz),
        ));
    }
    if params.level_dbfs.is_nan() || params.level_dbfs > 0.0 {
        return Err(AudioError::invalid_param("level_dbfs", "must not exceed 0 dBFS"));
    }
    if params.duration_seconds.is_nan() || params.duration_seconds < 0.0 {
        return Err(AudioError::invalid_param(
            "duration_seconds",
            "must not be negative",
        ));
    }

    let amplitude = from_dbfs(params.level_dbfs, 1.0);
    let total = (params.duration_seconds * sample_rate as f64).round() as usize;
    let step = 2.0 * PI * params.frequency_hz / sample_rate as f64;
    let samples = (0..total).map(|i| amplitude * (step * i as f64).sin()).collect();

    Ok(SignalBuffer::new(samples, sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{peak, rms};
    use crate::wav;

    #[test]
    fn test_default_tone_levels() {
        let params = CalibrationParams {
            duration_seconds: 1.0,
            ..CalibrationParams::default()
        };
        let tone = calibration_tone(&params, 44100).unwrap();
        assert_eq!(tone.len(), 44100);
        assert!((rms(&tone.samples) - 0.0707).abs() < 1e-3);

        // survives 16-bit storage
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        wav::write_file(&path, &tone).unwrap();
        let loaded = wav::load(&path).unwrap();
        assert!((peak(&loaded.samples) - 0.1).abs() < 1e-4);
        assert!((rms(&loaded.samples) - 0.1 / 2.0_f64.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn test_rejects_frequency_above_nyquist() {
        let params = CalibrationParams {
            frequency_hz: 9000.0,
            ..CalibrationParams::default()
        };
        assert!(matches!(
            calibration_tone(&params, 16000),
            Err(AudioError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_rejects_positive_level() {
        let params = CalibrationParams {
            level_dbfs: 3.0,
            ..CalibrationParams::default()
        };
        assert!(calibration_tone(&params, 44100).is_err());
    }
}
