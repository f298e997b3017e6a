//! RMS, peak, and dBFS measurement.
//!
//! Levels are computed on normalized samples, so the full-scale reference for
//! a [`SignalBuffer`] is `1.0`. [`to_dbfs`] also accepts integer-unit levels
//! together with the depth's full scale (e.g. 32768 for 16-bit).

use crate::buffer::SignalBuffer;

/// Root-mean-square of `samples`, or 0 for an empty slice.
pub fn rms(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f64).sqrt()
}

/// Largest absolute sample value.
pub fn peak(samples: &[f64]) -> f64 {
    samples
        .iter()
        .map(|s| s.abs())
        .fold(0.0_f64, |a, b| a.max(b))
}

/// Converts a linear level to decibels relative to `full_scale`.
///
/// Returns negative infinity for a zero level.
pub fn to_dbfs(level: f64, full_scale: f64) -> f64 {
    if level <= 0.0 {
        f64::NEG_INFINITY
    } else {
        20.0 * (level / full_scale).log10()
    }
}

/// Converts decibels relative to `full_scale` back to a linear level.
pub fn from_dbfs(db: f64, full_scale: f64) -> f64 {
    full_scale * 10.0_f64.powf(db / 20.0)
}

/// Scales `samples` so the peak equals `fraction` of full scale.
///
/// All-zero input is left untouched.
pub fn normalize_peak(samples: &mut [f64], fraction: f64) {
    let current_peak = peak(samples);
    if current_peak > 0.0 {
        let gain = fraction / current_peak;
        for sample in samples.iter_mut() {
            *sample *= gain;
        }
    }
}

/// Level summary of a buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelMeasurement {
    /// Linear RMS (normalized units).
    pub rms: f64,
    /// RMS in dBFS.
    pub rms_dbfs: f64,
    /// Linear peak (normalized units).
    pub peak: f64,
    /// Peak in dBFS.
    pub peak_dbfs: f64,
    /// Duration in seconds.
    pub duration_seconds: f64,
}

/// Measures buffers against a fixed full-scale reference.
#[derive(Debug, Clone, Copy)]
pub struct LevelMeter {
    full_scale: f64,
}

impl Default for LevelMeter {
    fn default() -> Self {
        Self::normalized()
    }
}

impl LevelMeter {
    /// Meter for normalized samples (full scale 1.0).
    pub fn normalized() -> Self {
        Self { full_scale: 1.0 }
    }

    /// Meter with an explicit full-scale reference.
    pub fn with_full_scale(full_scale: f64) -> Self {
        Self { full_scale }
    }

    /// Full-scale reference in use.
    pub fn full_scale(&self) -> f64 {
        self.full_scale
    }

    /// RMS in dBFS for raw samples.
    pub fn rms_dbfs(&self, samples: &[f64]) -> f64 {
        to_dbfs(rms(samples), self.full_scale)
    }

    /// Measures a buffer.
    pub fn measure(&self, buffer: &SignalBuffer) -> LevelMeasurement {
        let rms = rms(&buffer.samples);
        let peak = peak(&buffer.samples);
        LevelMeasurement {
            rms,
            rms_dbfs: to_dbfs(rms, self.full_scale),
            peak,
            peak_dbfs: to_dbfs(peak, self.full_scale),
            duration_seconds: buffer.duration_seconds(),
        }
    }
}
