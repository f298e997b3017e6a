//! Averaged periodogram (Welch) power spectral density estimate.

use std::f64::consts::PI;

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::error::{AudioError, AudioResult};

/// One-sided power spectral density.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerSpectrum {
    /// Bin centre frequencies in Hz, from 0 up to (at most) Nyquist.
    pub frequencies: Vec<f64>,
    /// Power per Hz for each bin.
    pub density: Vec<f64>,
}

impl PowerSpectrum {
    /// Number of bins.
    pub fn len(&self) -> usize {
        self.density.len()
    }

    /// Whether the spectrum has no bins.
    pub fn is_empty(&self) -> bool {
        self.density.is_empty()
    }

    /// Density of each bin in decibels, floored at `floor_db`.
    pub fn density_db(&self, floor_db: f64) -> Vec<f64> {
        self.density
            .iter()
            .map(|&p| {
                if p > 0.0 {
                    (10.0 * p.log10()).max(floor_db)
                } else {
                    floor_db
                }
            })
            .collect()
    }
}

/// Periodic Hann window of length `n`.
pub fn hann_window(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f64 / n as f64).cos())
        .collect()
}

/// Estimates the power spectral density of `signal` with Welch's method.
///
/// Segments of `segment_length` samples overlap by half, are mean-removed,
/// Hann-windowed, and their periodograms averaged. Density scaling is
/// `1 / (fs * sum(w^2))`; every bin except DC (and Nyquist for an even
/// length) is doubled to fold in negative frequencies. A signal shorter than
/// `segment_length` is analyzed as a single segment of its own length.
///
/// # Errors
/// `InvalidParameter` for a zero segment length or sample rate,
/// `DegenerateSpectrum` for an empty signal.
pub fn welch(
    signal: &[f64],
    sample_rate: u32,
    segment_length: usize,
) -> AudioResult<PowerSpectrum> {
    if segment_length == 0 {
        return Err(AudioError::invalid_param(
            "segment_length",
            "must be greater than 0",
        ));
    }
    if sample_rate == 0 {
        return Err(AudioError::invalid_param(
            "sample_rate",
            "must be greater than 0",
        ));
    }
    if signal.is_empty() {
        return Err(AudioError::degenerate(
            "cannot estimate spectrum of an empty signal",
        ));
    }

    let nperseg = segment_length.min(signal.len());
    let step = nperseg - nperseg / 2;
    let num_segments = (signal.len() - nperseg) / step + 1;
    let num_bins = nperseg / 2 + 1;

    let window = hann_window(nperseg);
    let window_power: f64 = window.iter().map(|w| w * w).sum();
    let scale = 1.0 / (sample_rate as f64 * window_power);

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(nperseg);

    let mut density = vec![0.0; num_bins];
    let mut frame = vec![Complex::new(0.0, 0.0); nperseg];

    for segment in 0..num_segments {
        let start = segment * step;
        let chunk = &signal[start..start + nperseg];
        let mean = chunk.iter().sum::<f64>() / nperseg as f64;

        for ((slot, &x), &w) in frame.iter_mut().zip(chunk).zip(&window) {
            *slot = Complex::new((x - mean) * w, 0.0);
        }
        fft.process(&mut frame);

        for (bin, value) in density.iter_mut().zip(&frame) {
            *bin += value.norm_sqr();
        }
    }

    let last_doubled = if nperseg % 2 == 0 {
        num_bins - 1
    } else {
        num_bins
    };
    for (k, bin) in density.iter_mut().enumerate() {
        *bin *= scale / num_segments as f64;
        if k > 0 && k < last_doubled {
            *bin *= 2.0;
        }
    }

    let frequencies = (0..num_bins)
        .map(|k| k as f64 * sample_rate as f64 / nperseg as f64)
        .collect();

    Ok(PowerSpectrum {
        frequencies,
        density,
    })
}
