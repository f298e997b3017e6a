//! Linear-phase FIR design by frequency sampling, and FIR filtering.

use std::f64::consts::PI;

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use super::SpectralEnvelope;
use crate::error::{AudioError, AudioResult};

/// Symmetric Hamming window of length `n`.
pub fn hamming_window(n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![1.0];
    }
    (0..n)
        .map(|i| 0.54 - 0.46 * (2.0 * PI * i as f64 / (n - 1) as f64).cos())
        .collect()
}

/// An odd-length, symmetric (linear-phase) FIR filter.
#[derive(Debug, Clone, PartialEq)]
pub struct FirFilter {
    taps: Vec<f64>,
}

impl FirFilter {
    /// Designs a filter whose magnitude response follows `envelope`.
    ///
    /// The envelope is linearly interpolated onto `1 + 2^ceil(log2(num_taps))`
    /// evenly spaced frequencies between 0 and Nyquist (holding its last value
    /// up to Nyquist), given a linear-phase delay of `(num_taps - 1) / 2`
    /// samples, inverse transformed, truncated to `num_taps` and shaped with
    /// a Hamming window.
    ///
    /// # Errors
    /// `InvalidParameter` for an even or too small tap count, or a zero sample
    /// rate. `DegenerateSpectrum` when the envelope is empty, all zero, or not
    /// finite.
    pub fn design(
        num_taps: usize,
        envelope: &SpectralEnvelope,
        sample_rate: u32,
    ) -> AudioResult<Self> {
        if num_taps < 3 || num_taps % 2 == 0 {
            return Err(AudioError::invalid_param(
                "num_taps",
                format!("must be odd and at least 3, got {}", num_taps),
            ));
        }
        if sample_rate == 0 {
            return Err(AudioError::invalid_param(
                "sample_rate",
                "must be greater than 0",
            ));
        }
        if envelope.is_empty() || envelope.frequencies.len() != envelope.magnitudes.len() {
            return Err(AudioError::degenerate("spectral envelope has no bins"));
        }
        if envelope.magnitudes.iter().any(|m| !m.is_finite()) {
            return Err(AudioError::degenerate("spectral envelope is not finite"));
        }
        if envelope.magnitudes.iter().all(|&m| m <= 0.0) {
            return Err(AudioError::degenerate("spectral envelope is all zero"));
        }

        let nyquist = sample_rate as f64 / 2.0;
        let mut points: Vec<f64> = envelope.frequencies.iter().map(|f| f / nyquist).collect();
        let mut gains = envelope.magnitudes.clone();
        if let (Some(&last_x), Some(&last_g)) = (points.last(), gains.last()) {
            if last_x < 1.0 {
                points.push(1.0);
                gains.push(last_g);
            }
        }

        let num_freqs = 1 + num_taps.next_power_of_two();
        let fft_len = 2 * (num_freqs - 1);
        let delay = (num_taps - 1) as f64 / 2.0;

        let mut spectrum = vec![Complex::new(0.0, 0.0); fft_len];
        for (k, bin) in spectrum.iter_mut().take(num_freqs).enumerate() {
            let x = k as f64 / (num_freqs - 1) as f64;
            let gain = interpolate(x, &points, &gains);
            *bin = Complex::from_polar(gain, -PI * x * delay);
        }
        // inverse real transform: DC and Nyquist are real, upper half mirrors
        spectrum[0].im = 0.0;
        spectrum[num_freqs - 1].im = 0.0;
        for k in 1..num_freqs - 1 {
            spectrum[fft_len - k] = spectrum[k].conj();
        }

        let mut planner = FftPlanner::<f64>::new();
        planner.plan_fft_inverse(fft_len).process(&mut spectrum);

        let window = hamming_window(num_taps);
        let taps = spectrum
            .iter()
            .zip(&window)
            .map(|(c, w)| c.re / fft_len as f64 * w)
            .collect();

        Ok(Self { taps })
    }

    /// Wraps existing coefficients.
    pub fn from_taps(taps: Vec<f64>) -> Self {
        Self { taps }
    }

    /// Filter coefficients.
    pub fn taps(&self) -> &[f64] {
        &self.taps
    }

    /// Number of coefficients.
    pub fn len(&self) -> usize {
        self.taps.len()
    }

    /// Whether the filter has no coefficients.
    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    /// Magnitude of the frequency response at `frequency` Hz.
    pub fn magnitude_at(&self, frequency: f64, sample_rate: u32) -> f64 {
        let w = 2.0 * PI * frequency / sample_rate as f64;
        self.taps
            .iter()
            .enumerate()
            .fold(Complex::new(0.0, 0.0), |acc, (k, &b)| {
                acc + Complex::from_polar(b, -w * k as f64)
            })
            .norm()
    }

    /// Causal filtering, `y[n] = sum_k b[k] * x[n - k]`, by FFT overlap-add.
    ///
    /// The output has the same length as the input.
    pub fn apply(&self, input: &[f64]) -> Vec<f64> {
        let n = input.len();
        let m = self.taps.len();
        if n == 0 || m == 0 {
            return vec![0.0; n];
        }

        let fft_size = (2 * m).next_power_of_two();
        let block = fft_size - m + 1;

        let mut planner = FftPlanner::<f64>::new();
        let forward = planner.plan_fft_forward(fft_size);
        let inverse = planner.plan_fft_inverse(fft_size);

        let mut response = vec![Complex::new(0.0, 0.0); fft_size];
        for (slot, &b) in response.iter_mut().zip(&self.taps) {
            *slot = Complex::new(b, 0.0);
        }
        forward.process(&mut response);

        let mut output = vec![0.0; n];
        let mut frame = vec![Complex::new(0.0, 0.0); fft_size];
        let norm = 1.0 / fft_size as f64;

        for start in (0..n).step_by(block) {
            let end = (start + block).min(n);
            frame.fill(Complex::new(0.0, 0.0));
            for (slot, &x) in frame.iter_mut().zip(&input[start..end]) {
                *slot = Complex::new(x, 0.0);
            }

            forward.process(&mut frame);
            for (slot, h) in frame.iter_mut().zip(&response) {
                *slot *= h;
            }
            inverse.process(&mut frame);

            for (out, value) in output[start..].iter_mut().zip(&frame) {
                *out += value.re * norm;
            }
        }

        output
    }

    /// Direct-form filtering with the same semantics as [`FirFilter::apply`].
    pub fn apply_direct(&self, input: &[f64]) -> Vec<f64> {
        (0..input.len())
            .map(|n| {
                self.taps
                    .iter()
                    .take(n + 1)
                    .enumerate()
                    .map(|(k, &b)| b * input[n - k])
                    .sum()
            })
            .collect()
    }
}

/// Piecewise-linear interpolation of `(xs, ys)` at `x`, clamped at both ends.
///
/// `xs` must be non-decreasing.
fn interpolate(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    let upper = xs.partition_point(|&p| p <= x);
    if upper == 0 {
        return ys[0];
    }
    if upper == xs.len() {
        return ys[xs.len() - 1];
    }
    let (x0, x1) = (xs[upper - 1], xs[upper]);
    let (y0, y1) = (ys[upper - 1], ys[upper]);
    if x1 <= x0 {
        return y1;
    }
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{create_rng, gaussian};

    fn flat(bins: usize, sample_rate: u32) -> SpectralEnvelope {
        let nyquist = sample_rate as f64 / 2.0;
        SpectralEnvelope {
            frequencies: (0..bins)
                .map(|k| k as f64 * nyquist / (bins - 1) as f64)
                .collect(),
            magnitudes: vec![1.0; bins],
        }
    }

    fn lowpass(bins: usize, sample_rate: u32, cutoff: f64) -> SpectralEnvelope {
        let mut env = flat(bins, sample_rate);
        for (f, m) in env.frequencies.iter().zip(env.magnitudes.iter_mut()) {
            if *f > cutoff {
                *m = 0.0;
            }
        }
        env
    }

    #[test]
    fn test_hamming_endpoints() {
        let w = hamming_window(5);
        assert!((w[0] - 0.08).abs() < 1e-12);
        assert!((w[4] - 0.08).abs() < 1e-12);
        assert!((w[2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_interpolate_clamps() {
        let xs = [0.0, 0.5, 1.0];
        let ys = [1.0, 3.0, 2.0];
        assert_eq!(interpolate(0.25, &xs, &ys), 2.0);
        assert_eq!(interpolate(0.75, &xs, &ys), 2.5);
        assert_eq!(interpolate(1.0, &xs, &ys), 2.0);
        assert_eq!(interpolate(-1.0, &xs, &ys), 1.0);
        assert_eq!(interpolate(2.0, &xs, &ys), 2.0);
    }

    #[test]
    fn test_taps_are_odd_and_symmetric() {
        let filter = FirFilter::design(101, &lowpass(257, 16000, 3000.0), 16000).unwrap();
        let taps = filter.taps();
        assert_eq!(taps.len(), 101);
        for i in 0..taps.len() {
            assert!((taps[i] - taps[taps.len() - 1 - i]).abs() < 1e-12, "tap {}", i);
        }
    }

    #[test]
    fn test_flat_envelope_is_centered_impulse() {
        let filter = FirFilter::design(31, &flat(129, 8000), 8000).unwrap();
        let taps = filter.taps();
        assert!((taps[15] - 1.0).abs() < 1e-9);
        for (i, &t) in taps.iter().enumerate() {
            if i != 15 {
                assert!(t.abs() < 1e-9, "tap {} = {}", i, t);
            }
        }
    }

    #[test]
    fn test_lowpass_response_follows_envelope() {
        let fs = 16000;
        let filter = FirFilter::design(257, &lowpass(513, fs, 3000.0), fs).unwrap();
        assert!((filter.magnitude_at(1000.0, fs) - 1.0).abs() < 0.02);
        assert!(filter.magnitude_at(6000.0, fs) < 0.01);
    }

    #[test]
    fn test_short_envelope_extends_to_nyquist() {
        // last bin below Nyquist, as with an odd Welch segment length
        let env = SpectralEnvelope {
            frequencies: vec![0.0, 1000.0, 3500.0],
            magnitudes: vec![1.0, 1.0, 1.0],
        };
        let filter = FirFilter::design(63, &env, 8000).unwrap();
        assert!((filter.magnitude_at(3900.0, 8000) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_even_or_tiny_tap_count_rejected() {
        for taps in [0, 1, 2, 100] {
            let result = FirFilter::design(taps, &flat(17, 8000), 8000);
            assert!(
                matches!(result, Err(AudioError::InvalidParameter { .. })),
                "taps {}",
                taps
            );
        }
    }

    #[test]
    fn test_zero_envelope_is_degenerate() {
        let mut env = flat(17, 8000);
        env.magnitudes.iter_mut().for_each(|m| *m = 0.0);
        assert!(matches!(
            FirFilter::design(31, &env, 8000),
            Err(AudioError::DegenerateSpectrum { .. })
        ));
        assert!(matches!(
            FirFilter::design(31, &SpectralEnvelope::default(), 8000),
            Err(AudioError::DegenerateSpectrum { .. })
        ));
    }

    #[test]
    fn test_overlap_add_matches_direct() {
        let filter = FirFilter::design(31, &lowpass(65, 8000, 1500.0), 8000).unwrap();
        let mut rng = create_rng(17);
        let input: Vec<f64> = (0..1000).map(|_| gaussian(&mut rng)).collect();

        let fast = filter.apply(&input);
        let direct = filter.apply_direct(&input);
        assert_eq!(fast.len(), input.len());
        for (a, b) in fast.iter().zip(&direct) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_apply_impulse_returns_taps() {
        let filter = FirFilter::from_taps(vec![0.25, 0.5, 0.25]);
        let out = filter.apply(&[1.0, 0.0, 0.0, 0.0, 0.0]);
        let expected = [0.25, 0.5, 0.25, 0.0, 0.0];
        for (a, b) in out.iter().zip(&expected) {
            assert!((a - b).abs() < 1e-12);
        }
        // truncated to input length
        assert_eq!(filter.apply(&[1.0, 1.0]).len(), 2);
        assert!(filter.apply(&[]).is_empty());
    }
}
