//! Speech-shaped noise synthesis.
//!
//! The long-term spectrum of a corpus is estimated with Welch's method, a
//! linear-phase FIR filter is designed to follow its square root, and white
//! Gaussian noise is passed through that filter. Filtering flat noise through
//! a response `|H|` yields power `|H|^2`, so the output power spectrum tracks
//! the corpus spectrum.

mod fir;
mod welch;

pub use fir::{hamming_window, FirFilter};
pub use welch::{hann_window, welch, PowerSpectrum};

use rand::Rng;
use swirgen_spec::NoiseParams;
use tracing::{debug, info};

use crate::buffer::SignalBuffer;
use crate::corpus::ClipCorpus;
use crate::error::{AudioError, AudioResult};
use crate::level::{normalize_peak, peak};
use crate::rng::gaussian;

/// Magnitude spectrum (square root of a power spectral density).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpectralEnvelope {
    /// Bin frequencies in Hz, ascending.
    pub frequencies: Vec<f64>,
    /// Linear magnitude per bin.
    pub magnitudes: Vec<f64>,
}

impl SpectralEnvelope {
    /// Takes the square root of each density bin.
    pub fn from_power(spectrum: &PowerSpectrum) -> Self {
        Self {
            frequencies: spectrum.frequencies.clone(),
            magnitudes: spectrum.density.iter().map(|p| p.max(0.0).sqrt()).collect(),
        }
    }

    /// Number of bins.
    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    /// Whether the envelope has no bins.
    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }
}

/// Builds noise whose long-term spectrum matches a speech corpus.
#[derive(Debug, Clone)]
pub struct NoiseSynthesizer {
    params: NoiseParams,
}

impl NoiseSynthesizer {
    /// Creates a synthesizer for the given parameters.
    pub fn new(params: NoiseParams) -> Self {
        Self { params }
    }

    /// Parameters in use.
    pub fn params(&self) -> &NoiseParams {
        &self.params
    }

    /// Designs the shaping filter for `corpus`.
    ///
    /// All clips are joined into one reference signal, peak-normalized to
    /// full scale, and analyzed with the configured segment length.
    ///
    /// # Errors
    /// `EmptyCorpus` without clips, `DegenerateSpectrum` when every clip is
    /// silent.
    pub fn design_filter(&self, corpus: &ClipCorpus) -> AudioResult<FirFilter> {
        let sample_rate = corpus.sample_rate().ok_or(AudioError::EmptyCorpus)?;
        let mut reference = SignalBuffer::concat(corpus.clips().iter().map(|c| &c.buffer))?;

        if peak(&reference.samples) == 0.0 {
            return Err(AudioError::degenerate("corpus is silent"));
        }
        normalize_peak(&mut reference.samples, 1.0);

        let psd = welch(&reference.samples, sample_rate, self.params.segment_length)?;
        debug!(
            reference_samples = reference.len(),
            bins = psd.len(),
            "estimated corpus spectrum"
        );

        let envelope = SpectralEnvelope::from_power(&psd);
        FirFilter::design(self.params.num_taps, &envelope, sample_rate)
    }

    /// Filters fresh white noise through `filter` and peak-normalizes it.
    ///
    /// The output holds `round(duration_seconds * sample_rate)` samples.
    pub fn render<R: Rng + ?Sized>(
        &self,
        filter: &FirFilter,
        sample_rate: u32,
        rng: &mut R,
    ) -> AudioResult<SignalBuffer> {
        self.check_output_params()?;

        let total = (self.params.duration_seconds * sample_rate as f64).round() as usize;
        let white: Vec<f64> = (0..total).map(|_| gaussian(rng)).collect();

        let mut samples = filter.apply(&white);
        normalize_peak(&mut samples, self.params.peak_fraction);

        Ok(SignalBuffer::new(samples, sample_rate))
    }

    /// Designs the filter for `corpus` and renders the masker.
    pub fn synthesize<R: Rng + ?Sized>(
        &self,
        corpus: &ClipCorpus,
        rng: &mut R,
    ) -> AudioResult<SignalBuffer> {
        let sample_rate = corpus.sample_rate().ok_or(AudioError::EmptyCorpus)?;
        self.check_output_params()?;

        let filter = self.design_filter(corpus)?;
        let output = self.render(&filter, sample_rate, rng)?;

        info!(
            taps = filter.len(),
            samples = output.len(),
            sample_rate,
            "speech-shaped noise synthesized"
        );
        Ok(output)
    }

    fn check_output_params(&self) -> AudioResult<()> {
        let p = self.params.peak_fraction;
        if p.is_nan() || p <= 0.0 || p > 1.0 {
            return Err(AudioError::invalid_param(
                "peak_fraction",
                format!("must be in (0, 1], got {}", p),
            ));
        }
        let duration = self.params.duration_seconds;
        if duration.is_nan() || duration < 0.0 {
            return Err(AudioError::invalid_param(
                "duration_seconds",
                "must not be negative",
            ));
        }
        Ok(())
    }
}
