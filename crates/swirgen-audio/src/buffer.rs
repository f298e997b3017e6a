//! In-memory mono PCM signal.

use crate::error::{AudioError, AudioResult};
use crate::wav::PcmDepth;

/// A mono signal with samples normalized to [-1.0, 1.0].
///
/// The bit depth records the integer storage the signal came from (or will be
/// written to), so a loaded file can be written back at its own depth.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalBuffer {
    /// Normalized samples.
    pub samples: Vec<f64>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Integer storage depth.
    pub depth: PcmDepth,
}

impl SignalBuffer {
    /// Creates a 16-bit buffer from normalized samples.
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
            depth: PcmDepth::Pcm16,
        }
    }

    /// Creates a zero-filled buffer of `len` samples.
    pub fn zeros(len: usize, sample_rate: u32) -> Self {
        Self::new(vec![0.0; len], sample_rate)
    }

    /// Overrides the storage depth.
    pub fn with_depth(mut self, depth: PcmDepth) -> Self {
        self.depth = depth;
        self
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Largest representable magnitude in integer units (32768 for 16-bit).
    pub fn full_scale(&self) -> f64 {
        self.depth.full_scale()
    }

    /// Fails with `RateMismatch` unless `other` has the same sample rate.
    pub fn ensure_same_rate(&self, other: &SignalBuffer) -> AudioResult<()> {
        if self.sample_rate != other.sample_rate {
            return Err(AudioError::RateMismatch {
                expected: self.sample_rate,
                found: other.sample_rate,
            });
        }
        Ok(())
    }

    /// Adds `other` sample-wise into this buffer.
    ///
    /// Samples of `other` past the end of this buffer are ignored.
    pub fn mix(&mut self, other: &SignalBuffer) -> AudioResult<()> {
        self.ensure_same_rate(other)?;
        for (dst, src) in self.samples.iter_mut().zip(&other.samples) {
            *dst += *src;
        }
        Ok(())
    }

    /// Multiplies every sample by `gain`.
    pub fn apply_gain(&mut self, gain: f64) {
        for sample in self.samples.iter_mut() {
            *sample *= gain;
        }
    }

    /// Concatenates buffers end to end.
    ///
    /// The first buffer fixes the sample rate and depth; an empty slice yields
    /// `EmptyCorpus`.
    pub fn concat<'a, I>(buffers: I) -> AudioResult<SignalBuffer>
    where
        I: IntoIterator<Item = &'a SignalBuffer>,
    {
        let mut iter = buffers.into_iter();
        let first = iter.next().ok_or(AudioError::EmptyCorpus)?;
        let mut out = first.clone();
        for buffer in iter {
            out.ensure_same_rate(buffer)?;
            out.samples.extend_from_slice(&buffer.samples);
        }
        Ok(out)
    }
}
