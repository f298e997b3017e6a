//! PCM depth and WAV header parameters.

/// Integer PCM storage depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PcmDepth {
    /// 8-bit unsigned (stored with a 128 offset).
    Pcm8,
    /// 16-bit signed.
    Pcm16,
    /// 32-bit signed.
    Pcm32,
}

impl PcmDepth {
    /// Maps a bits-per-sample value to a supported depth.
    pub fn from_bits(bits: u16) -> Option<Self> {
        match bits {
            8 => Some(PcmDepth::Pcm8),
            16 => Some(PcmDepth::Pcm16),
            32 => Some(PcmDepth::Pcm32),
            _ => None,
        }
    }

    /// Bits per sample.
    pub fn bits(&self) -> u16 {
        match self {
            PcmDepth::Pcm8 => 8,
            PcmDepth::Pcm16 => 16,
            PcmDepth::Pcm32 => 32,
        }
    }

    /// Largest negative magnitude, `2^(bits-1)`.
    pub fn full_scale(&self) -> f64 {
        match self {
            PcmDepth::Pcm8 => 128.0,
            PcmDepth::Pcm16 => 32768.0,
            PcmDepth::Pcm32 => 2147483648.0,
        }
    }

    /// Representable integer range as `(min, max)`.
    pub fn limits(&self) -> (f64, f64) {
        let full = self.full_scale();
        (-full, full - 1.0)
    }
}

/// WAV header parameters for a mono file.
#[derive(Debug, Clone, Copy)]
pub struct WavFormat {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Storage depth.
    pub depth: PcmDepth,
}

impl WavFormat {
    /// Creates a mono format.
    pub fn mono(sample_rate: u32, depth: PcmDepth) -> Self {
        Self { sample_rate, depth }
    }

    /// Channel count (always 1).
    pub fn channels(&self) -> u16 {
        1
    }

    /// Bytes per sample frame.
    pub(crate) fn block_align(&self) -> u16 {
        self.channels() * self.depth.bits() / 8
    }

    /// Bytes per second.
    pub(crate) fn byte_rate(&self) -> u32 {
        self.sample_rate * self.block_align() as u32
    }
}
