//! Encoded WAV output.

use crate::buffer::SignalBuffer;

use super::format::{PcmDepth, WavFormat};
use super::writer::{samples_to_pcm, write_wav_to_vec};

/// An encoded WAV file plus its content hash.
#[derive(Debug)]
pub struct WavResult {
    /// Complete WAV file bytes.
    pub wav_data: Vec<u8>,
    /// BLAKE3 hash of the PCM data only.
    pub pcm_hash: String,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Storage depth.
    pub depth: PcmDepth,
    /// Number of samples.
    pub num_samples: usize,
}

impl WavResult {
    /// Encodes a buffer at its own depth.
    pub fn from_buffer(buffer: &SignalBuffer) -> Self {
        let pcm = samples_to_pcm(&buffer.samples, buffer.depth);
        let pcm_hash = blake3::hash(&pcm).to_hex().to_string();
        let format = WavFormat::mono(buffer.sample_rate, buffer.depth);
        let wav_data = write_wav_to_vec(&format, &pcm);

        Self {
            wav_data,
            pcm_hash,
            sample_rate: buffer.sample_rate,
            depth: buffer.depth,
            num_samples: buffer.len(),
        }
    }

    /// Returns the duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.num_samples as f64 / self.sample_rate as f64
    }
}
