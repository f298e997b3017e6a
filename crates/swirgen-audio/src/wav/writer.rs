//! Deterministic WAV writing and PCM quantization.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::buffer::SignalBuffer;
use crate::error::AudioResult;

use super::format::{PcmDepth, WavFormat};
use super::result::WavResult;

/// Writes a complete mono PCM WAV file.
///
/// # Arguments
/// * `writer` - Output writer
/// * `format` - Header parameters
/// * `pcm_data` - Little-endian PCM bytes
pub fn write_wav<W: Write>(writer: &mut W, format: &WavFormat, pcm_data: &[u8]) -> io::Result<()> {
    let data_size = pcm_data.len() as u32;
    let pad = data_size % 2;
    let file_size = 36 + data_size + pad; // Total file size minus the 8-byte RIFF header

    // RIFF header
    writer.write_all(b"RIFF")?;
    writer.write_all(&file_size.to_le_bytes())?;
    writer.write_all(b"WAVE")?;

    // fmt chunk
    writer.write_all(b"fmt ")?;
    writer.write_all(&16u32.to_le_bytes())?;
    writer.write_all(&1u16.to_le_bytes())?; // PCM
    writer.write_all(&format.channels().to_le_bytes())?;
    writer.write_all(&format.sample_rate.to_le_bytes())?;
    writer.write_all(&format.byte_rate().to_le_bytes())?;
    writer.write_all(&format.block_align().to_le_bytes())?;
    writer.write_all(&format.depth.bits().to_le_bytes())?;

    // data chunk
    writer.write_all(b"data")?;
    writer.write_all(&data_size.to_le_bytes())?;
    writer.write_all(pcm_data)?;
    if pad == 1 {
        // odd-sized 8-bit data is word aligned
        writer.write_all(&[0])?;
    }

    Ok(())
}

/// Writes a WAV file to a byte vector.
pub fn write_wav_to_vec(format: &WavFormat, pcm_data: &[u8]) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(45 + pcm_data.len());
    write_wav(&mut buffer, format, pcm_data).expect("writing to Vec should not fail");
    buffer
}

/// Converts a normalized sample to an integer value at `depth`.
///
/// Rounds to nearest and saturates at the representable range.
#[inline]
pub fn quantize(sample: f64, depth: PcmDepth) -> i64 {
    let (min, max) = depth.limits();
    (sample * depth.full_scale()).round().clamp(min, max) as i64
}

/// Converts normalized samples to little-endian PCM bytes.
pub fn samples_to_pcm(samples: &[f64], depth: PcmDepth) -> Vec<u8> {
    let mut pcm = Vec::with_capacity(samples.len() * (depth.bits() as usize / 8));

    for &sample in samples {
        let value = quantize(sample, depth);
        match depth {
            PcmDepth::Pcm8 => pcm.push((value + 128) as u8),
            PcmDepth::Pcm16 => pcm.extend_from_slice(&(value as i16).to_le_bytes()),
            PcmDepth::Pcm32 => pcm.extend_from_slice(&(value as i32).to_le_bytes()),
        }
    }

    pcm
}

/// Encodes a buffer at its own depth and writes it to `path`.
///
/// Parent directories are created as needed. The file handle is held only for
/// the duration of the write.
pub fn write_file(path: &Path, buffer: &SignalBuffer) -> AudioResult<WavResult> {
    let result = WavResult::from_buffer(buffer);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, &result.wav_data)?;
    Ok(result)
}
