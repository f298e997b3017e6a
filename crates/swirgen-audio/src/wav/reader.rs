//! WAV file loading.

use std::path::Path;

use crate::buffer::SignalBuffer;
use crate::error::{AudioError, AudioResult};

use super::format::PcmDepth;

/// Loads a WAV file as a normalized mono buffer.
///
/// Multi-channel files are reduced to their first channel; channels are not
/// mixed down.
///
/// # Errors
/// - `Io` if the file cannot be opened or read
/// - `UnsupportedFormat` for float samples or bit depths other than 8, 16, 32
/// - `Wav` if the container is malformed
pub fn load(path: &Path) -> AudioResult<SignalBuffer> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    if spec.sample_format != hound::SampleFormat::Int {
        return Err(AudioError::unsupported(format!(
            "'{}': only integer PCM is supported, got {:?}",
            path.display(),
            spec.sample_format
        )));
    }

    let depth = PcmDepth::from_bits(spec.bits_per_sample).ok_or_else(|| {
        AudioError::unsupported(format!(
            "'{}': {}-bit samples (supported: 8, 16, 32)",
            path.display(),
            spec.bits_per_sample
        ))
    })?;

    if spec.channels == 0 {
        return Err(AudioError::unsupported(format!(
            "'{}': zero channels",
            path.display()
        )));
    }

    let channels = spec.channels as usize;
    let scale = depth.full_scale();
    let samples = match depth {
        PcmDepth::Pcm8 => first_channel(reader.samples::<i8>(), channels, scale)?,
        PcmDepth::Pcm16 => first_channel(reader.samples::<i16>(), channels, scale)?,
        PcmDepth::Pcm32 => first_channel(reader.samples::<i32>(), channels, scale)?,
    };

    Ok(SignalBuffer {
        samples,
        sample_rate: spec.sample_rate,
        depth,
    })
}

fn first_channel<T, I>(samples: I, channels: usize, scale: f64) -> AudioResult<Vec<f64>>
where
    T: Into<i32>,
    I: Iterator<Item = hound::Result<T>>,
{
    samples
        .step_by(channels)
        .map(|s| {
            let value: i32 = s?.into();
            Ok(value as f64 / scale)
        })
        .collect()
}
