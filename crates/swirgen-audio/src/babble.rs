//! Multi-talker babble synthesis.
//!
//! Each voice lays clips end to end on its own timeline, starting after a
//! random delay and separated by random gaps. Voices are summed without
//! weighting and the mix is peak-normalized.

use rand::Rng;
use swirgen_spec::BabbleParams;
use tracing::{debug, info};

use crate::buffer::SignalBuffer;
use crate::corpus::ClipCorpus;
use crate::error::{AudioError, AudioResult};
use crate::level::normalize_peak;
use crate::rng::sample_offset;

/// Builds N-voice babble maskers from a clip corpus.
#[derive(Debug, Clone)]
pub struct BabbleSynthesizer {
    params: BabbleParams,
}

impl BabbleSynthesizer {
    /// Creates a synthesizer for the given parameters.
    pub fn new(params: BabbleParams) -> Self {
        Self { params }
    }

    /// Parameters in use.
    pub fn params(&self) -> &BabbleParams {
        &self.params
    }

    /// Synthesizes the masker at the corpus sample rate.
    ///
    /// The output holds exactly `round(duration_seconds * sample_rate)`
    /// samples whatever the clip lengths.
    ///
    /// # Errors
    /// `EmptyCorpus` when the corpus holds no non-empty clips, `InvalidParameter` for
    /// a zero voice count or a peak fraction outside (0, 1].
    pub fn synthesize<R: Rng + ?Sized>(
        &self,
        corpus: &ClipCorpus,
        rng: &mut R,
    ) -> AudioResult<SignalBuffer> {
        let sample_rate = corpus.sample_rate().ok_or(AudioError::EmptyCorpus)?;
        self.check_params()?;

        let total = (self.params.duration_seconds * sample_rate as f64).round() as usize;
        let mut output = SignalBuffer::zeros(total, sample_rate);

        for voice in 0..self.params.voices {
            let track = self.place_voice(corpus, total, sample_rate, rng)?;
            debug!(voice, clips = track.clips, start = track.start, "voice placed");
            output.mix(&track.buffer)?;
        }

        normalize_peak(&mut output.samples, self.params.peak_fraction);

        info!(
            voices = self.params.voices,
            samples = total,
            sample_rate,
            "babble synthesized"
        );
        Ok(output)
    }

    fn check_params(&self) -> AudioResult<()> {
        if self.params.voices == 0 {
            return Err(AudioError::invalid_param("voices", "must be at least 1"));
        }
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

    fn place_voice<R: Rng + ?Sized>(
        &self,
        corpus: &ClipCorpus,
        total: usize,
        sample_rate: u32,
        rng: &mut R,
    ) -> AudioResult<VoiceTrack> {
        let mut buffer = SignalBuffer::zeros(total, sample_rate);
        let start = sample_offset(rng, &self.params.start_delay, sample_rate);
        let mut cursor = start;
        let mut clips = 0;

        while cursor < total {
            let clip = corpus.choose(rng).ok_or(AudioError::EmptyCorpus)?;
            clips += 1;

            let end = cursor + clip.len();
            if end > total {
                let fit = total - cursor;
                buffer.samples[cursor..].copy_from_slice(&clip.samples[..fit]);
                break;
            }

            buffer.samples[cursor..end].copy_from_slice(&clip.samples);
            cursor = end + sample_offset(rng, &self.params.gap, sample_rate);
        }

        Ok(VoiceTrack {
            buffer,
            start,
            clips,
        })
    }
}

/// One voice's timeline before mixing.
struct VoiceTrack {
    buffer: SignalBuffer,
    start: usize,
    clips: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::peak;
    use crate::rng::create_rng;
    use swirgen_spec::SecondsRange;

    fn ramp(len: usize, amplitude: f64) -> SignalBuffer {
        let samples = (0..len)
            .map(|i| amplitude * ((i % 37) as f64 / 18.0 - 1.0))
            .collect();
        SignalBuffer::new(samples, 8000)
    }

    fn corpus(lengths: &[usize]) -> ClipCorpus {
        ClipCorpus::from_buffers(lengths.iter().map(|&n| ramp(n, 0.4)).collect()).unwrap()
    }

    fn params(duration: f64, voices: usize) -> BabbleParams {
        BabbleParams {
            duration_seconds: duration,
            voices,
            ..BabbleParams::default()
        }
    }

    #[test]
    fn test_length_is_exact_for_any_clip_lengths() {
        let lengths_sets: [&[usize]; 3] = [&[10], &[7999, 8001, 12], &[50_000]];
        for lengths in lengths_sets {
            for voices in [1, 3, 8] {
                let synth = BabbleSynthesizer::new(params(2.5, voices));
                let out = synth.synthesize(&corpus(lengths), &mut create_rng(5)).unwrap();
                assert_eq!(out.len(), 20_000);
                assert_eq!(out.sample_rate, 8000);
            }
        }
    }

    #[test]
    fn test_peak_equals_fraction() {
        let synth = BabbleSynthesizer::new(BabbleParams {
            peak_fraction: 0.7,
            ..params(3.0, 4)
        });
        let out = synth
            .synthesize(&corpus(&[3000, 5000, 1200]), &mut create_rng(11))
            .unwrap();
        let p = peak(&out.samples);
        assert!((p - 0.7).abs() < 1e-12, "peak {}", p);
        assert!(out.samples.iter().all(|s| s.abs() <= 0.7 + 1e-12));
    }

    #[test]
    fn test_deterministic_for_seed() {
        let synth = BabbleSynthesizer::new(params(2.0, 4));
        let c = corpus(&[900, 1500, 2100]);
        let a = synth.synthesize(&c, &mut create_rng(42)).unwrap();
        let b = synth.synthesize(&c, &mut create_rng(42)).unwrap();
        let other = synth.synthesize(&c, &mut create_rng(43)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, other);
    }

    #[test]
    fn test_empty_corpus_fails() {
        let synth = BabbleSynthesizer::new(params(1.0, 4));
        let result = synth.synthesize(&ClipCorpus::default(), &mut create_rng(1));
        assert!(matches!(result, Err(AudioError::EmptyCorpus)));
    }

    #[test]
    fn test_corpus_of_empty_clips_fails() {
        let c = ClipCorpus::from_buffers(vec![SignalBuffer::zeros(0, 8000)]).unwrap();

        let zero_gap = BabbleSynthesizer::new(BabbleParams {
            start_delay: SecondsRange::new(0.0, 0.0),
            gap: SecondsRange::new(0.0, 0.0),
            ..params(1.0, 2)
        });
        let result = zero_gap.synthesize(&c, &mut create_rng(1));
        assert!(matches!(result, Err(AudioError::EmptyCorpus)));

        let default_gap = BabbleSynthesizer::new(params(1.0, 2));
        let result = default_gap.synthesize(&c, &mut create_rng(1));
        assert!(matches!(result, Err(AudioError::EmptyCorpus)));
    }

    #[test]
    fn test_single_voice_places_clips_after_delay() {
        // Fixed delay and gap make the timeline predictable
        let synth = BabbleSynthesizer::new(BabbleParams {
            start_delay: SecondsRange::new(0.1, 0.1),
            gap: SecondsRange::new(0.05, 0.05),
            peak_fraction: 1.0,
            ..params(1.0, 1)
        });
        let c = ClipCorpus::from_buffers(vec![SignalBuffer::new(vec![1.0; 1000], 8000)]).unwrap();
        let out = synth.synthesize(&c, &mut create_rng(3)).unwrap();

        // delay 800, clip 800..1800, gap 400, clip 2200..3200, ...
        assert!(out.samples[..800].iter().all(|&s| s == 0.0));
        assert!(out.samples[800..1800].iter().all(|&s| s == 1.0));
        assert!(out.samples[1800..2200].iter().all(|&s| s == 0.0));
        assert!(out.samples[2200..3200].iter().all(|&s| s == 1.0));
        // the clip starting at 7800 runs past 8000, so only the prefix is kept
        assert!(out.samples[7400..7800].iter().all(|&s| s == 0.0));
        assert!(out.samples[7800..].iter().all(|&s| s == 1.0));
    }

    #[test]
    fn test_duration_shorter_than_delay_is_silent() {
        let synth = BabbleSynthesizer::new(BabbleParams {
            start_delay: SecondsRange::new(2.0, 2.0),
            ..params(1.0, 2)
        });
        let out = synth.synthesize(&corpus(&[400]), &mut create_rng(8)).unwrap();
        assert_eq!(out.len(), 8000);
        assert!(out.samples.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_zero_voices_rejected() {
        let synth = BabbleSynthesizer::new(params(1.0, 0));
        let err = synth.synthesize(&corpus(&[100]), &mut create_rng(1)).unwrap_err();
        assert_eq!(err.code(), "AUDIO_008");
    }
}
