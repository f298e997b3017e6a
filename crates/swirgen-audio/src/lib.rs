//! swirgen audio core
//!
//! Builds the acoustic stimuli of a speech-in-noise test from a corpus of
//! recorded sentences and a calibration tone:
//!
//! - **Babble masker** - N talkers laid out on independent random timelines
//! - **Speech-shaped noise** - white noise filtered to the corpus spectrum
//! - **Calibration** - every file scaled to the tone's RMS without clipping
//!
//! # Determinism
//!
//! Every random draw comes from an injected generator. The pipeline uses PCG32
//! seeded per stage via BLAKE3, so a project seed reproduces the maskers
//! sample for sample, and the WAV writer emits identical bytes for identical
//! samples.
//!
//! # Example
//!
//! ```no_run
//! use swirgen_audio::{BabbleSynthesizer, ClipCorpus, rng::create_component_rng, wav};
//! use swirgen_spec::BabbleParams;
//!
//! # fn main() -> Result<(), swirgen_audio::AudioError> {
//! let params = BabbleParams::default();
//! let corpus = ClipCorpus::load(&params.sources)?;
//! let mut rng = create_component_rng(42, "babble");
//! let babble = BabbleSynthesizer::new(params.clone()).synthesize(&corpus, &mut rng)?;
//! let written = wav::write_file(&params.output, &babble)?;
//! println!("PCM hash: {}", written.pcm_hash);
//! # Ok(())
//! # }
//! ```
//!
//! # Crate Structure
//!
//! - [`buffer`] - Mono sample buffer
//! - [`level`] - RMS, peak and dBFS
//! - [`wav`] - WAV reader and deterministic writer
//! - [`rng`] - Deterministic RNG with seed derivation
//! - [`corpus`] - Clip discovery and loading
//! - [`babble`] - Babble masker
//! - [`spectral`] - Welch PSD, FIR design, speech-shaped noise
//! - [`gain`] - Calibrated gain with clip protection
//! - [`tone`] - Calibration tone
//! - [`verify`] - Level verification reports

pub mod babble;
pub mod buffer;
pub mod corpus;
pub mod error;
pub mod gain;
pub mod level;
pub mod rng;
pub mod spectral;
pub mod tone;
pub mod verify;
pub mod wav;

pub use babble::BabbleSynthesizer;
pub use buffer::SignalBuffer;
pub use corpus::ClipCorpus;
pub use error::{AudioError, AudioResult};
pub use gain::{CalibrationReference, GainEngine, GainOutcome};
pub use level::{LevelMeasurement, LevelMeter};
pub use spectral::{FirFilter, NoiseSynthesizer, SpectralEnvelope};
pub use wav::WavResult;
