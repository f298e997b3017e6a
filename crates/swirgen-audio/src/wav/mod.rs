//! WAV codec boundary.
//!
//! Reading goes through `hound` and accepts 8/16/32-bit integer PCM. Writing
//! uses a small deterministic RIFF writer with no timestamps or optional
//! chunks, so identical samples always produce identical files.

mod format;
mod reader;
mod result;
mod writer;


pub use format::{PcmDepth, WavFormat};
pub use reader::load;
pub use result::WavResult;
pub use writer::{quantize, samples_to_pcm, write_file, write_wav, write_wav_to_vec};
