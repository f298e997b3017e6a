//! Error types for the audio core.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for audio operations.
pub type AudioResult<T> = Result<T, AudioError>;

/// Errors that can occur while loading, synthesizing, or calibrating audio.
#[derive(Debug, Error)]
pub enum AudioError {
    /// File could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The WAV container is malformed.
    #[error("malformed WAV file: {0}")]
    Wav(hound::Error),

    /// Sample format or bit depth is not handled.
    #[error("unsupported format: {message}")]
    UnsupportedFormat {
        /// What was found.
        message: String,
    },

    /// Two buffers that must share a sample rate do not.
    #[error("sample rate mismatch: expected {expected} Hz, found {found} Hz")]
    RateMismatch {
        /// Rate of the buffer being mixed into.
        expected: u32,
        /// Rate of the offending buffer.
        found: u32,
    },

    /// No source clips were found.
    #[error("corpus is empty: no source clips found")]
    EmptyCorpus,

    /// The spectral estimate is all zero, so no filter can be designed.
    #[error("degenerate spectrum: {message}")]
    DegenerateSpectrum {
        /// Why the spectrum is unusable.
        message: String,
    },

    /// The calibration tone has zero energy.
    #[error("calibration reference {} is silent", path.display())]
    SilentReference {
        /// Path of the tone file.
        path: PathBuf,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },
}

impl AudioError {
    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates an unsupported format error.
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            message: message.into(),
        }
    }

    /// Creates a degenerate spectrum error.
    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::DegenerateSpectrum {
            message: message.into(),
        }
    }

    /// Returns a stable code for reports.
    pub fn code(&self) -> &'static str {
        match self {
            AudioError::Io(_) => "AUDIO_001",
            AudioError::Wav(_) => "AUDIO_002",
            AudioError::UnsupportedFormat { .. } => "AUDIO_003",
            AudioError::RateMismatch { .. } => "AUDIO_004",
            AudioError::EmptyCorpus => "AUDIO_005",
            AudioError::DegenerateSpectrum { .. } => "AUDIO_006",
            AudioError::SilentReference { .. } => "AUDIO_007",
            AudioError::InvalidParameter { .. } => "AUDIO_008",
        }
    }
}

impl From<hound::Error> for AudioError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(io) => AudioError::Io(io),
            other => AudioError::Wav(other),
        }
    }
}
