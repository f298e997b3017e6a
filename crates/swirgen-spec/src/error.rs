//! Error types for configuration loading and validation.

use thiserror::Error;

/// Stable codes for configuration validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// C001: An output path is empty
    EmptyPath,
    /// C002: Unsupported sample rate
    InvalidSampleRate,
    /// C003: Duration is not a positive finite number
    InvalidDuration,
    /// C004: Babble voice count is zero or too large
    InvalidVoiceCount,
    /// C005: Seconds range is inverted, negative, or non-finite
    InvalidRange,
    /// C006: Peak fraction outside (0, 1]
    InvalidPeakFraction,
    /// C007: FIR tap count is even or too small
    InvalidTapCount,
    /// C008: Welch segment length too small
    InvalidSegmentLength,
    /// C009: Clip ceiling outside the 16-bit range
    InvalidClipCeiling,
    /// C010: Calibration tone parameters out of range
    InvalidTone,
    /// C011: Verification tolerance is not positive
    InvalidTolerance,
    /// C012: A corpus source list is empty
    NoSources,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "C001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::EmptyPath => "C001",
            ErrorCode::InvalidSampleRate => "C002",
            ErrorCode::InvalidDuration => "C003",
            ErrorCode::InvalidVoiceCount => "C004",
            ErrorCode::InvalidRange => "C005",
            ErrorCode::InvalidPeakFraction => "C006",
            ErrorCode::InvalidTapCount => "C007",
            ErrorCode::InvalidSegmentLength => "C008",
            ErrorCode::InvalidClipCeiling => "C009",
            ErrorCode::InvalidTone => "C010",
            ErrorCode::InvalidTolerance => "C011",
            ErrorCode::NoSources => "C012",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A validation error with code, message, and the JSON path of the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// JSON path to the problematic field (e.g., "babble.gap").
    pub path: Option<String>,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Creates a new validation error with a JSON path.
    pub fn with_path(code: ErrorCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

/// Top-level error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Validation failed with one or more errors.
    #[error("config validation failed with {} error(s)", .0.len())]
    ValidationFailed(Vec<ValidationError>),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
