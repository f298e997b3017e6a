//! swirgen Project Configuration
//!
//! This crate provides the configuration types shared by the swirgen audio
//! core and CLI, together with their defaults and validation.
//!
//! # Overview
//!
//! A project is one JSON document describing where the corpus lives and how
//! each stimulus is produced:
//!
//! - **calibration**: the 1 kHz reference tone and its dBFS level
//! - **babble**: the multi-talker masker (voices, gaps, duration)
//! - **noise**: the speech-shaped noise masker (Welch segment, FIR taps)
//! - **normalize**: which folders are matched to the tone and the clip ceiling
//! - **verify**: the tolerance used when checking levels afterwards
//!
//! # Example
//!
//! ```
//! use swirgen_spec::{validate_config, ProjectConfig};
//!
//! let config = ProjectConfig::from_json(r#"{ "seed": 7, "babble": { "voices": 6 } }"#).unwrap();
//! assert_eq!(config.babble.voices, 6);
//! assert!(validate_config(&config).is_ok());
//! ```

pub mod config;
pub mod error;
pub mod validation;

pub use config::{
    BabbleParams, CalibrationParams, CorpusSource, NoiseParams, NormalizeParams, ProjectConfig,
    SecondsRange, VerifyParams, PCM16_FULL_SCALE,
};
pub use error::{ConfigError, ErrorCode, ValidationError};
pub use validation::validate_config;
