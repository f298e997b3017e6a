//! CLI command implementations

pub mod babble;
pub mod init;
pub mod levels;
pub mod noise;
pub mod normalize;
pub mod reporting;
pub mod run;
pub mod tone;
pub mod verify;
