//! swirgen CLI library.
//!
//! Command implementations, config loading, and logging setup for the
//! `swirgen` binary. Each command reads the project config, calls into
//! `swirgen-audio`, and prints either colored text or a JSON report.

pub mod commands;
pub mod logging;
pub mod project;
