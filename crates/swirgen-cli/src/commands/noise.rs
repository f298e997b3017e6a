//! Noise command implementation
//!
//! Builds the speech-shaped noise masker from the configured corpus.

use std::process::ExitCode;

use anyhow::{Context, Result};
use swirgen_audio::rng::create_component_rng;
use swirgen_audio::{wav, ClipCorpus, NoiseSynthesizer};
use swirgen_spec::ProjectConfig;
use tracing::info;

use super::reporting::{self, GeneratedFile};
use crate::project;

/// Command-line overrides for the noise section.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoiseOverrides {
    /// Base seed.
    pub seed: Option<u32>,
    /// FIR filter length.
    pub taps: Option<usize>,
    /// Duration in seconds.
    pub duration: Option<f64>,
}

impl NoiseOverrides {
    /// Applies the overrides to a copy of `config`.
    pub fn apply(&self, config: &ProjectConfig) -> ProjectConfig {
        let mut config = config.clone();
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(taps) = self.taps {
            config.noise.num_taps = taps;
        }
        if let Some(duration) = self.duration {
            config.noise.duration_seconds = duration;
        }
        config
    }
}

/// Synthesizes and writes the speech-shaped noise masker.
pub fn execute(config: &ProjectConfig) -> Result<GeneratedFile> {
    let sources = project::resolve_sources(config, &config.noise.sources);
    let corpus = ClipCorpus::load(&sources).context("Failed to scan noise corpus")?;
    info!(
        clips = corpus.len(),
        samples = corpus.total_samples(),
        "noise corpus ready"
    );

    let mut rng = create_component_rng(config.seed, "noise");
    let buffer = NoiseSynthesizer::new(config.noise.clone())
        .synthesize(&corpus, &mut rng)
        .context("Noise synthesis failed")?;

    let path = config.resolve(&config.noise.output);
    let written = wav::write_file(&path, &buffer)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(GeneratedFile::new("noise", &path, &written, Some(config.seed)))
}

/// Run the noise command
pub fn run(
    config: &ProjectConfig,
    overrides: NoiseOverrides,
    json_output: bool,
) -> Result<ExitCode> {
    let config = overrides.apply(config);
    project::check(&config)?;

    let file = execute(&config)?;
    if json_output {
        reporting::print_json("noise", true, &file)?;
    } else {
        reporting::print_generated(&file);
    }
    Ok(ExitCode::SUCCESS)
}
