//! Babble command implementation
//!
//! Builds the multi-talker babble masker from the configured corpus.

use std::process::ExitCode;

use anyhow::{Context, Result};
use swirgen_audio::rng::create_component_rng;
use swirgen_audio::{wav, BabbleSynthesizer, ClipCorpus};
use swirgen_spec::ProjectConfig;
use tracing::info;

use super::reporting::{self, GeneratedFile};
use crate::project;

/// Command-line overrides for the babble section.
#[derive(Debug, Clone, Copy, Default)]
pub struct BabbleOverrides {
    /// Base seed.
    pub seed: Option<u32>,
    /// Number of talkers.
    pub voices: Option<usize>,
    /// Duration in seconds.
    pub duration: Option<f64>,
}

impl BabbleOverrides {
    /// Applies the overrides to a copy of `config`.
    pub fn apply(&self, config: &ProjectConfig) -> ProjectConfig {
        let mut config = config.clone();
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(voices) = self.voices {
            config.babble.voices = voices;
        }
        if let Some(duration) = self.duration {
            config.babble.duration_seconds = duration;
        }
        config
    }
}

/// Synthesizes and writes the babble masker.
///
/// Nothing is written when the corpus is empty.
pub fn execute(config: &ProjectConfig) -> Result<GeneratedFile> {
    let sources = project::resolve_sources(config, &config.babble.sources);
    let corpus = ClipCorpus::load(&sources).context("Failed to scan babble corpus")?;
    info!(clips = corpus.len(), "babble corpus ready");

    let mut rng = create_component_rng(config.seed, "babble");
    let buffer = BabbleSynthesizer::new(config.babble.clone())
        .synthesize(&corpus, &mut rng)
        .context("Babble synthesis failed")?;

    let path = config.resolve(&config.babble.output);
    let written = wav::write_file(&path, &buffer)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(GeneratedFile::new("babble", &path, &written, Some(config.seed)))
}

/// Run the babble command
pub fn run(
    config: &ProjectConfig,
    overrides: BabbleOverrides,
    json_output: bool,
) -> Result<ExitCode> {
    let config = overrides.apply(config);
    project::check(&config)?;

    let file = execute(&config)?;
    if json_output {
        reporting::print_json("babble", true, &file)?;
    } else {
        reporting::print_generated(&file);
    }
    Ok(ExitCode::SUCCESS)
}
