//! Project config loading for commands.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use swirgen_spec::{validate_config, ConfigError, CorpusSource, ProjectConfig};
use tracing::info;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "swirgen.json";

/// Loads the project config.
///
/// An explicit path must exist. Without one, `./swirgen.json` is used if
/// present and the built-in defaults otherwise.
pub fn load_config(path: Option<&Path>) -> Result<ProjectConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !fallback.exists() {
                info!("no {} found, using built-in defaults", DEFAULT_CONFIG_FILE);
                return Ok(ProjectConfig::default());
            }
            fallback
        }
    };

    match ProjectConfig::load(&path) {
        Ok(config) => {
            info!(config = %path.display(), "loaded project config");
            Ok(config)
        }
        Err(ConfigError::ValidationFailed(errors)) => {
            let details: Vec<String> = errors.iter().map(|e| format!("  {}", e)).collect();
            bail!(
                "invalid config {}:\n{}",
                path.display(),
                details.join("\n")
            )
        }
        Err(e) => {
            Err(e).with_context(|| format!("Failed to load config file: {}", path.display()))
        }
    }
}

/// Re-validates a config after command-line overrides were applied.
pub fn check(config: &ProjectConfig) -> Result<()> {
    if let Err(errors) = validate_config(config) {
        let details: Vec<String> = errors.iter().map(|e| format!("  {}", e)).collect();
        bail!("invalid parameters:\n{}", details.join("\n"));
    }
    Ok(())
}

/// Resolves every source against the project root.
pub fn resolve_sources(config: &ProjectConfig, sources: &[CorpusSource]) -> Vec<CorpusSource> {
    sources.iter().map(|s| config.resolve_source(s)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_explicit_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("nope.json"))).unwrap_err();
        assert!(err.to_string().contains("Failed to load config file"));
    }

    #[test]
    fn test_validation_errors_are_listed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swirgen.json");
        fs::write(&path, r#"{ "babble": { "voices": 0 }, "noise": { "num_taps": 8 } }"#).unwrap();
        let message = load_config(Some(&path)).unwrap_err().to_string();
        assert!(message.contains("C004"), "{}", message);
        assert!(message.contains("C007"), "{}", message);
    }

    #[test]
    fn test_loads_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swirgen.json");
        fs::write(&path, r#"{ "seed": 9 }"#).unwrap();
        assert_eq!(load_config(Some(&path)).unwrap().seed, 9);
    }

    #[test]
    fn test_check_rejects_overrides() {
        let mut config = ProjectConfig::default();
        config.noise.num_taps = 1000;
        assert!(check(&config).is_err());
    }
}
