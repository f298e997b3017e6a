//! Init command implementation
//!
//! Writes a project config holding every default value.

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use serde::Serialize;
use swirgen_spec::ProjectConfig;

use super::reporting;

#[derive(Serialize)]
struct InitResult<'a> {
    path: &'a Path,
}

/// Run the init command
///
/// # Arguments
/// * `output` - Where to write the config
/// * `force` - Overwrite an existing file
/// * `json_output` - Whether to output machine-readable JSON
pub fn run(output: &Path, force: bool, json_output: bool) -> Result<ExitCode> {
    if output.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            output.display()
        );
    }

    let json = ProjectConfig::default()
        .to_json_pretty()
        .context("Failed to serialize default config")?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(output, json + "\n")
        .with_context(|| format!("Failed to write config: {}", output.display()))?;

    if json_output {
        reporting::print_json("init", true, InitResult { path: output })?;
    } else {
        println!("{} {}", "Wrote".green().bold(), output.display());
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_writes_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swirgen.json");
        run(&path, false, true).unwrap();
        let config = ProjectConfig::load(&path).unwrap();
        assert_eq!(config, ProjectConfig::default());
    }

    #[test]
    fn test_refuses_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swirgen.json");
        fs::write(&path, "{}").unwrap();
        assert!(run(&path, false, true).is_err());
        assert!(run(&path, true, true).is_ok());
    }
}
