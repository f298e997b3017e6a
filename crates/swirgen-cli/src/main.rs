//! swirgen CLI - Command-line interface for speech-in-noise stimulus generation
//!
//! This binary wires the project config to the audio core: it writes the
//! calibration tone, builds the babble and speech-shaped noise maskers,
//! normalizes everything to the tone, and verifies the result.

mod cli_args;

use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;

use cli_args::{Cli, Commands};
use swirgen_cli::commands;
use swirgen_cli::commands::babble::BabbleOverrides;
use swirgen_cli::commands::noise::NoiseOverrides;
use swirgen_cli::commands::reporting::JsonError;
use swirgen_cli::logging;
use swirgen_cli::project;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let json = cli.json;
    let result = match cli.command {
        Commands::Init { output, force } => commands::init::run(&output, force, json),
        command => project::load_config(cli.config.as_deref())
            .and_then(|config| dispatch(command, &config, json)),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            if json {
                let error = JsonError::from_anyhow(&e);
                match serde_json::to_string_pretty(&serde_json::json!({
                    "success": false,
                    "errors": [error],
                })) {
                    Ok(text) => println!("{}", text),
                    Err(_) => eprintln!("error: {:#}", e),
                }
            } else {
                eprintln!("{}: {:#}", "error".red(), e);
            }
            ExitCode::from(1)
        }
    }
}

fn dispatch(
    command: Commands,
    config: &swirgen_spec::ProjectConfig,
    json: bool,
) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Init { output, force } => commands::init::run(&output, force, json),
        Commands::Tone => commands::tone::run(config, json),
        Commands::Babble {
            seed,
            voices,
            duration,
        } => commands::babble::run(
            config,
            BabbleOverrides {
                seed,
                voices,
                duration,
            },
            json,
        ),
        Commands::Noise {
            seed,
            taps,
            duration,
        } => commands::noise::run(
            config,
            NoiseOverrides {
                seed,
                taps,
                duration,
            },
            json,
        ),
        Commands::Normalize => commands::normalize::run(config, json),
        Commands::Verify { tolerance } => commands::verify::run(config, tolerance, json),
        Commands::Levels { masker } => commands::levels::run(config, masker.as_deref(), json),
        Commands::Run => commands::run::run(config, json),
    }
}
