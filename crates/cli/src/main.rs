// amlens CLI - headless client risk scoring and transaction monitoring

mod exit_codes;
mod run;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{EXIT_ERROR, EXIT_SUCCESS};

/// A CLI failure carrying its shell exit code.
#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Parser)]
#[command(name = "amlens")]
#[command(about = "Client risk scoring and transaction monitoring (headless)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scoring batch from a TOML config file
    #[command(after_help = "\
Examples:
  amlens run review.amlens.toml
  amlens run review.amlens.toml --json
  amlens run review.amlens.toml --output result.json")]
    Run {
        /// Path to the .amlens.toml config file
        config: PathBuf,

        /// Output JSON to stdout instead of human summary only
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Validate a run config without scoring
    #[command(after_help = "\
Examples:
  amlens validate review.amlens.toml")]
    Validate {
        /// Path to the .amlens.toml config file
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            config,
            json,
            output,
        } => run::cmd_run(config, json, output),
        Commands::Validate { config } => run::cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = &err.hint {
                eprintln!("hint: {hint}");
            }
            if err.code == EXIT_SUCCESS {
                ExitCode::from(EXIT_ERROR)
            } else {
                ExitCode::from(err.code)
            }
        }
    }
}
