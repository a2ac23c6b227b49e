//! `amlens run` / `amlens validate` — config-driven scoring runs.

use std::path::{Path, PathBuf};

use amlens_engine::engine::load_csv_rows;
use amlens_engine::{EngineConfig, EngineError, RunInput};

use crate::exit_codes::{EXIT_CASES_FOUND, EXIT_INVALID_CONFIG, EXIT_RUNTIME, EXIT_USAGE};
use crate::CliError;

fn cli_err(code: u8, message: impl Into<String>) -> CliError {
    CliError {
        code,
        message: message.into(),
        hint: None,
    }
}

fn config_err(err: EngineError) -> CliError {
    let code = match err {
        EngineError::Io(_) => EXIT_RUNTIME,
        _ => EXIT_INVALID_CONFIG,
    };
    cli_err(code, err.to_string())
}

pub fn cmd_run(
    config_path: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
) -> Result<(), CliError> {
    if config_path.is_dir() {
        return Err(cli_err(
            EXIT_USAGE,
            format!(
                "{} is a directory, expected a .amlens.toml config file",
                config_path.display()
            ),
        ));
    }

    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| cli_err(EXIT_RUNTIME, format!("cannot read config: {e}")))?;
    let config = EngineConfig::from_toml(&config_str).map_err(config_err)?;
    let inputs = config.inputs().map_err(config_err)?;

    // Input files resolve relative to the config file's directory.
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let read_input = |file: &str| -> Result<String, CliError> {
        let path = base_dir.join(file);
        std::fs::read_to_string(&path)
            .map_err(|e| cli_err(EXIT_RUNTIME, format!("cannot read {}: {e}", path.display())))
    };

    let input = RunInput {
        clients: load_csv_rows(&read_input(&inputs.clients)?)
            .map_err(|e| cli_err(EXIT_RUNTIME, e.to_string()))?,
        transactions: load_csv_rows(&read_input(&inputs.transactions)?)
            .map_err(|e| cli_err(EXIT_RUNTIME, e.to_string()))?,
    };

    let result =
        amlens_engine::run(&config, &input).map_err(|e| cli_err(EXIT_RUNTIME, e.to_string()))?;

    let json_str = serde_json::to_string_pretty(&result)
        .map_err(|e| cli_err(EXIT_RUNTIME, format!("JSON serialization error: {e}")))?;

    // --output wins over [output].json in the config.
    let configured = config.output.json.as_ref().map(|f| base_dir.join(f));
    if let Some(path) = output_file.or(configured) {
        std::fs::write(&path, &json_str)
            .map_err(|e| cli_err(EXIT_RUNTIME, format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    }

    // Human summary to stderr
    let s = &result.summary;
    eprintln!(
        "scored {} client(s) as of {} — {} high, {} medium, {} low; {} monitoring case(s), {} orphaned txn(s)",
        s.total_clients,
        result.meta.as_of,
        s.high,
        s.medium,
        s.low,
        s.total_cases,
        s.orphaned_transactions,
    );

    if s.total_cases > 0 {
        return Err(cli_err(EXIT_CASES_FOUND, "monitoring cases found"));
    }

    Ok(())
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| cli_err(EXIT_RUNTIME, format!("cannot read config: {e}")))?;

    match EngineConfig::from_toml(&config_str) {
        Ok(config) => {
            let inputs = config.inputs().map_err(config_err)?;
            eprintln!(
                "valid: '{}' scoring {} against {}",
                config.name, inputs.clients, inputs.transactions,
            );
            Ok(())
        }
        Err(e) => Err(config_err(e)),
    }
}
