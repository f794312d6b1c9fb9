//! nutriflow CLI: stage, load, aggregate and query nutrition data.
//!
//! `nutriflow [--config PATH] [--uri URI] [--db NAME] [--json] COMMAND`
//!
//! Settings resolve in order: defaults, `nutriflow.toml`, `NUTRIFLOW_*`
//! environment variables, command line flags. Logs go to stderr and are
//! filtered with `RUST_LOG`.

mod commands;
mod format;
mod parse;
mod state;

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::ArgMatches;
use nutriflow_engine::uri::redact;
use nutriflow_engine::{NutriflowConfig, CONFIG_FILE_NAME};
use tracing_subscriber::EnvFilter;

use commands::build_cli;
use format::{format_error, format_output, OutputMode};
use parse::matches_to_action;
use state::SessionState;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let matches = build_cli().get_matches();

    let output_mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    match run(&matches) {
        Ok(output) => {
            let formatted = format_output(&output, output_mode);
            if !formatted.is_empty() {
                println!("{}", formatted);
            }
        }
        Err(e) => {
            eprintln!("{}", format_error(&e, output_mode));
            process::exit(1);
        }
    }
}

fn run(matches: &ArgMatches) -> Result<state::Output> {
    let config_path = matches
        .get_one::<String>("config")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
    let config = resolve_config(matches, &config_path)?;
    tracing::debug!(
        uri = %redact(&config.uri),
        database = %config.database,
        "resolved configuration"
    );

    let today = chrono::Local::now().date_naive();
    let action = matches_to_action(matches, today)?;
    SessionState::new(config, config_path).execute(action)
}

fn resolve_config(matches: &ArgMatches, path: &std::path::Path) -> Result<NutriflowConfig> {
    let mut config = NutriflowConfig::load(path)
        .with_context(|| format!("failed to load configuration from '{}'", path.display()))?;
    if let Some(uri) = matches.get_one::<String>("uri") {
        config.uri = uri.clone();
    }
    if let Some(db) = matches.get_one::<String>("db") {
        config.database = db.clone();
    }
    config.validate()?;
    Ok(config)
}
