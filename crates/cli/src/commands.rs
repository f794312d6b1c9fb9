//! Clap command tree definition.

use clap::{Arg, ArgAction, Command};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("nutriflow")
        .about("Stage, load, aggregate and query fruit and snack nutrition data")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Config file (default: ./nutriflow.toml)")
                .global(true),
        )
        .arg(
            Arg::new("uri")
                .long("uri")
                .value_name("URI")
                .help("Store URI, overrides config and NUTRIFLOW_URI")
                .global(true),
        )
        .arg(
            Arg::new("db")
                .long("db")
                .value_name("NAME")
                .help("Database name, overrides config and NUTRIFLOW_DATABASE")
                .global(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("JSON output mode")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(build_init())
        .subcommand(build_stage())
        .subcommand(build_load())
        .subcommand(build_aggregate())
        .subcommand(build_query())
}

fn dataset_arg() -> Arg {
    Arg::new("dataset")
        .required(true)
        .value_parser(["fruit", "snack"])
        .help("Which dataset")
}

fn date_arg() -> Arg {
    Arg::new("date")
        .long("date")
        .value_name("YYYY-MM-DD")
        .help("Object date (default: today)")
}

// =========================================================================
// Setup
// =========================================================================

fn build_init() -> Command {
    Command::new("init").about("Write a default config file and create the store directory")
}

// =========================================================================
// Ingestion
// =========================================================================

fn build_stage() -> Command {
    Command::new("stage")
        .about("Copy a downloaded JSON blob into its staging bucket")
        .arg(dataset_arg())
        .arg(
            Arg::new("file")
                .required(true)
                .value_name("FILE")
                .help("Downloaded API response"),
        )
        .arg(date_arg())
}

fn build_load() -> Command {
    Command::new("load")
        .about("Load a staged blob into its raw collection")
        .arg(dataset_arg())
        .arg(date_arg())
}

// =========================================================================
// Aggregation
// =========================================================================

fn build_aggregate() -> Command {
    Command::new("aggregate")
        .about("Rebuild derived collections from the fruit collection")
        .arg(
            Arg::new("target")
                .required(true)
                .value_parser(["summary", "families", "all"]),
        )
}

// =========================================================================
// Queries
// =========================================================================

fn build_query() -> Command {
    Command::new("query")
        .about("Read raw and derived collections")
        .subcommand_required(true)
        .subcommand(
            Command::new("fruits")
                .about("List fruits as {name, family, order}")
                .arg(
                    Arg::new("order")
                        .long("order")
                        .value_name("ORDER")
                        .help("Only fruits of this botanical order (exact match)"),
                ),
        )
        .subcommand(Command::new("snacks").about("Snacks with no additives"))
        .subcommand(Command::new("families").about("Families with more than one fruit"))
}
