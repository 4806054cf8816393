//! Command-line interface entry point for `immunograph`

mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;
use immunograph::config::Config;
use immunograph::logger::{self, enable_verbose, init_file_logging, parse_level, set_level};
use log::{info, LevelFilter};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Cli::parse();

    if let Err(e) = logger::init() {
        eprintln!("✗ Failed to install logger: {e}");
    }

    // Load configuration once at startup and apply CLI overrides to it
    let mut config = Config::load();
    let defaults = Config::from_defaults();
    config.apply_overrides(&args.to_config_overrides());

    // CLI flag overrides config; otherwise use config logging.level; fallback warn
    let mut level = args
        .log_level
        .map(LevelFilter::from)
        .or_else(|| parse_level(&config.logging.level))
        .unwrap_or(logger::DEFAULT_LEVEL);
    if args.debug_flag {
        level = LevelFilter::Debug;
    }
    set_level(level);

    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }

    let log_path = (!config.logging.file.is_empty()).then(|| PathBuf::from(&config.logging.file));
    if let Some(log_path) = log_path {
        let display_path = log_path.to_string_lossy();
        if init_file_logging(&log_path) {
            if verbose {
                eprintln!("✓ File logging initialized at: {display_path}");
            } else {
                info!("File logging initialized at: {display_path}");
            }
        } else {
            eprintln!("✗ Failed to initialize file logging at: {display_path}");
        }
    }

    match (args.command, args.input, args.output) {
        (Some(Command::Config { subcommand }), _, _) => {
            commands::config::run(subcommand, &mut config, &defaults)
        }
        (None, Some(input), Some(output)) => commands::render::run(&input, &output, &config),
        // clap enforces INPUT and OUTPUT when no subcommand is given
        (None, _, _) => ExitCode::from(2),
    }
}
