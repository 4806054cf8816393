//! Config command handler

use crate::args::ConfigSubcommand;
use immunograph::config::Config;
use std::io::{self, Write};
use std::process::ExitCode;

/// Dispatch config subcommands
pub fn run(subcommand: Option<ConfigSubcommand>, config: &mut Config, defaults: &Config) -> ExitCode {
    let result = match subcommand {
        None => handle_config_get(config, None),
        Some(ConfigSubcommand::Get { key }) => handle_config_get(config, key),
        Some(ConfigSubcommand::Set { key, value }) => handle_config_set(config, &key, &value),
        Some(ConfigSubcommand::Unset { key }) => handle_config_unset(config, defaults, &key),
        Some(ConfigSubcommand::Reset) => handle_config_reset(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

/// Handle the config get subcommand
///
/// # Errors
/// Returns a message if the key is not recognized.
pub fn handle_config_get(config: &Config, key: Option<String>) -> Result<(), String> {
    if let Some(k) = key {
        let value = config
            .get(&k)
            .ok_or_else(|| format!("Unknown config key: '{k}'"))?;
        println!("{value}");
    } else {
        println!("\n=== Configuration ===\n");
        println!("File: {}\n", Config::get_config_file_path().display());
        print!("{config}");
    }
    Ok(())
}

/// Handle the config set subcommand
///
/// # Errors
/// Returns a message if the key or value is invalid or the file cannot be saved.
pub fn handle_config_set(config: &mut Config, key: &str, value: &str) -> Result<(), String> {
    config.set(key, value)?;
    config
        .save()
        .map_err(|e| format!("Failed to save config: {e}"))?;

    println!("✓ Set {key} = {value}");
    Ok(())
}

/// Handle the config unset subcommand
///
/// # Errors
/// Returns a message if the key is invalid or the file cannot be saved.
pub fn handle_config_unset(config: &mut Config, defaults: &Config, key: &str) -> Result<(), String> {
    config.unset(key, defaults)?;
    config
        .save()
        .map_err(|e| format!("Failed to save config: {e}"))?;

    println!("✓ Reset {key} to default");
    Ok(())
}

/// Handle the config reset subcommand
///
/// # Errors
/// Returns a message if the config file cannot be removed.
pub fn handle_config_reset() -> Result<(), String> {
    if !Config::get_config_file_path().exists() {
        println!("✓ Config is already at defaults");
        return Ok(());
    }

    // Ask for confirmation
    print!("Are you sure you want to reset config to defaults? (y/n): ");
    io::stdout().flush().ok();

    let mut response = String::new();
    io::stdin().read_line(&mut response).ok();

    if response.trim().eq_ignore_ascii_case("y") || response.trim().eq_ignore_ascii_case("yes") {
        Config::reset().map_err(|e| format!("Failed to remove config file: {e}"))?;
        println!("✓ Config reset to defaults");
    } else {
        println!("✗ Reset cancelled");
    }
    Ok(())
}
