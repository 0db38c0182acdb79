//! TOML configuration file parsing

use super::*;
use crate::config::cli::Cli;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse TOML configuration file
pub fn parse_toml_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML configuration from string
pub fn parse_toml_string(contents: &str) -> Result<Config> {
    let config: Config = ::toml::from_str(contents)
        .context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Merge CLI arguments with TOML configuration (CLI takes precedence)
pub fn merge_cli_with_config(cli: &Cli, mut config: Config) -> Config {
    if let Some(ref root_dir) = cli.root_dir {
        config.distributions.root_dir = root_dir.clone();
    }

    // CLI file list replaces the configured one rather than appending to it
    if !cli.distribution_files.is_empty() {
        config.distributions.files = Some(cli.distribution_files.clone());
    }

    if let Some(ref mappings) = cli.mappings {
        config.mappings.file = Some(mappings.clone());
    }

    if cli.no_check {
        config.mappings.check_on_startup = false;
    }

    config
}

/// Load the configuration file named on the command line (if any) and apply CLI
/// overrides on top of it.
pub fn load_config(cli: &Cli) -> Result<Config> {
    let config = match cli.config {
        Some(ref path) => parse_toml_file(path)?,
        None => Config::default(),
    };

    Ok(merge_cli_with_config(cli, config))
}
