//! stubdelay CLI entry point

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use std::collections::BTreeMap;
use stubdelay::config::cli::{Cli, Command};
use stubdelay::config::{self, toml as config_toml, validator, Config};
use stubdelay::stats::DelaySummary;
use stubdelay::{logging, DistributionRegistry};

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    cli.validate()?;

    logging::init_tracing(cli.verbose);

    let config = config_toml::load_config(&cli)?;
    validator::validate_config(&config).context("Configuration validation failed")?;

    let registry = DistributionRegistry::new();

    match &cli.command {
        Command::Check => run_check(&config, &registry),
        Command::List { json } => run_list(&config, &registry, *json),
        Command::Sample {
            key,
            count,
            seed,
            json,
        } => run_sample(&config, &registry, key, *count, *seed, *json),
    }
}

/// Bootstrap and report the consistency check result
fn run_check(config: &Config, registry: &DistributionRegistry) -> Result<()> {
    let config = config.with_startup_check(true);
    let mappings = config::bootstrap(&config, registry)?;

    let referencing = mappings
        .iter()
        .filter_map(|m| m.response.delay_distribution.as_ref())
        .filter(|d| d.file_based_key().is_some())
        .count();

    println!(
        "OK: {} distributions loaded, {} of {} mappings use file based delays, all keys resolve",
        registry.len(),
        referencing,
        mappings.len()
    );
    Ok(())
}

/// Print loaded keys, even when mappings reference keys that are not defined
fn run_list(config: &Config, registry: &DistributionRegistry, json: bool) -> Result<()> {
    config::bootstrap(&config.with_startup_check(false), registry)?;

    let Some(table) = registry.snapshot() else {
        println!("No distribution config files configured");
        return Ok(());
    };

    if json {
        let ordered: BTreeMap<_, _> = table.iter().collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&ordered).context("Failed to serialize distributions")?
        );
        return Ok(());
    }

    for key in registry.keys() {
        if let Some(distribution) = table.get(&key) {
            println!("{:<50} {}", key, distribution.type_name());
        }
    }
    Ok(())
}

/// Sample a key and print the summary
fn run_sample(
    config: &Config,
    registry: &DistributionRegistry,
    key: &str,
    count: u64,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    config::bootstrap(config, registry)?;

    let distribution = registry
        .lookup(key)
        .ok_or_else(|| stubdelay::Error::LookupFailure { key: key.to_string() })?;

    let mut rng = match seed {
        Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
        None => Xoshiro256PlusPlus::from_entropy(),
    };

    let summary = DelaySummary::collect(&distribution, registry, &mut rng, count)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?
        );
    } else {
        println!("{} ({})", key, distribution.type_name());
        println!("{}", summary);
    }
    Ok(())
}
