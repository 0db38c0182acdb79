//! Configuration validation

use super::*;
use anyhow::Result;
use std::collections::HashSet;

/// Validate complete configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_distributions(&config.distributions)?;
    validate_mappings(&config.mappings)?;

    Ok(())
}

/// Validate distribution sources
pub fn validate_distributions(distributions: &DistributionsConfig) -> Result<()> {
    let Some(ref files) = distributions.files else {
        return Ok(());
    };

    if !files.is_empty() && !distributions.root_dir.is_dir() {
        anyhow::bail!(
            "distributions root_dir {} is not a directory",
            distributions.root_dir.display()
        );
    }

    let mut seen = HashSet::new();
    for (i, name) in files.iter().enumerate() {
        if name.trim().is_empty() {
            anyhow::bail!("distribution file {} has an empty name", i);
        }

        // Harmless for last-source-wins, but almost always a typo
        if !seen.insert(name.as_str()) {
            tracing::warn!(file = %name, "distribution file listed more than once");
        }
    }

    Ok(())
}

/// Validate mappings configuration
pub fn validate_mappings(mappings: &MappingsConfig) -> Result<()> {
    if let Some(ref file) = mappings.file {
        if file.as_os_str().is_empty() {
            anyhow::bail!("mappings file must not be empty");
        }
    }

    Ok(())
}
