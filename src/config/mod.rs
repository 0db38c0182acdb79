//! Configuration module
//!
//! Handles CLI argument parsing, TOML configuration files, validation, and the
//! startup bootstrap that populates the distribution registry.
//!
//! # Example configuration
//!
//! ```toml
//! [distributions]
//! root_dir = "stubs"
//! files = ["__files/base-latency.json", "__files/peak-latency.json"]
//!
//! [mappings]
//! file = "stubs/mappings.json"
//! check_on_startup = true
//! ```

pub mod cli;
pub mod toml;
pub mod validator;

use crate::check::ConsistencyChecker;
use crate::mapping::{self, StubMapping};
use crate::registry::source::DirectoryFileSource;
use crate::registry::DistributionRegistry;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub distributions: DistributionsConfig,
    #[serde(default)]
    pub mappings: MappingsConfig,
}

impl Config {
    /// Copy of this configuration with the startup consistency check forced on or off.
    pub fn with_startup_check(&self, enabled: bool) -> Self {
        let mut config = self.clone();
        config.mappings.check_on_startup = enabled;
        config
    }
}

/// File based distribution sources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionsConfig {
    /// Directory relative file names are resolved against
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,
    /// Config sources in merge order; absent means the feature is unused
    #[serde(default)]
    pub files: Option<Vec<String>>,
}

impl Default for DistributionsConfig {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            files: None,
        }
    }
}

fn default_root_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Stub mappings checked against the registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingsConfig {
    /// Mappings document (JSON)
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// Fail startup when a mapping references an undefined distribution key
    #[serde(default = "default_check_on_startup")]
    pub check_on_startup: bool,
}

impl Default for MappingsConfig {
    fn default() -> Self {
        Self {
            file: None,
            check_on_startup: default_check_on_startup(),
        }
    }
}

fn default_check_on_startup() -> bool {
    true
}

/// Populate `registry` from `config`, load the stub mappings and run the
/// consistency check when enabled.
///
/// Returns the loaded mappings (empty when none are configured).
pub fn bootstrap(config: &Config, registry: &DistributionRegistry) -> Result<Vec<StubMapping>> {
    let files = DirectoryFileSource::new(&config.distributions.root_dir);
    registry
        .load(&files, config.distributions.files.as_deref())
        .context("Failed to load distribution config files")?;

    let mappings = match &config.mappings.file {
        Some(path) => mapping::load_mappings(path)?,
        None => Vec::new(),
    };

    if config.mappings.check_on_startup {
        ConsistencyChecker::new(registry)
            .check(&mappings)
            .context("Distribution consistency check failed")?;
        tracing::info!(mappings = mappings.len(), "distribution consistency check passed");
    }

    Ok(mappings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::fs;
    use tempfile::TempDir;

    fn write_fixture(dir: &TempDir) {
        fs::create_dir(dir.path().join("__files")).unwrap();
        fs::write(
            dir.path().join("__files/file-based-distributions.json"),
            r#"{
                "GET:/file_based_distribution/fixed": {"type": "fixed", "delayMillis": 50},
                "GET:/file_based_distribution/truncated_log_normal":
                    {"type": "capped_lognormal", "medianMillis": 90, "sigma": 0.1, "maxValueMillis": 150}
            }"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("mappings.json"),
            r#"[
                {"response": {"delayDistribution": {"type": "file_based", "key": "GET:/file_based_distribution/fixed"}}},
                {"response": {"delayDistribution": {"type": "file_based", "key": "GET:/file_based_distribution/missing"}}}
            ]"#,
        )
        .unwrap();
    }

    fn config_for(dir: &TempDir) -> Config {
        Config {
            distributions: DistributionsConfig {
                root_dir: dir.path().to_path_buf(),
                files: Some(vec!["__files/file-based-distributions.json".to_string()]),
            },
            mappings: MappingsConfig {
                file: Some(dir.path().join("mappings.json")),
                check_on_startup: true,
            },
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.distributions.root_dir, PathBuf::from("."));
        assert!(config.distributions.files.is_none());
        assert!(config.mappings.check_on_startup);
    }

    #[test]
    fn test_bootstrap_without_files_leaves_registry_unpopulated() {
        let registry = DistributionRegistry::new();
        let mappings = bootstrap(&Config::default(), &registry).unwrap();

        assert!(mappings.is_empty());
        assert!(!registry.is_populated());
    }

    #[test]
    fn test_bootstrap_reports_missing_key() {
        let dir = TempDir::new().unwrap();
        write_fixture(&dir);
        let registry = DistributionRegistry::new();

        let err = bootstrap(&config_for(&dir), &registry).unwrap_err();
        let missing = err
            .downcast_ref::<Error>()
            .map(|e| e.missing_keys().to_vec())
            .unwrap_or_default();
        assert_eq!(missing, vec!["GET:/file_based_distribution/missing".to_string()]);
    }

    #[test]
    fn test_bootstrap_check_disabled() {
        let dir = TempDir::new().unwrap();
        write_fixture(&dir);
        let registry = DistributionRegistry::new();

        let mut config = config_for(&dir);
        config.mappings.check_on_startup = false;

        let mappings = bootstrap(&config, &registry).unwrap();
        assert_eq!(mappings.len(), 2);
        assert_eq!(
            registry
                .lookup("GET:/file_based_distribution/fixed")
                .unwrap()
                .sample_millis(&registry)
                .unwrap(),
            50
        );
    }

    #[test]
    fn test_bootstrap_without_startup_check_still_lists_keys() {
        let dir = TempDir::new().unwrap();
        write_fixture(&dir);
        let registry = DistributionRegistry::new();

        let config = config_for(&dir);
        assert!(bootstrap(&config, &DistributionRegistry::new()).is_err());

        let listing = config.with_startup_check(false);
        assert!(config.mappings.check_on_startup);
        assert!(!listing.mappings.check_on_startup);

        bootstrap(&listing, &registry).unwrap();
        assert_eq!(
            registry.keys(),
            vec![
                "GET:/file_based_distribution/fixed".to_string(),
                "GET:/file_based_distribution/truncated_log_normal".to_string(),
            ]
        );
    }

    #[test]
    fn test_bootstrap_missing_distribution_file() {
        let dir = TempDir::new().unwrap();
        let registry = DistributionRegistry::new();

        let mut config = Config::default();
        config.distributions.root_dir = dir.path().to_path_buf();
        config.distributions.files = Some(vec!["__files/non_existent_file.json".to_string()]);

        let err = bootstrap(&config, &registry).unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::FileNotFound { .. })));
    }
}
