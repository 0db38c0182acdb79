//! File based delay distribution
//!
//! A file based distribution carries only a key. The actual distribution is defined
//! in one of the registry's config files and looked up at sample time, so response
//! delays can be switched wholesale (e.g. no latency for integration runs, peak-hour
//! latency for soak tests) without touching the stub mappings.

use super::DelayDistribution;
use crate::registry::DistributionRegistry;
use crate::{Error, Result};
use rand::RngCore;
use serde::Serialize;

/// Indirection to a registry-defined distribution
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FileBased {
    key: String,
}

impl FileBased {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Key used to look the distribution up in the registry
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Resolve the key without sampling.
    pub fn resolve(&self, registry: &DistributionRegistry) -> Result<DelayDistribution> {
        registry.lookup(&self.key).ok_or_else(|| Error::LookupFailure {
            key: self.key.clone(),
        })
    }

    /// Resolve the key and delegate to the resolved distribution.
    ///
    /// Fails with [`Error::LookupFailure`] when the registry is unpopulated or does
    /// not define the key.
    pub fn sample(&self, registry: &DistributionRegistry, rng: &mut dyn RngCore) -> Result<u64> {
        self.resolve(registry)?.sample(registry, rng)
    }
}
