//! Response delay distributions
//!
//! This module provides the statistical distributions used to pick an artificial
//! response delay, in whole milliseconds, for a stubbed request.
//!
//! # Distributions
//!
//! - **Fixed**: the same delay every time
//! - **Uniform**: equal probability for every millisecond in `[lower, upper]`
//! - **LogNormal**: long-tailed delays around a median
//! - **CappedLogNormal**: log-normal with a hard upper bound
//! - **FileBased**: an indirection resolved by key through a [`DistributionRegistry`]
//!
//! # Example
//!
//! ```
//! use stubdelay::distribution::{DelayDistribution, fixed::Fixed};
//! use stubdelay::registry::DistributionRegistry;
//!
//! let registry = DistributionRegistry::new();
//! let dist = DelayDistribution::from(Fixed::new(50));
//! assert_eq!(dist.sample_millis(&registry).unwrap(), 50);
//! ```

use crate::registry::DistributionRegistry;
use crate::Result;
use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize};

pub mod descriptor;
pub mod file_based;
pub mod fixed;
pub mod lognormal;
pub mod uniform;

use descriptor::DescriptorTable;
use file_based::FileBased;
use fixed::Fixed;
use lognormal::{CappedLogNormal, LogNormal};
use uniform::Uniform;

/// Sampling capability of the concrete distributions
///
/// Implementations are immutable after construction and are shared freely between
/// request-handling threads, so the random source is supplied by the caller.
pub trait Sampler: Send + Sync {
    /// Draw one non-negative delay in milliseconds.
    fn sample_millis(&self, rng: &mut dyn RngCore) -> u64;
}

/// A configured response delay
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DelayDistribution {
    Fixed(Fixed),
    Uniform(Uniform),
    #[serde(rename = "lognormal")]
    LogNormal(LogNormal),
    #[serde(rename = "capped_lognormal")]
    CappedLogNormal(CappedLogNormal),
    FileBased(FileBased),
}

impl DelayDistribution {
    /// Draw one delay using the supplied random source.
    ///
    /// File based distributions are resolved through `registry` on every call and
    /// fail with [`crate::Error::LookupFailure`] when their key is not defined.
    pub fn sample(&self, registry: &DistributionRegistry, rng: &mut dyn RngCore) -> Result<u64> {
        match self {
            Self::Fixed(d) => Ok(d.sample_millis(rng)),
            Self::Uniform(d) => Ok(d.sample_millis(rng)),
            Self::LogNormal(d) => Ok(d.sample_millis(rng)),
            Self::CappedLogNormal(d) => Ok(d.sample_millis(rng)),
            Self::FileBased(d) => d.sample(registry, rng),
        }
    }

    /// Draw one delay using the thread-local random source.
    pub fn sample_millis(&self, registry: &DistributionRegistry) -> Result<u64> {
        self.sample(registry, &mut rand::thread_rng())
    }

    /// The registry key when this is a file based indirection.
    pub fn file_based_key(&self) -> Option<&str> {
        match self {
            Self::FileBased(d) => Some(d.key()),
            _ => None,
        }
    }

    /// Discriminator used in descriptors for this variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Fixed(_) => "fixed",
            Self::Uniform(_) => "uniform",
            Self::LogNormal(_) => "lognormal",
            Self::CappedLogNormal(_) => "capped_lognormal",
            Self::FileBased(_) => "file_based",
        }
    }
}

impl From<Fixed> for DelayDistribution {
    fn from(d: Fixed) -> Self {
        Self::Fixed(d)
    }
}

impl From<Uniform> for DelayDistribution {
    fn from(d: Uniform) -> Self {
        Self::Uniform(d)
    }
}

impl From<LogNormal> for DelayDistribution {
    fn from(d: LogNormal) -> Self {
        Self::LogNormal(d)
    }
}

impl From<CappedLogNormal> for DelayDistribution {
    fn from(d: CappedLogNormal) -> Self {
        Self::CappedLogNormal(d)
    }
}

impl From<FileBased> for DelayDistribution {
    fn from(d: FileBased) -> Self {
        Self::FileBased(d)
    }
}

impl<'de> Deserialize<'de> for DelayDistribution {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        DescriptorTable::standard()
            .parse(value)
            .map_err(serde::de::Error::custom)
    }
}
