//! Empirical delay statistics
//!
//! Samples a distribution repeatedly and summarizes the result, which is how the
//! CLI shows what a configured distribution will actually produce.
//!
//! # Example
//!
//! ```
//! use stubdelay::distribution::{DelayDistribution, fixed::Fixed};
//! use stubdelay::registry::DistributionRegistry;
//! use stubdelay::stats::DelaySummary;
//!
//! let registry = DistributionRegistry::new();
//! let dist = DelayDistribution::from(Fixed::new(50));
//! let summary = DelaySummary::collect(&dist, &registry, &mut rand::thread_rng(), 100).unwrap();
//!
//! assert_eq!(summary.count, 100);
//! assert_eq!(summary.p50, 50);
//! ```

pub mod histogram;

use crate::distribution::DelayDistribution;
use crate::registry::DistributionRegistry;
use crate::Result;
use histogram::DelayHistogram;
use rand::RngCore;
use serde::Serialize;
use std::fmt;

/// Summary of sampled delays, all values in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DelaySummary {
    pub count: u64,
    pub min: u64,
    pub max: u64,
    pub mean: f64,
    pub stddev: f64,
    pub p50: u64,
    pub p90: u64,
    pub p99: u64,
    pub p999: u64,
}

impl DelaySummary {
    /// Sample `distribution` `count` times and summarize.
    ///
    /// Stops at the first sampling failure (a file based key that does not resolve).
    pub fn collect(
        distribution: &DelayDistribution,
        registry: &DistributionRegistry,
        rng: &mut dyn RngCore,
        count: u64,
    ) -> Result<Self> {
        let mut hist = DelayHistogram::new();
        for _ in 0..count {
            hist.record(distribution.sample(registry, rng)?);
        }
        Ok(Self::from_histogram(&hist))
    }

    /// Summarize a histogram; an empty histogram gives an all-zero summary.
    pub fn from_histogram(hist: &DelayHistogram) -> Self {
        Self {
            count: hist.len(),
            min: hist.min().unwrap_or(0),
            max: hist.max().unwrap_or(0),
            mean: hist.mean().unwrap_or(0.0),
            stddev: hist.stddev().unwrap_or(0.0),
            p50: hist.percentile(50.0).unwrap_or(0),
            p90: hist.percentile(90.0).unwrap_or(0),
            p99: hist.percentile(99.0).unwrap_or(0),
            p999: hist.percentile(99.9).unwrap_or(0),
        }
    }
}

impl fmt::Display for DelaySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Samples:  {}", self.count)?;
        writeln!(f, "Min:      {} ms", self.min)?;
        writeln!(f, "Mean:     {:.2} ms (stddev {:.2})", self.mean, self.stddev)?;
        writeln!(f, "p50:      {} ms", self.p50)?;
        writeln!(f, "p90:      {} ms", self.p90)?;
        writeln!(f, "p99:      {} ms", self.p99)?;
        writeln!(f, "p99.9:    {} ms", self.p999)?;
        write!(f, "Max:      {} ms", self.max)
    }
}
