//! Log-normal delay distributions
//!
//! Response times of real services are rarely symmetric: most requests finish close
//! to a typical value while a few take much longer. A log-normal distribution models
//! this long tail with two parameters:
//!
//! - **median**: the 50th percentile delay in milliseconds
//! - **sigma**: standard deviation of the underlying normal distribution; a larger
//!   value produces a longer tail
//!
//! [`CappedLogNormal`] adds a hard upper bound. Samples above the cap are redrawn
//! up to [`CAPPED_RESAMPLE_LIMIT`] times, which keeps the shape of the distribution
//! below the cap intact instead of piling probability mass onto the boundary. If the
//! last draw is still above the cap it is clamped, so sampling always terminates
//! after at most `CAPPED_RESAMPLE_LIMIT + 1` draws.
//!
//! # Example
//!
//! ```
//! use stubdelay::distribution::{Sampler, lognormal::CappedLogNormal};
//!
//! let dist = CappedLogNormal::new(90.0, 0.1, 150.0).unwrap();
//! let delay = dist.sample_millis(&mut rand::thread_rng());
//! assert!(delay <= 150);
//! ```

use super::Sampler;
use crate::{Error, Result};
use rand::RngCore;
use rand_distr::{Distribution as _, StandardNormal};
use serde::Serialize;

/// Number of extra draws a capped log-normal makes before clamping to the cap.
///
/// Fixed policy, not configurable.
pub const CAPPED_RESAMPLE_LIMIT: usize = 10;

/// Log-normal delay distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogNormal {
    median_millis: f64,
    sigma: f64,
}

impl LogNormal {
    /// Create a log-normal distribution
    ///
    /// # Arguments
    ///
    /// * `median_millis` - 50th percentile in milliseconds (finite, > 0)
    /// * `sigma` - standard deviation of the underlying normal (finite, >= 0)
    pub fn new(median_millis: f64, sigma: f64) -> Result<Self> {
        if !median_millis.is_finite() || median_millis <= 0.0 {
            return Err(Error::invalid(format!(
                "lognormal medianMillis must be a positive number, got {}",
                median_millis
            )));
        }
        if !sigma.is_finite() || sigma < 0.0 {
            return Err(Error::invalid(format!(
                "lognormal sigma must be a non-negative number, got {}",
                sigma
            )));
        }

        Ok(Self {
            median_millis,
            sigma,
        })
    }

    pub fn median_millis(&self) -> f64 {
        self.median_millis
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}

impl Sampler for LogNormal {
    fn sample_millis(&self, rng: &mut dyn RngCore) -> u64 {
        let z: f64 = StandardNormal.sample(rng);
        let value = (self.median_millis.ln() + self.sigma * z).exp();

        // exp() is positive; the cast saturates on overflow
        value.round() as u64
    }
}

/// Log-normal delay distribution with an upper bound
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CappedLogNormal {
    #[serde(flatten)]
    base: LogNormal,
    max_value_millis: f64,
}

impl CappedLogNormal {
    /// Create a capped log-normal distribution
    ///
    /// Fails with [`Error::InvalidConfiguration`] if the log-normal parameters are
    /// invalid or `max_value_millis` is below `median_millis`.
    pub fn new(median_millis: f64, sigma: f64, max_value_millis: f64) -> Result<Self> {
        let base = LogNormal::new(median_millis, sigma)?;

        if !max_value_millis.is_finite() || max_value_millis < median_millis {
            return Err(Error::invalid(format!(
                "capped_lognormal maxValueMillis ({}) has to be at least the medianMillis ({})",
                max_value_millis, median_millis
            )));
        }

        Ok(Self {
            base,
            max_value_millis,
        })
    }

    pub fn median_millis(&self) -> f64 {
        self.base.median_millis()
    }

    pub fn sigma(&self) -> f64 {
        self.base.sigma()
    }

    pub fn max_value_millis(&self) -> f64 {
        self.max_value_millis
    }

    fn exceeds_cap(&self, value: u64) -> bool {
        value as f64 > self.max_value_millis
    }
}

impl Sampler for CappedLogNormal {
    fn sample_millis(&self, rng: &mut dyn RngCore) -> u64 {
        let mut value = self.base.sample_millis(rng);

        let mut retries = 0;
        while self.exceeds_cap(value) && retries < CAPPED_RESAMPLE_LIMIT {
            value = self.base.sample_millis(rng);
            retries += 1;
        }

        if self.exceeds_cap(value) {
            // Floor keeps a fractional cap from being rounded past
            value = self.max_value_millis.floor() as u64;
        }

        value
    }
}
