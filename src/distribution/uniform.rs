//! Uniform delay distribution
//!
//! Bounds are non-negative milliseconds and may be fractional. Samples are whole
//! milliseconds: every integer in `[ceil(lower), floor(upper)]` is equally likely.
//! When that integer range is empty (both bounds inside the same millisecond) a
//! continuous draw over `[lower, upper]` is rounded to the nearest millisecond.
//!
//! # Example
//!
//! ```
//! use stubdelay::distribution::{Sampler, uniform::Uniform};
//!
//! let dist = Uniform::new(20.0, 40.0).unwrap();
//! let mut rng = rand::thread_rng();
//!
//! for _ in 0..10 {
//!     let delay = dist.sample_millis(&mut rng);
//!     assert!((20..=40).contains(&delay));
//! }
//! ```

use super::Sampler;
use crate::{Error, Result};
use rand::{Rng, RngCore};
use serde::Serialize;

/// Uniform delay distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Uniform {
    lower_millis: f64,
    upper_millis: f64,
}

impl Uniform {
    /// Create a uniform distribution over `[lower_millis, upper_millis]`
    ///
    /// Fails with [`Error::InvalidConfiguration`] if either bound is negative or not
    /// finite, or if `lower_millis > upper_millis`.
    pub fn new(lower_millis: f64, upper_millis: f64) -> Result<Self> {
        for (field, value) in [("lowerMillis", lower_millis), ("upperMillis", upper_millis)] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::invalid(format!(
                    "uniform {} must be a finite non-negative number, got {}",
                    field, value
                )));
            }
        }

        if lower_millis > upper_millis {
            return Err(Error::invalid(format!(
                "uniform lowerMillis ({}) must not exceed upperMillis ({})",
                lower_millis, upper_millis
            )));
        }

        Ok(Self {
            lower_millis,
            upper_millis,
        })
    }

    pub fn lower_millis(&self) -> f64 {
        self.lower_millis
    }

    pub fn upper_millis(&self) -> f64 {
        self.upper_millis
    }
}

impl Sampler for Uniform {
    #[inline(always)]
    fn sample_millis(&self, rng: &mut dyn RngCore) -> u64 {
        let lo = self.lower_millis.ceil();
        let hi = self.upper_millis.floor();
        if lo <= hi {
            rng.gen_range(lo as u64..=hi as u64)
        } else {
            rng.gen_range(self.lower_millis..=self.upper_millis).round() as u64
        }
    }
}
