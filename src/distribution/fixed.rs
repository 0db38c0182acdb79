//! Fixed delay
//!
//! Always returns the configured number of milliseconds.

use super::Sampler;
use rand::RngCore;
use serde::Serialize;

/// Constant delay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixed {
    delay_millis: u64,
}

impl Fixed {
    pub fn new(delay_millis: u64) -> Self {
        Self { delay_millis }
    }

    pub fn delay_millis(&self) -> u64 {
        self.delay_millis
    }
}

impl Sampler for Fixed {
    #[inline(always)]
    fn sample_millis(&self, _rng: &mut dyn RngCore) -> u64 {
        self.delay_millis
    }
}
