//! Delay histogram using HdrHistogram
//!
//! Records sampled delays in whole milliseconds from 0 up to one hour with 3
//! significant digits of precision. Values above the range are clamped to the
//! highest trackable value.
//!
//! # Example
//!
//! ```
//! use stubdelay::stats::histogram::DelayHistogram;
//!
//! let mut hist = DelayHistogram::new();
//! hist.record(90);
//! hist.record(110);
//!
//! assert_eq!(hist.len(), 2);
//! assert_eq!(hist.max(), Some(110));
//! ```

use hdrhistogram::Histogram;

/// Highest trackable delay: one hour in milliseconds
pub const MAX_TRACKABLE_MILLIS: u64 = 3_600_000;

/// Millisecond delay histogram
#[derive(Debug, Clone)]
pub struct DelayHistogram {
    histogram: Histogram<u64>,
}

impl DelayHistogram {
    pub fn new() -> Self {
        let histogram = Histogram::new_with_bounds(1, MAX_TRACKABLE_MILLIS, 3)
            .expect("Failed to create histogram with valid bounds");

        Self { histogram }
    }

    /// Record one delay sample in milliseconds
    #[inline]
    pub fn record(&mut self, delay_millis: u64) {
        self.histogram.saturating_record(delay_millis);
    }

    /// Delay at `percentile` (0.0 - 100.0), or None if empty
    pub fn percentile(&self, percentile: f64) -> Option<u64> {
        if self.is_empty() {
            return None;
        }
        Some(self.histogram.value_at_percentile(percentile))
    }

    pub fn min(&self) -> Option<u64> {
        if self.is_empty() {
            return None;
        }
        Some(self.histogram.min())
    }

    pub fn max(&self) -> Option<u64> {
        if self.is_empty() {
            return None;
        }
        Some(self.histogram.max())
    }

    pub fn mean(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        Some(self.histogram.mean())
    }

    pub fn stddev(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        Some(self.histogram.stdev())
    }

    pub fn len(&self) -> u64 {
        self.histogram.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histogram.len() == 0
    }

    pub fn reset(&mut self) {
        self.histogram.reset();
    }
}

impl Default for DelayHistogram {
    fn default() -> Self {
        Self::new()
    }
}
