//! Startup consistency check
//!
//! Verifies that every file based delay referenced by a request mapping resolves to
//! a key defined in the [`DistributionRegistry`], so a misconfigured key fails the
//! server at startup instead of failing the first matching request.

use crate::distribution::DelayDistribution;
use crate::registry::DistributionRegistry;
use crate::{Error, Result};
use std::collections::BTreeSet;

/// A request mapping as seen by the consistency check
pub trait RequestMapping {
    /// The delay configured for responses to this mapping, if any.
    fn delay_distribution(&self) -> Option<&DelayDistribution>;
}

impl RequestMapping for DelayDistribution {
    fn delay_distribution(&self) -> Option<&DelayDistribution> {
        Some(self)
    }
}

impl<T: RequestMapping> RequestMapping for Option<T> {
    fn delay_distribution(&self) -> Option<&DelayDistribution> {
        self.as_ref().and_then(T::delay_distribution)
    }
}

/// Checks request mappings against a registry
#[derive(Debug, Clone, Copy)]
pub struct ConsistencyChecker<'a> {
    registry: &'a DistributionRegistry,
}

impl<'a> ConsistencyChecker<'a> {
    pub fn new(registry: &'a DistributionRegistry) -> Self {
        Self { registry }
    }

    /// Keys referenced by `mappings` that the registry does not define, sorted and
    /// deduplicated.
    pub fn missing_keys<'m, M, I>(&self, mappings: I) -> Vec<String>
    where
        M: RequestMapping + ?Sized + 'm,
        I: IntoIterator<Item = &'m M>,
    {
        let mut missing = BTreeSet::new();
        let mut referenced = 0usize;

        for mapping in mappings {
            let Some(key) = mapping
                .delay_distribution()
                .and_then(DelayDistribution::file_based_key)
            else {
                continue;
            };

            referenced += 1;
            if !self.registry.contains(key) {
                missing.insert(key.to_string());
            }
        }

        tracing::debug!(
            referenced,
            missing = missing.len(),
            "checked file based distribution references"
        );

        missing.into_iter().collect()
    }

    /// Fail with a single [`Error::MissingKeys`] listing every unresolved key.
    pub fn check<'m, M, I>(&self, mappings: I) -> Result<()>
    where
        M: RequestMapping + ?Sized + 'm,
        I: IntoIterator<Item = &'m M>,
    {
        let keys = self.missing_keys(mappings);
        if keys.is_empty() {
            return Ok(());
        }

        tracing::warn!(missing = ?keys, "mappings reference undefined distribution keys");
        Err(Error::MissingKeys { keys })
    }
}

/// Convenience wrapper for [`ConsistencyChecker::check`].
pub fn check_distributions<'m, M, I>(registry: &DistributionRegistry, mappings: I) -> Result<()>
where
    M: RequestMapping + ?Sized + 'm,
    I: IntoIterator<Item = &'m M>,
{
    ConsistencyChecker::new(registry).check(mappings)
}
