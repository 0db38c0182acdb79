//! Applying a sampled delay to a response

use crate::distribution::DelayDistribution;
use crate::registry::DistributionRegistry;
use crate::Result;
use std::time::Duration;

/// Sample `distribution` once and sleep for the result.
///
/// Returns the applied delay. A zero sample returns immediately; a lookup failure
/// is returned before any sleeping so the caller can answer with a server error.
pub async fn delay_response(
    distribution: &DelayDistribution,
    registry: &DistributionRegistry,
) -> Result<Duration> {
    let delay = Duration::from_millis(distribution.sample_millis(registry)?);

    if !delay.is_zero() {
        tracing::trace!(delay_ms = delay.as_millis() as u64, "delaying response");
        tokio::time::sleep(delay).await;
    }

    Ok(delay)
}

/// Apply the delay of an optional distribution; no distribution means no delay.
pub async fn delay_response_opt(
    distribution: Option<&DelayDistribution>,
    registry: &DistributionRegistry,
) -> Result<Duration> {
    match distribution {
        Some(distribution) => delay_response(distribution, registry).await,
        None => Ok(Duration::ZERO),
    }
}
