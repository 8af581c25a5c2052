use super::models::ProbeResult;
use async_trait::async_trait;

/// A single dependency that can report whether it is reachable right now.
///
/// Implementations own their timeouts and retry policy. Failures are never returned
/// as errors: anything that goes wrong is reported as a DOWN [`ProbeResult`] with the
/// cause in its detail.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn check(&self) -> ProbeResult;
}
