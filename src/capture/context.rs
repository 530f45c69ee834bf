// Sample-fetcher seam to the metrics backend

use std::future::Future;

use crate::models::RawSample;

/// Fetches raw sample lists for one entity-scoped metric id (e.g.
/// `machine/node1/cpu/usage`). Network I/O, timeouts, and cancellation live
/// behind this trait; the capture core only propagates its failures. Tests
/// substitute a deterministic in-memory implementation.
pub trait CaptureContext: Send + Sync {
    /// Cumulative counter series (requires rate derivation downstream).
    fn fetch_counters_data(
        &self,
        metric_id: &str,
    ) -> impl Future<Output = anyhow::Result<Vec<RawSample>>> + Send;

    /// Instantaneous gauge series (used as-is downstream).
    fn fetch_gauges_data(
        &self,
        metric_id: &str,
    ) -> impl Future<Output = anyhow::Result<Vec<RawSample>>> + Send;
}
