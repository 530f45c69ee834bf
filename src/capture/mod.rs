// Capture orchestration: validate the target, fetch its applicable series,
// normalize into per-interval rows.

mod context;
mod hawkular;
pub mod normalize;
mod validate;

pub use context::CaptureContext;
pub use hawkular::HawkularContext;
pub use normalize::Capacity;
pub use validate::{TargetValidationError, validate_target};

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;
use tracing::instrument;

use crate::models::{
    CPU_USAGE_RATE_AVERAGE, CaptureTarget, MEM_USAGE_ABSOLUTE_AVERAGE, NET_USAGE_RATE_AVERAGE,
    RawSample, TargetKind, TimestampedMetrics,
};

/// Metrics reported for a node.
pub const NODE_METRICS: &[&str] = &[
    CPU_USAGE_RATE_AVERAGE,
    MEM_USAGE_ABSOLUTE_AVERAGE,
    NET_USAGE_RATE_AVERAGE,
];

/// Metrics reported for a container. No network: a container's network
/// namespace is owned by its node/pod, so the metric would be misleading.
pub const CONTAINER_METRICS: &[&str] = &[CPU_USAGE_RATE_AVERAGE, MEM_USAGE_ABSOLUTE_AVERAGE];

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error(transparent)]
    Validation(#[from] TargetValidationError),
    #[error("metrics fetch failed for target {target}")]
    Fetch {
        target: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Composes validation, fetching, and normalization. Stateless per call;
/// safe to share across concurrent per-entity collections.
pub struct MetricsCapture<C> {
    context: C,
}

impl<C: CaptureContext> MetricsCapture<C> {
    pub fn new(context: C) -> Self {
        Self { context }
    }

    /// Collects one target. Validation failures propagate before any fetch;
    /// a fetch failure yields no partial output. Returns the interval name
    /// unchanged alongside `{ems_ref -> metrics}` so the caller can
    /// correlate the response with its request.
    #[instrument(skip(self, target), fields(target_name = %target.name, interval = interval_name))]
    pub async fn perf_collect_metrics(
        &self,
        target: &CaptureTarget,
        interval_name: &str,
    ) -> Result<(String, HashMap<String, TimestampedMetrics>), CaptureError> {
        let capacity = validate_target(target)?;

        let (prefix, metrics) = match &target.kind {
            TargetKind::Node => (format!("machine/{}", target.name), NODE_METRICS),
            TargetKind::Container { group_ref } => {
                (format!("container/{group_ref}"), CONTAINER_METRICS)
            }
        };
        let fetch_err = |source| CaptureError::Fetch {
            target: target.name.clone(),
            source,
        };

        let mut counters: BTreeMap<String, Vec<RawSample>> = BTreeMap::new();
        let cpu_id = format!("{prefix}/{}", normalize::CPU_USAGE_SUFFIX);
        if metrics.contains(&NET_USAGE_RATE_AVERAGE) {
            let tx_id = format!("{prefix}/{}", normalize::NETWORK_TX_SUFFIX);
            let rx_id = format!("{prefix}/{}", normalize::NETWORK_RX_SUFFIX);
            let (cpu, tx, rx) = tokio::try_join!(
                self.context.fetch_counters_data(&cpu_id),
                self.context.fetch_counters_data(&tx_id),
                self.context.fetch_counters_data(&rx_id),
            )
            .map_err(fetch_err)?;
            counters.insert(cpu_id, cpu);
            counters.insert(tx_id, tx);
            counters.insert(rx_id, rx);
        } else {
            let cpu = self
                .context
                .fetch_counters_data(&cpu_id)
                .await
                .map_err(fetch_err)?;
            counters.insert(cpu_id, cpu);
        }

        let mem_id = format!("{prefix}/{}", normalize::MEMORY_USAGE_SUFFIX);
        let mem = self
            .context
            .fetch_gauges_data(&mem_id)
            .await
            .map_err(fetch_err)?;
        let gauges = BTreeMap::from([(mem_id, mem)]);

        let values = normalize::normalize(&counters, &gauges, &capacity, metrics);
        tracing::debug!(rows = values.len(), "normalized metrics");

        Ok((
            interval_name.to_string(),
            HashMap::from([(target.ems_ref.clone(), values)]),
        ))
    }
}
