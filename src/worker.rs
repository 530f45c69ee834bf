// Background collection worker: runs perf_collect_metrics for each
// configured target on every interval tick. Emission runs in a dedicated
// task (channel); the host platform persists what the emitter writes.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Duration, interval};
use tracing::{info, warn};

use crate::capture::{CaptureContext, MetricsCapture};
use crate::models::{CaptureTarget, TimestampedMetrics};

/// One collection result crossing the host-platform boundary.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionResult {
    pub interval_name: String,
    pub ems_ref: String,
    pub metrics: TimestampedMetrics,
}

/// Channel capacity for the emitter (backpressure if it falls behind).
pub fn emitter_channel_capacity(target_count: usize) -> usize {
    (target_count * 2).max(16)
}

/// Capture pipeline, targets, channels, and shutdown for the worker.
pub struct WorkerDeps<C> {
    pub capture: Arc<MetricsCapture<C>>,
    pub targets: Vec<CaptureTarget>,
    pub emit_tx: mpsc::Sender<CollectionResult>,
    pub shutdown_rx: oneshot::Receiver<()>,
}

pub struct WorkerConfig {
    pub interval_name: String,
    pub interval_secs: u64,
    /// How often to log app stats (real seconds).
    pub stats_log_interval_secs: u64,
}

/// Spawns the task that receives collection results and writes them as JSON
/// lines on stdout. Exits when all senders are dropped.
pub fn spawn_emitter(mut emit_rx: mpsc::Receiver<CollectionResult>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(result) = emit_rx.recv().await {
            match serde_json::to_string(&result) {
                Ok(line) => println!("{line}"),
                Err(e) => warn!(error = %e, ems_ref = %result.ems_ref, "emitter: serialize failed"),
            }
        }
        tracing::debug!("Emitter shutting down");
    })
}

pub fn spawn<C: CaptureContext + 'static>(
    deps: WorkerDeps<C>,
    config: WorkerConfig,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        run(deps, config).await;
    })
}

async fn run<C: CaptureContext>(deps: WorkerDeps<C>, config: WorkerConfig) {
    let WorkerDeps {
        capture,
        targets,
        emit_tx,
        mut shutdown_rx,
    } = deps;

    let mut tick = interval(Duration::from_secs(config.interval_secs));
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut stats_log_tick = interval(Duration::from_secs(config.stats_log_interval_secs));
    stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let mut collections_ok: u64 = 0;
    let mut collections_failed: u64 = 0;

    loop {
        tokio::select! {
            _ = tick.tick() => {
                for target in &targets {
                    match capture.perf_collect_metrics(target, &config.interval_name).await {
                        Ok((interval_name, values_by_ref)) => {
                            collections_ok += 1;
                            for (ems_ref, metrics) in values_by_ref {
                                let result = CollectionResult { interval_name: interval_name.clone(), ems_ref, metrics };
                                if emit_tx.send(result).await.is_err() {
                                    tracing::debug!("Emitter channel closed");
                                    return;
                                }
                            }
                        }
                        Err(e) => {
                            collections_failed += 1;
                            warn!(
                                error = %e,
                                target = %target.name,
                                operation = "perf_collect_metrics",
                                "collection failed"
                            );
                        }
                    }
                }
            }
            _ = &mut shutdown_rx => {
                tracing::debug!("Worker shutting down");
                break;
            }
            _ = stats_log_tick.tick() => {
                info!(
                    targets = targets.len(),
                    collections_ok = collections_ok,
                    collections_failed = collections_failed,
                    "app stats"
                );
            }
        }
    }
}
