// Worker integration test: spawn collector + emitter channel, first tick,
// shutdown

mod common;

use std::collections::HashMap;
use std::sync::Arc;

use common::{node_target, samples};
use kubemetrics::capture::{CaptureContext, MetricsCapture};
use kubemetrics::models::RawSample;
use kubemetrics::worker::{WorkerConfig, WorkerDeps, spawn};

const T0_MS: i64 = 1_446_500_000_000;
const MINUTE_MS: i64 = 60_000;

struct FixtureContext {
    counters: HashMap<String, Vec<RawSample>>,
    gauges: HashMap<String, Vec<RawSample>>,
}

impl FixtureContext {
    fn node_fixture() -> Self {
        let window = |delta: f64| {
            samples(&[
                (T0_MS, T0_MS + MINUTE_MS, 0.0),
                (T0_MS + MINUTE_MS, T0_MS + 2 * MINUTE_MS, delta),
            ])
        };
        let counters = HashMap::from([
            ("machine/node/cpu/usage".into(), window(12_000_000_000.0)),
            ("machine/node/network/tx".into(), window(460_800.0)),
            ("machine/node/network/rx".into(), window(153_600.0)),
        ]);
        let gauges = HashMap::from([(
            "machine/node/memory/usage".into(),
            samples(&[(T0_MS, T0_MS + MINUTE_MS, 1_073_741_824.0)]),
        )]);
        Self { counters, gauges }
    }
}

impl CaptureContext for FixtureContext {
    async fn fetch_counters_data(&self, metric_id: &str) -> anyhow::Result<Vec<RawSample>> {
        Ok(self.counters.get(metric_id).cloned().unwrap_or_default())
    }

    async fn fetch_gauges_data(&self, metric_id: &str) -> anyhow::Result<Vec<RawSample>> {
        Ok(self.gauges.get(metric_id).cloned().unwrap_or_default())
    }
}

#[tokio::test]
async fn worker_collects_and_emits_on_first_tick() {
    let capture = Arc::new(MetricsCapture::new(FixtureContext::node_fixture()));
    let (emit_tx, mut emit_rx) = tokio::sync::mpsc::channel(16);
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let handle = spawn(
        WorkerDeps {
            capture,
            targets: vec![node_target()],
            emit_tx,
            shutdown_rx,
        },
        WorkerConfig {
            interval_name: "realtime".into(),
            interval_secs: 3600,
            stats_log_interval_secs: 3600,
        },
    );

    // The first interval tick fires immediately
    let result = tokio::time::timeout(std::time::Duration::from_secs(5), emit_rx.recv())
        .await
        .expect("worker should emit within the timeout")
        .expect("channel should stay open while the worker runs");

    assert_eq!(result.interval_name, "realtime");
    assert_eq!(result.ems_ref, "target");
    assert_eq!(result.metrics.len(), 1);

    let _ = shutdown_tx.send(());
    handle.await.unwrap();
}

#[tokio::test]
async fn worker_shuts_down_and_closes_emitter_channel() {
    let capture = Arc::new(MetricsCapture::new(FixtureContext::node_fixture()));
    let (emit_tx, mut emit_rx) = tokio::sync::mpsc::channel(16);
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let handle = spawn(
        WorkerDeps {
            capture,
            targets: vec![],
            emit_tx,
            shutdown_rx,
        },
        WorkerConfig {
            interval_name: "realtime".into(),
            interval_secs: 3600,
            stats_log_interval_secs: 3600,
        },
    );

    let _ = shutdown_tx.send(());
    handle.await.unwrap();

    // Worker dropped its sender; the emitter side sees a closed channel
    assert!(emit_rx.recv().await.is_none());
}
