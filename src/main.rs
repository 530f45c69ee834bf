use anyhow::Result;
use kubemetrics::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let app_config = config::AppConfig::load()?;
    tracing::info!(
        version = version::VERSION,
        endpoint = %app_config.backend.endpoint,
        "starting {}",
        version::NAME
    );

    let context = capture::HawkularContext::new(
        &app_config.backend,
        app_config.collection.interval_secs,
    )?;
    let capture = Arc::new(capture::MetricsCapture::new(context));

    let targets: Vec<_> = app_config
        .targets
        .iter()
        .map(|t| t.to_target(&app_config.backend.endpoint))
        .collect();
    if targets.is_empty() {
        tracing::warn!("no targets configured; nothing to collect");
    }

    let (emit_tx, emit_rx) =
        tokio::sync::mpsc::channel(worker::emitter_channel_capacity(targets.len()));
    let emitter_handle = worker::spawn_emitter(emit_rx);

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let worker_handle = worker::spawn(
        worker::WorkerDeps {
            capture,
            targets,
            emit_tx,
            shutdown_rx,
        },
        worker::WorkerConfig {
            interval_name: app_config.collection.interval_name.clone(),
            interval_secs: app_config.collection.interval_secs,
            stats_log_interval_secs: app_config.monitoring.stats_log_interval_secs,
        },
    );

    shutdown_signal().await;
    tracing::info!("Received shutdown signal");
    let _ = shutdown_tx.send(());
    let _ = worker_handle.await;
    let _ = emitter_handle.await;

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
