use serde::Deserialize;

use crate::models::{CaptureTarget, Hardware};

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub collection: CollectionConfig,
    pub monitoring: MonitoringConfig,
    #[serde(default)]
    pub targets: Vec<TargetConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the metrics backend, e.g. "http://hawkular:8080/hawkular/metrics".
    pub endpoint: String,
    /// Optional tenant header sent with every request.
    pub tenant: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// How far back each fetch queries, in seconds.
    #[serde(default = "default_lookback_secs")]
    pub lookback_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_lookback_secs() -> u64 {
    300
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionConfig {
    /// Opaque scheduling label passed through to collection results.
    #[serde(default = "default_interval_name")]
    pub interval_name: String,
    /// Width of the time bucket raw samples are aligned to.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

fn default_interval_name() -> String {
    "realtime".into()
}

fn default_interval_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    /// How often to log app stats (collections ok/failed) at INFO level.
    pub stats_log_interval_secs: u64,
}

/// One statically configured collection target. Capacity fields may be
/// absent; such targets fail validation at collection time rather than at
/// startup, matching inventory that has not refreshed yet.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TargetConfig {
    Node {
        name: String,
        ems_ref: String,
        cpu_total_cores: Option<u32>,
        memory_mb: Option<u64>,
    },
    Container {
        name: String,
        ems_ref: String,
        group_ref: String,
        cpu_total_cores: Option<u32>,
        memory_mb: Option<u64>,
    },
}

impl TargetConfig {
    fn name(&self) -> &str {
        match self {
            TargetConfig::Node { name, .. } | TargetConfig::Container { name, .. } => name,
        }
    }

    /// Builds the runtime target; `ems_id` identifies the management-system
    /// connection the agent is configured against.
    pub fn to_target(&self, ems_id: &str) -> CaptureTarget {
        match self {
            TargetConfig::Node {
                name,
                ems_ref,
                cpu_total_cores,
                memory_mb,
            } => CaptureTarget::node(
                name.clone(),
                ems_ref.clone(),
                Some(ems_id.to_string()),
                Hardware {
                    cpu_total_cores: *cpu_total_cores,
                    memory_mb: *memory_mb,
                },
            ),
            TargetConfig::Container {
                name,
                ems_ref,
                group_ref,
                cpu_total_cores,
                memory_mb,
            } => CaptureTarget::container(
                name.clone(),
                ems_ref.clone(),
                group_ref.clone(),
                Some(ems_id.to_string()),
                Hardware {
                    cpu_total_cores: *cpu_total_cores,
                    memory_mb: *memory_mb,
                },
            ),
        }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.backend.endpoint.is_empty(),
            "backend.endpoint must be non-empty"
        );
        anyhow::ensure!(
            self.backend.request_timeout_secs > 0,
            "backend.request_timeout_secs must be > 0, got {}",
            self.backend.request_timeout_secs
        );
        anyhow::ensure!(
            self.backend.lookback_secs > 0,
            "backend.lookback_secs must be > 0, got {}",
            self.backend.lookback_secs
        );
        anyhow::ensure!(
            !self.collection.interval_name.is_empty(),
            "collection.interval_name must be non-empty"
        );
        anyhow::ensure!(
            self.collection.interval_secs > 0,
            "collection.interval_secs must be > 0, got {}",
            self.collection.interval_secs
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        for target in &self.targets {
            anyhow::ensure!(!target.name().is_empty(), "targets: name must be non-empty");
            match target {
                TargetConfig::Node { ems_ref, .. } => {
                    anyhow::ensure!(
                        !ems_ref.is_empty(),
                        "targets: ems_ref must be non-empty for node {}",
                        target.name()
                    );
                }
                TargetConfig::Container {
                    ems_ref, group_ref, ..
                } => {
                    anyhow::ensure!(
                        !ems_ref.is_empty(),
                        "targets: ems_ref must be non-empty for container {}",
                        target.name()
                    );
                    anyhow::ensure!(
                        !group_ref.is_empty(),
                        "targets: group_ref must be non-empty for container {}",
                        target.name()
                    );
                }
            }
        }
        Ok(())
    }
}
