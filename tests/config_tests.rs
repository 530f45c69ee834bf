// Config parsing and validation tests

use kubemetrics::config::{AppConfig, TargetConfig};
use kubemetrics::models::TargetKind;

const SAMPLE: &str = r#"
[backend]
endpoint = "http://hawkular:8080/hawkular/metrics"
tenant = "ops"

[collection]
interval_name = "realtime"
interval_secs = 60

[monitoring]
stats_log_interval_secs = 300

[[targets]]
kind = "node"
name = "node1"
ems_ref = "n-1"
cpu_total_cores = 2
memory_mb = 2048

[[targets]]
kind = "container"
name = "web"
ems_ref = "c-1"
group_ref = "g-1"
cpu_total_cores = 1
memory_mb = 512
"#;

#[test]
fn parses_full_config() {
    let config = AppConfig::load_from_str(SAMPLE).unwrap();
    assert_eq!(config.backend.endpoint, "http://hawkular:8080/hawkular/metrics");
    assert_eq!(config.backend.tenant.as_deref(), Some("ops"));
    assert_eq!(config.collection.interval_name, "realtime");
    assert_eq!(config.collection.interval_secs, 60);
    assert_eq!(config.targets.len(), 2);
}

#[test]
fn applies_defaults_for_omitted_fields() {
    let config = AppConfig::load_from_str(
        r#"
[backend]
endpoint = "http://hawkular:8080/hawkular/metrics"

[collection]

[monitoring]
stats_log_interval_secs = 300
"#,
    )
    .unwrap();
    assert_eq!(config.backend.request_timeout_secs, 30);
    assert_eq!(config.backend.lookback_secs, 300);
    assert_eq!(config.collection.interval_name, "realtime");
    assert_eq!(config.collection.interval_secs, 60);
    assert!(config.targets.is_empty());
}

#[test]
fn rejects_empty_endpoint() {
    let err = AppConfig::load_from_str(
        r#"
[backend]
endpoint = ""

[collection]

[monitoring]
stats_log_interval_secs = 300
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("backend.endpoint"));
}

#[test]
fn rejects_zero_interval() {
    let err = AppConfig::load_from_str(
        r#"
[backend]
endpoint = "http://hawkular:8080/hawkular/metrics"

[collection]
interval_secs = 0

[monitoring]
stats_log_interval_secs = 300
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("collection.interval_secs"));
}

#[test]
fn rejects_container_without_group_ref() {
    // group_ref is a required field for container targets
    let result = AppConfig::load_from_str(
        r#"
[backend]
endpoint = "http://hawkular:8080/hawkular/metrics"

[collection]

[monitoring]
stats_log_interval_secs = 300

[[targets]]
kind = "container"
name = "web"
ems_ref = "c-1"
"#,
    );
    assert!(result.is_err());
}

#[test]
fn builds_runtime_targets_from_config() {
    let config = AppConfig::load_from_str(SAMPLE).unwrap();

    let node = config.targets[0].to_target("ems-1");
    assert_eq!(node.name, "node1");
    assert_eq!(node.ems_ref, "n-1");
    assert_eq!(node.ems_id.as_deref(), Some("ems-1"));
    assert_eq!(node.kind, TargetKind::Node);
    assert_eq!(node.hardware.cpu_total_cores, Some(2));
    assert_eq!(node.hardware.memory_mb, Some(2048));

    let container = config.targets[1].to_target("ems-1");
    assert_eq!(
        container.kind,
        TargetKind::Container {
            group_ref: "g-1".into()
        }
    );
    assert!(matches!(config.targets[1], TargetConfig::Container { .. }));
}
