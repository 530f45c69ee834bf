// Shared test helpers

use kubemetrics::models::{CaptureTarget, Hardware, RawSample};

pub fn hardware(cpu_total_cores: Option<u32>, memory_mb: Option<u64>) -> Hardware {
    Hardware {
        cpu_total_cores,
        memory_mb,
    }
}

/// A collectible 2-core / 2048 MB node named "node" with ems_ref "target".
pub fn node_target() -> CaptureTarget {
    CaptureTarget::node(
        "node",
        "target",
        Some("ems".into()),
        hardware(Some(2), Some(2048)),
    )
}

/// A collectible container in pod group "group" with ems_ref "target".
pub fn container_target() -> CaptureTarget {
    CaptureTarget::container(
        "container",
        "target",
        "group",
        Some("ems".into()),
        hardware(Some(2), Some(2048)),
    )
}

pub fn samples(windows: &[(i64, i64, f64)]) -> Vec<RawSample> {
    windows
        .iter()
        .map(|&(start, end, min)| RawSample::new(start, end, min))
        .collect()
}
