// Capture-target entity model (node or container)

use serde::Deserialize;

/// Hardware capacity reported for a target. Either field may be unknown
/// when inventory has not refreshed yet; validation rejects such targets.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Hardware {
    pub cpu_total_cores: Option<u32>,
    pub memory_mb: Option<u64>,
}

/// Which kind of entity is being collected. Containers carry the ems_ref
/// of their pod group, which scopes their metric ids on the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetKind {
    Node,
    Container { group_ref: String },
}

/// A monitored entity: cluster node or workload container.
#[derive(Debug, Clone)]
pub struct CaptureTarget {
    pub name: String,
    /// External reference id; keys the returned metrics mapping.
    pub ems_ref: String,
    /// Management-system connection reference; `None` means the target is
    /// not connected and cannot be collected.
    pub ems_id: Option<String>,
    pub kind: TargetKind,
    pub hardware: Hardware,
}

impl CaptureTarget {
    pub fn node(
        name: impl Into<String>,
        ems_ref: impl Into<String>,
        ems_id: Option<String>,
        hardware: Hardware,
    ) -> Self {
        Self {
            name: name.into(),
            ems_ref: ems_ref.into(),
            ems_id,
            kind: TargetKind::Node,
            hardware,
        }
    }

    pub fn container(
        name: impl Into<String>,
        ems_ref: impl Into<String>,
        group_ref: impl Into<String>,
        ems_id: Option<String>,
        hardware: Hardware,
    ) -> Self {
        Self {
            name: name.into(),
            ems_ref: ems_ref.into(),
            ems_id,
            kind: TargetKind::Container {
                group_ref: group_ref.into(),
            },
            hardware,
        }
    }
}
