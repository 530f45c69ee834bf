// Target preconditions: a target without a management connection or known
// capacity cannot be collected.

use thiserror::Error;

use super::normalize::Capacity;
use crate::models::CaptureTarget;

/// Why a target was rejected before any fetch was attempted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetValidationError {
    #[error("no ext_management_system connection for target {0}")]
    MissingConnection(String),
    #[error("cpu_total_cores not defined for target {0}")]
    MissingCpuCores(String),
    #[error("memory_mb not defined for target {0}")]
    MissingMemory(String),
}

/// Checks connection, CPU core count, and memory size in that order,
/// failing on the first violation. On success returns the unwrapped
/// capacity so normalization works with known values.
pub fn validate_target(target: &CaptureTarget) -> Result<Capacity, TargetValidationError> {
    if target.ems_id.is_none() {
        return Err(TargetValidationError::MissingConnection(target.name.clone()));
    }
    let cpu_total_cores = target
        .hardware
        .cpu_total_cores
        .ok_or_else(|| TargetValidationError::MissingCpuCores(target.name.clone()))?;
    let memory_mb = target
        .hardware
        .memory_mb
        .ok_or_else(|| TargetValidationError::MissingMemory(target.name.clone()))?;
    Ok(Capacity {
        cpu_total_cores,
        memory_mb,
    })
}
