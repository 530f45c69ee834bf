// Domain models for metrics capture

mod entity;
mod metrics;
mod sample;

pub use entity::{CaptureTarget, Hardware, TargetKind};
pub use metrics::{
    CPU_USAGE_RATE_AVERAGE, MEM_USAGE_ABSOLUTE_AVERAGE, NET_USAGE_RATE_AVERAGE, MetricValues,
    TimestampedMetrics,
};
pub use sample::RawSample;
