// Normalized per-interval metric rows

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

pub const CPU_USAGE_RATE_AVERAGE: &str = "cpu_usage_rate_average";
pub const MEM_USAGE_ABSOLUTE_AVERAGE: &str = "mem_usage_absolute_average";
pub const NET_USAGE_RATE_AVERAGE: &str = "net_usage_rate_average";

/// Metric-name -> value for one aligned timestamp.
pub type MetricValues = BTreeMap<String, f64>;

/// Normalized output: aligned UTC collection timestamp -> metric values,
/// iterated in ascending time order (downstream consumers expect a
/// chronological series).
pub type TimestampedMetrics = BTreeMap<DateTime<Utc>, MetricValues>;
