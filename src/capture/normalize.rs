// Normalization core: raw counter/gauge samples -> per-interval
// rate/utilization rows keyed by UTC timestamp.
//
// Samples arrive already bucketed to the collection interval by the backend
// (bucketDuration on the fetch), so the grid is the samples' own start
// timestamps, truncated from milliseconds to whole seconds. Rows missing
// any requested metric are dropped rather than padded.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};

use crate::models::{
    CPU_USAGE_RATE_AVERAGE, MEM_USAGE_ABSOLUTE_AVERAGE, NET_USAGE_RATE_AVERAGE, RawSample,
    TimestampedMetrics,
};

/// Validated capacity of a target; produced by `validate_target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    pub cpu_total_cores: u32,
    pub memory_mb: u64,
}

pub const CPU_USAGE_SUFFIX: &str = "cpu/usage";
pub const NETWORK_TX_SUFFIX: &str = "network/tx";
pub const NETWORK_RX_SUFFIX: &str = "network/rx";
pub const MEMORY_USAGE_SUFFIX: &str = "memory/usage";

/// Nanoseconds of CPU time one core provides per wall-clock second.
const NANOS_PER_CORE_SECOND: f64 = 1_000_000_000.0;
const BYTES_PER_KB: f64 = 1024.0;
const BYTES_PER_MB: u64 = 1024 * 1024;

/// Normalizes raw sample series into per-timestamp metric rows.
///
/// Counters (cpu/usage in nanoseconds, network/tx and network/rx in bytes)
/// are differenced between consecutive samples into per-second rates,
/// recorded at the earlier sample's timestamp; a lone sample produces
/// nothing. The memory gauge is reported as a percentage of total memory.
/// Only metric names in `metrics` are computed, and a timestamp row is kept
/// only when every requested metric is present for it; a window with no
/// complete row yields an empty map. Pure function: no state survives
/// between calls.
pub fn normalize(
    counters: &BTreeMap<String, Vec<RawSample>>,
    gauges: &BTreeMap<String, Vec<RawSample>>,
    capacity: &Capacity,
    metrics: &[&str],
) -> TimestampedMetrics {
    let mut rows = TimestampedMetrics::new();

    if metrics.contains(&CPU_USAGE_RATE_AVERAGE) {
        let core_nanos = NANOS_PER_CORE_SECOND * f64::from(capacity.cpu_total_cores);
        for samples in select(counters, CPU_USAGE_SUFFIX) {
            for (ts, rate) in derivative(samples) {
                rows.entry(ts)
                    .or_default()
                    .insert(CPU_USAGE_RATE_AVERAGE.into(), rate * 100.0 / core_nanos);
            }
        }
    }

    if metrics.contains(&NET_USAGE_RATE_AVERAGE) {
        // tx and rx byte rates are combined into one metric per timestamp
        let mut combined: BTreeMap<DateTime<Utc>, f64> = BTreeMap::new();
        for suffix in [NETWORK_TX_SUFFIX, NETWORK_RX_SUFFIX] {
            for samples in select(counters, suffix) {
                for (ts, rate) in derivative(samples) {
                    *combined.entry(ts).or_insert(0.0) += rate;
                }
            }
        }
        for (ts, bytes_per_sec) in combined {
            rows.entry(ts)
                .or_default()
                .insert(NET_USAGE_RATE_AVERAGE.into(), bytes_per_sec / BYTES_PER_KB);
        }
    }

    if metrics.contains(&MEM_USAGE_ABSOLUTE_AVERAGE) {
        let total_bytes = (capacity.memory_mb * BYTES_PER_MB) as f64;
        for samples in select(gauges, MEMORY_USAGE_SUFFIX) {
            for sample in samples {
                let Some(ts) = timestamp(sample.start) else {
                    continue;
                };
                rows.entry(ts).or_default().insert(
                    MEM_USAGE_ABSOLUTE_AVERAGE.into(),
                    sample.min * 100.0 / total_bytes,
                );
            }
        }
    }

    // Incomplete rows are never reported with nulls or zeros.
    rows.retain(|_, values| metrics.iter().all(|m| values.contains_key(*m)));
    rows
}

fn select<'a>(
    series: &'a BTreeMap<String, Vec<RawSample>>,
    suffix: &'a str,
) -> impl Iterator<Item = &'a [RawSample]> {
    series
        .iter()
        .filter(move |(path, _)| path.ends_with(suffix))
        .map(|(_, samples)| samples.as_slice())
}

/// Per-second rates between consecutive samples (sorted by start), keyed by
/// the earlier sample's timestamp. Fewer than two samples, or pairs with
/// non-positive elapsed time, produce nothing.
fn derivative(samples: &[RawSample]) -> Vec<(DateTime<Utc>, f64)> {
    let mut sorted = samples.to_vec();
    sorted.sort_by_key(|s| s.start);
    sorted
        .windows(2)
        .filter_map(|pair| {
            let elapsed_secs = (pair[1].start - pair[0].start) as f64 / 1000.0;
            if elapsed_secs <= 0.0 {
                return None;
            }
            let ts = timestamp(pair[0].start)?;
            Some((ts, (pair[1].min - pair[0].min) / elapsed_secs))
        })
        .collect()
}

/// Truncates an epoch-millisecond timestamp to whole seconds, UTC.
fn timestamp(start_ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(start_ms.div_euclid(1000), 0).single()
}
