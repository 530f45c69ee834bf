// Raw time-series samples as returned by the metrics backend

use serde::{Deserialize, Serialize};

/// One observation window from the backend. `start < end`, both epoch
/// milliseconds. For counters `min` is the cumulative reading at window
/// start (used for delta computation); for gauges it is an instantaneous
/// reading for the window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    pub start: i64,
    pub end: i64,
    pub min: f64,
}

impl RawSample {
    pub fn new(start: i64, end: i64, min: f64) -> Self {
        Self { start, end, min }
    }
}
