//! Timing conversion helpers
//!
//! Small conversions between `Duration` and the units used by the
//! benchmark report: microseconds per operation and megabytes per second.

use std::time::Duration;

/// A duration as fractional microseconds
#[inline]
pub fn duration_micros(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1e6
}

/// Throughput in MB/s (1 MB = 1048576 bytes), 0 for a zero duration
pub fn megabytes_per_sec(bytes: u64, elapsed: Duration) -> f64 {
    let seconds = elapsed.as_secs_f64();
    if seconds > 0.0 {
        (bytes as f64 / 1_048_576.0) / seconds
    } else {
        0.0
    }
}
