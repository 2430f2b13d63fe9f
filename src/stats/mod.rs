//! Statistics collection
//!
//! Latency statistics for the benchmark loop: a fixed-bucket histogram
//! with percentile estimation and textual rendering, and an optional
//! recorder that keeps every raw sample for CSV export. Both are reset at
//! the start of each named workload and read back when it finishes.

pub mod histogram;
pub mod raw;

pub use histogram::Histogram;
pub use raw::RawRecorder;
