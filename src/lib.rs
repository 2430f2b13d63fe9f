//! dbpulse - SQLite key-value microbenchmark driver
//!
//! dbpulse exercises an embedded SQLite database under a key-value usage
//! pattern (one table, blob key/value pairs) with named write and read
//! workloads, and reports per-operation latency and throughput statistics.
//!
//! # Architecture
//!
//! - **Deterministic workload generation**: seeded Lehmer PRNG and a pooled
//!   compressible-data generator for reproducible runs
//! - **Fixed-bucket statistics**: 154-bucket latency histogram with
//!   percentile interpolation, plus an optional raw-sample recorder
//! - **Named workloads**: sequential/random fills, overwrites, batched
//!   transactions, sync writes, point reads and ordered scans
//! - **Swappable storage backend**: the `store::KvStore` seam separates the
//!   benchmark loop from the SQLite glue

pub mod bench;
pub mod config;
pub mod output;
pub mod random;
pub mod stats;
pub mod store;
pub mod util;

// Re-export commonly used types
pub use bench::Benchmark;
pub use config::Config;

/// Result type used throughout dbpulse
pub type Result<T> = anyhow::Result<T>;
