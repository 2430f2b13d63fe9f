//! Configuration module
//!
//! Handles CLI argument parsing and the benchmark configuration struct.
//! All run-time knobs live in one explicit [`Config`] value owned by the
//! orchestrator; there is no process-wide mutable state.

pub mod cli;

use serde::Serialize;
use std::path::PathBuf;

/// Workloads executed when `--benchmarks` is not given
pub const DEFAULT_BENCHMARKS: &str = "fillseq,\
    fillseqsync,\
    fillseqbatch,\
    fillrandom,\
    fillrandsync,\
    fillrandbatch,\
    overwrite,\
    overwritebatch,\
    readrandom,\
    readseq,\
    fillrand100K,\
    fillseq100K,\
    readseq,\
    readrand100K";

/// Complete benchmark configuration
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Comma-separated list of workload names, run in order
    pub benchmarks: String,
    /// Number of key/value entries to place in the database
    pub num: usize,
    /// Number of read operations; `None` means one per entry
    pub reads: Option<usize>,
    /// Size of each value in bytes
    pub value_size: usize,
    /// Record and print a latency histogram per workload
    pub histogram: bool,
    /// Record raw per-operation timings and dump them as CSV
    pub raw: bool,
    /// Fraction of each generated value that survives compression
    pub compression_ratio: f64,
    /// Database page size in bytes
    pub page_size: u32,
    /// Database cache size in pages
    pub num_pages: u32,
    /// Reuse an existing database; fresh-table workloads are skipped
    pub use_existing_db: bool,
    /// Allow batched writes to run inside transactions
    pub transaction: bool,
    /// Enable write-ahead logging
    pub wal: bool,
    /// Directory where database files are created
    pub db_dir: PathBuf,
    /// Write per-workload summaries to this JSON file
    pub json_output: Option<PathBuf>,
}

impl Config {
    /// Effective read count: the configured value or one read per entry
    pub fn read_count(&self) -> usize {
        self.reads.unwrap_or(self.num)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            benchmarks: DEFAULT_BENCHMARKS.to_string(),
            num: 1_000_000,
            reads: None,
            value_size: 100,
            histogram: false,
            raw: false,
            compression_ratio: 0.5,
            page_size: 1024,
            num_pages: 4096,
            use_existing_db: false,
            transaction: true,
            wal: true,
            db_dir: PathBuf::from("."),
            json_output: None,
        }
    }
}
