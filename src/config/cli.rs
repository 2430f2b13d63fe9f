//! CLI argument parsing using clap

use clap::Parser;
use std::path::PathBuf;

use super::{Config, DEFAULT_BENCHMARKS};

/// dbpulse - SQLite key-value microbenchmark driver
#[derive(Parser, Debug)]
#[command(name = "dbpulse")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Comma-separated list of workloads to run in the specified order
    ///
    /// fillseq        write N values in sequential key order
    /// fillseqsync    write N/100 values sequentially, fully synchronous
    /// fillseqbatch   write N values sequentially, 1000 per transaction
    /// fillrandom     write N values in random key order
    /// fillrandsync   write N/100 values randomly, fully synchronous
    /// fillrandbatch  write N values randomly, 1000 per transaction
    /// overwrite      overwrite N values in random key order
    /// overwritebatch overwrite N values randomly, 1000 per transaction
    /// fillrand100K   write N/1000 100K values in random order
    /// fillseq100K    write N/1000 100K values in sequential order
    /// readseq        read all entries with one ordered scan
    /// readrandom     read N times in random order
    /// readrand100K   read N/1000 100K values in random order
    #[arg(long, default_value = DEFAULT_BENCHMARKS, verbatim_doc_comment)]
    pub benchmarks: String,

    /// Number of key/value entries to place in the database
    #[arg(long, default_value = "1000000")]
    pub num: usize,

    /// Number of read operations (defaults to --num)
    #[arg(long)]
    pub reads: Option<usize>,

    /// Size of each value in bytes
    #[arg(long, default_value = "100")]
    pub value_size: usize,

    /// Print a histogram of operation timings after each workload
    #[arg(long)]
    pub histogram: bool,

    /// Dump raw per-operation timings as CSV after each workload
    #[arg(long)]
    pub raw: bool,

    /// Fraction of each generated value that survives compression
    #[arg(long, default_value = "0.5")]
    pub compression_ratio: f64,

    /// Database page size in bytes
    #[arg(long, default_value = "1024")]
    pub page_size: u32,

    /// Database cache size in pages
    #[arg(long, default_value = "4096")]
    pub num_pages: u32,

    /// Do not destroy the existing database; workloads that want a fresh
    /// database are skipped
    #[arg(long)]
    pub use_existing_db: bool,

    /// Disable transactions around batched writes
    #[arg(long)]
    pub no_transaction: bool,

    /// Disable write-ahead logging
    #[arg(long)]
    pub no_wal: bool,

    /// Directory where database files are created
    #[arg(long, default_value = ".")]
    pub db: PathBuf,

    /// Write per-workload summaries to this JSON file
    #[arg(long)]
    pub json: Option<PathBuf>,
}

impl Cli {
    /// Convert parsed flags into the benchmark configuration
    pub fn into_config(self) -> Config {
        Config {
            benchmarks: self.benchmarks,
            num: self.num,
            reads: self.reads,
            value_size: self.value_size,
            histogram: self.histogram,
            raw: self.raw,
            compression_ratio: self.compression_ratio,
            page_size: self.page_size,
            num_pages: self.num_pages,
            use_existing_db: self.use_existing_db,
            transaction: !self.no_transaction,
            wal: !self.no_wal,
            db_dir: self.db,
            json_output: self.json,
        }
    }
}
