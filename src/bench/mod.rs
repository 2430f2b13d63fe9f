//! Benchmark orchestration
//!
//! Runs the configured workload list in order against the storage backend,
//! timing every operation. Each named workload gets a clean slate (byte
//! count, message, histogram, raw recorder, progress cadence), executes
//! through the write, point-read or scan driver, and finishes with a
//! one-line summary plus optional histogram and raw dumps.
//!
//! The orchestrator owns all mutable state: the store handle, the
//! benchmark-wide PRNG, the data pool and the statistics. Everything runs
//! on one thread; a store error aborts the whole run.

pub mod workload;

use std::fs;
use std::fs::File;
use std::io;
use std::io::BufWriter;
use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use serde::Serialize;

use crate::config::Config;
use crate::output;
use crate::random::{DataGenerator, Random};
use crate::stats::{Histogram, RawRecorder};
use crate::store::{KvStore, StoreConfig, StoreOpener};
use crate::util::time::{duration_micros, megabytes_per_sec};
use crate::Result;
use self::workload::{DbState, Order, Workload, WriteSpec};

/// Database files are named `<prefix>-<n>.db`; leftovers matching the
/// prefix are deleted before a fresh benchmark run
const DB_FILE_PREFIX: &str = "dbpulse";

/// Seed of the benchmark-wide PRNG
const RAND_SEED: u32 = 301;

/// First progress report, in completed operations
const FIRST_REPORT: usize = 100;

/// Summary of one completed workload run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub name: String,
    pub micros_per_op: f64,
    pub ops: u64,
    pub bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_mb_per_sec: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Benchmark orchestrator
///
/// Generic over the store opener so tests can substitute a recording mock
/// for the SQLite backend.
pub struct Benchmark<O: StoreOpener> {
    config: Config,
    opener: O,
    store: Option<O::Store>,
    db_num: u32,
    rng: Random,
    gen: DataGenerator,
    hist: Histogram,
    raw: RawRecorder,
    summaries: Vec<RunSummary>,

    // State of the workload currently running
    start: Instant,
    last_op_finish: Instant,
    bytes: u64,
    message: String,
    done: usize,
    next_report: usize,
}

impl<O: StoreOpener> Benchmark<O> {
    /// Create an orchestrator
    ///
    /// Deletes leftover database files from the target directory unless
    /// the configuration asks to reuse an existing database.
    pub fn new(config: Config, opener: O) -> Result<Self> {
        if !config.use_existing_db {
            destroy_db_files(&config.db_dir)?;
        }
        let gen = DataGenerator::new(config.compression_ratio);
        let now = Instant::now();
        Ok(Self {
            config,
            opener,
            store: None,
            db_num: 0,
            rng: Random::new(RAND_SEED),
            gen,
            hist: Histogram::new(),
            raw: RawRecorder::new(),
            summaries: Vec::new(),
            start: now,
            last_op_finish: now,
            bytes: 0,
            message: String::new(),
            done: 0,
            next_report: FIRST_REPORT,
        })
    }

    /// Execute the configured workload list in order
    ///
    /// Returns the summaries of the workloads that ran. Unknown names warn
    /// and are skipped; any store error aborts the remaining list.
    pub fn run(&mut self) -> Result<Vec<RunSummary>> {
        output::text::print_header(&self.config);
        self.open_store()?;

        let benchmarks = self.config.benchmarks.clone();
        for name in benchmarks.split(',') {
            if name.is_empty() {
                continue;
            }
            let Some(workload) = Workload::parse(name, &self.config) else {
                eprintln!("unknown benchmark '{name}'");
                continue;
            };

            self.start_run();
            match workload {
                Workload::Write(spec) => self.do_write(&spec)?,
                Workload::ReadRandom { reads } => self.do_read_random(reads)?,
                Workload::ReadSequential { reads } => self.do_read_sequential(reads)?,
            }
            self.stop_run(name)?;
        }

        if let Some(path) = self.config.json_output.clone() {
            output::json::write_summaries(&path, &self.summaries)?;
        }
        self.close_store()?;
        Ok(self.summaries.clone())
    }

    /// Open the next numbered database file
    fn open_store(&mut self) -> Result<()> {
        self.db_num += 1;
        let store_config = StoreConfig {
            path: self
                .config
                .db_dir
                .join(format!("{DB_FILE_PREFIX}-{}.db", self.db_num)),
            cache_pages: self.config.num_pages,
            page_size: self.config.page_size,
            wal: self.config.wal,
            fresh: !self.config.use_existing_db,
        };
        let store = self
            .opener
            .open(&store_config)
            .with_context(|| format!("failed to open database {}", store_config.path.display()))?;
        self.store = Some(store);
        Ok(())
    }

    fn close_store(&mut self) -> Result<()> {
        if let Some(store) = self.store.take() {
            store.close().context("failed to close database")?;
        }
        Ok(())
    }

    fn store_mut(&mut self) -> &mut O::Store {
        self.store.as_mut().expect("store is open while running")
    }

    /// Reset the per-run state and start the clock
    fn start_run(&mut self) {
        self.start = Instant::now();
        self.last_op_finish = self.start;
        self.bytes = 0;
        self.message.clear();
        self.hist.clear();
        self.raw.clear();
        self.done = 0;
        self.next_report = FIRST_REPORT;
    }

    /// Account one completed operation
    fn finished_single_op(&mut self) {
        if self.config.histogram || self.config.raw {
            let now = Instant::now();
            let micros = duration_micros(now.duration_since(self.last_op_finish));
            if self.config.histogram {
                self.hist.add(micros);
            }
            if self.config.raw {
                self.raw.add(micros);
            }
            if micros > 20_000.0 {
                eprint!("long op: {micros:.1} micros{:30}\r", "");
            }
            self.last_op_finish = now;
        }

        self.done += 1;
        if self.done >= self.next_report {
            self.next_report = next_report_threshold(self.next_report);
            eprint!("... finished {} ops{:30}\r", self.done, "");
        }
    }

    /// Report the finished workload and record its summary
    fn stop_run(&mut self, name: &str) -> Result<()> {
        let elapsed = self.start.elapsed();
        let done = self.done.max(1) as u64;
        let rate = (self.bytes > 0).then(|| megabytes_per_sec(self.bytes, elapsed));

        let mut message = self.message.clone();
        if let Some(rate) = rate {
            let rate_str = format!("{rate:6.1} MB/s");
            message = if message.is_empty() {
                rate_str
            } else {
                format!("{rate_str} {message}")
            };
        }

        let micros_per_op = duration_micros(elapsed) / done as f64;
        println!(
            "{name:<12} : {micros_per_op:11.3} micros/op;{}{message}",
            if message.is_empty() { "" } else { " " }
        );
        if self.config.histogram {
            println!("Microseconds per op:\n{}", self.hist);
        }
        if self.config.raw {
            self.dump_raw(name)?;
        }

        self.summaries.push(RunSummary {
            name: name.to_string(),
            micros_per_op,
            ops: done,
            bytes: self.bytes,
            rate_mb_per_sec: rate,
            message: (!self.message.is_empty()).then(|| self.message.clone()),
        });
        Ok(())
    }

    /// Write the raw samples of the finished workload as CSV
    fn dump_raw(&self, name: &str) -> Result<()> {
        let path = self.config.db_dir.join(format!("raw_{name}.csv"));
        let file =
            File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
        let mut sink = BufWriter::new(file);
        self.raw
            .render_csv(&mut sink)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    /// Write driver: upsert `num_entries` generated values
    fn do_write(&mut self, spec: &WriteSpec) -> Result<()> {
        if spec.state == DbState::Fresh {
            if self.config.use_existing_db {
                self.message = "skipping (--use-existing-db is set)".to_string();
                return Ok(());
            }
            // A fresh table means a fresh database file; reopening restarts
            // the run clock so setup time is not billed to the workload
            self.close_store()?;
            self.open_store()?;
            self.start_run();
        }
        if spec.num_entries != self.config.num {
            self.message = format!("({} ops)", spec.num_entries);
        }

        self.store_mut().set_synchronous(spec.sync)?;

        let batch = spec.entries_per_batch;
        let grouped = self.config.transaction && batch > 1;
        let mut i = 0;
        while i < spec.num_entries {
            if grouped {
                self.store_mut().begin_transaction()?;
            }
            for j in 0..batch {
                let k = match spec.order {
                    Order::Sequential => i + j,
                    Order::Random => self.rng.uniform(spec.num_entries as u32) as usize,
                };
                let key = format!("{k:016}");
                self.bytes += (spec.value_size + key.len()) as u64;
                let value = self.gen.generate(spec.value_size);
                self.store
                    .as_mut()
                    .expect("store is open while running")
                    .upsert(key.as_bytes(), value)?;
                self.finished_single_op();
            }
            if grouped {
                self.store_mut().end_transaction()?;
            }
            i += batch;
        }

        self.store_mut().checkpoint()?;
        Ok(())
    }

    /// Point-read driver: look up `reads` uniformly random keys
    fn do_read_random(&mut self, reads: usize) -> Result<()> {
        for _ in 0..reads {
            let k = self.rng.uniform(reads as u32) as usize;
            let key = format!("{k:016}");
            self.store_mut().point_read(key.as_bytes())?;
            self.finished_single_op();
        }
        Ok(())
    }

    /// Scan driver: one ordered full-table scan of at most `reads` rows
    fn do_read_sequential(&mut self, reads: usize) -> Result<()> {
        let mut store = self.store.take().expect("store is open while running");
        let scanned = store.scan(reads, &mut |_key, value| {
            self.bytes += value.len() as u64;
            self.finished_single_op();
        });
        self.store = Some(store);
        scanned?;
        Ok(())
    }
}

/// Advance the progress-report threshold
///
/// The cadence grows with the run so short workloads report every few
/// hundred ops and long ones every hundred thousand.
fn next_report_threshold(current: usize) -> usize {
    if current < 1000 {
        current + 100
    } else if current < 5000 {
        current + 500
    } else if current < 10000 {
        current + 1000
    } else if current < 50000 {
        current + 5000
    } else if current < 100000 {
        current + 10000
    } else if current < 500000 {
        current + 50000
    } else {
        current + 100000
    }
}

/// Delete leftover benchmark database files from `dir`
fn destroy_db_files(dir: &Path) -> Result<()> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {}", dir.display()))
        }
    };
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to read {}", dir.display()))?;
        if entry.file_name().to_string_lossy().starts_with(DB_FILE_PREFIX) {
            fs::remove_file(entry.path())
                .with_context(|| format!("failed to remove {}", entry.path().display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MockOpener, StoreOp};

    fn config(dir: &tempfile::TempDir, benchmarks: &str, num: usize) -> Config {
        Config {
            benchmarks: benchmarks.to_string(),
            num,
            value_size: 100,
            db_dir: dir.path().to_path_buf(),
            ..Config::default()
        }
    }

    fn run(config: Config) -> (Vec<RunSummary>, Vec<StoreOp>) {
        let opener = MockOpener::new();
        let log = opener.clone();
        let mut bench = Benchmark::new(config, opener).unwrap();
        let summaries = bench.run().unwrap();
        (summaries, log.ops())
    }

    fn upsert_keys(ops: &[StoreOp]) -> Vec<Vec<u8>> {
        ops.iter()
            .filter_map(|op| match op {
                StoreOp::Upsert { key, .. } => Some(key.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_fillseq_writes_every_key_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let (summaries, ops) = run(config(&dir, "fillseq", 1000));

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].name, "fillseq");
        assert_eq!(summaries[0].ops, 1000);
        assert_eq!(summaries[0].bytes, 1000 * (100 + 16));
        assert!(summaries[0].rate_mb_per_sec.is_some());

        let keys = upsert_keys(&ops);
        assert_eq!(keys.len(), 1000);
        for (i, key) in keys.iter().enumerate() {
            assert_eq!(key, format!("{i:016}").as_bytes());
        }
    }

    #[test]
    fn test_fresh_workload_reopens_the_database() {
        let dir = tempfile::tempdir().unwrap();
        let (_, ops) = run(config(&dir, "fillseq,fillseq", 10));

        // Initial open plus one reopen per fresh workload
        let opens = ops
            .iter()
            .filter(|op| matches!(op, StoreOp::Open { fresh: true }))
            .count();
        assert_eq!(opens, 3);
        let closes = ops.iter().filter(|op| matches!(op, StoreOp::Close)).count();
        assert_eq!(closes, 3);
    }

    #[test]
    fn test_overwrite_keeps_the_current_database() {
        let dir = tempfile::tempdir().unwrap();
        let (_, ops) = run(config(&dir, "overwrite", 10));

        let opens = ops
            .iter()
            .filter(|op| matches!(op, StoreOp::Open { .. }))
            .count();
        assert_eq!(opens, 1);
        assert_eq!(upsert_keys(&ops).len(), 10);
    }

    #[test]
    fn test_random_order_stays_in_range() {
        let dir = tempfile::tempdir().unwrap();
        let (_, ops) = run(config(&dir, "fillrandom", 100));

        let keys = upsert_keys(&ops);
        assert_eq!(keys.len(), 100);
        for key in keys {
            let index: usize = String::from_utf8(key).unwrap().parse().unwrap();
            assert!(index < 100);
        }
    }

    #[test]
    fn test_batched_writes_are_wrapped_in_transactions() {
        let dir = tempfile::tempdir().unwrap();
        let (_, ops) = run(config(&dir, "fillseqbatch", 2000));

        let begins = ops.iter().filter(|op| matches!(op, StoreOp::Begin)).count();
        let ends = ops.iter().filter(|op| matches!(op, StoreOp::End)).count();
        assert_eq!(begins, 2);
        assert_eq!(ends, 2);
        assert_eq!(upsert_keys(&ops).len(), 2000);
    }

    #[test]
    fn test_no_transaction_disables_batch_grouping() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(&dir, "fillseqbatch", 2000);
        config.transaction = false;
        let (_, ops) = run(config);

        assert!(!ops.iter().any(|op| matches!(op, StoreOp::Begin)));
        assert!(!ops.iter().any(|op| matches!(op, StoreOp::End)));
        assert_eq!(upsert_keys(&ops).len(), 2000);
    }

    #[test]
    fn test_sync_workload_requests_full_durability() {
        let dir = tempfile::tempdir().unwrap();
        let (summaries, ops) = run(config(&dir, "fillseqsync", 1000));

        assert!(ops
            .iter()
            .any(|op| matches!(op, StoreOp::SetSynchronous { full: true })));
        // N/100 entries, reported in the message
        assert_eq!(upsert_keys(&ops).len(), 10);
        assert_eq!(summaries[0].message.as_deref(), Some("(10 ops)"));
    }

    #[test]
    fn test_write_workloads_checkpoint_at_the_end() {
        let dir = tempfile::tempdir().unwrap();
        let (_, ops) = run(config(&dir, "fillseq", 10));
        assert!(matches!(
            ops.last(),
            // close() is recorded after the final checkpoint
            Some(StoreOp::Close)
        ));
        assert!(ops.iter().any(|op| matches!(op, StoreOp::Checkpoint)));
    }

    #[test]
    fn test_readrandom_reads_within_the_read_range() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(&dir, "fillseq,readrandom", 100);
        config.reads = Some(40);
        let (summaries, ops) = run(config);

        let read_keys: Vec<_> = ops
            .iter()
            .filter_map(|op| match op {
                StoreOp::PointRead { key } => Some(key.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(read_keys.len(), 40);
        for key in read_keys {
            let index: usize = String::from_utf8(key).unwrap().parse().unwrap();
            assert!(index < 40);
        }
        assert_eq!(summaries[1].ops, 40);
    }

    #[test]
    fn test_readseq_accumulates_value_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let (summaries, ops) = run(config(&dir, "fillseq,readseq", 50));

        assert_eq!(summaries[1].name, "readseq");
        assert_eq!(summaries[1].ops, 50);
        // Value bytes only; key bytes are not counted on scans
        assert_eq!(summaries[1].bytes, 50 * 100);
        assert!(ops.iter().any(|op| matches!(op, StoreOp::Scan)));
    }

    #[test]
    fn test_unknown_workload_does_not_disturb_neighbors() {
        let dir = tempfile::tempdir().unwrap();
        let (summaries, _) = run(config(&dir, "fillseq,bogus,readseq", 50));

        let names: Vec<_> = summaries.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["fillseq", "readseq"]);
        assert_eq!(summaries[1].ops, 50);
    }

    #[test]
    fn test_empty_names_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let (summaries, _) = run(config(&dir, "fillseq,,readseq,", 10));
        assert_eq!(summaries.len(), 2);
    }

    #[test]
    fn test_fresh_workload_skips_when_reusing_database() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(&dir, "fillseq", 100);
        config.use_existing_db = true;
        let (summaries, ops) = run(config);

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].bytes, 0);
        assert!(summaries[0]
            .message
            .as_deref()
            .unwrap()
            .contains("skipping"));

        // The store is opened and closed around the run, but the skipped
        // workload itself performs no operations
        for op in &ops {
            assert!(
                matches!(op, StoreOp::Open { fresh: false } | StoreOp::Close),
                "unexpected operation {op:?}"
            );
        }
    }

    #[test]
    fn test_json_export_writes_all_summaries() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(&dir, "fillseq,readseq", 10);
        let json_path = dir.path().join("out.json");
        config.json_output = Some(json_path.clone());
        run(config);

        let text = std::fs::read_to_string(&json_path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_destroy_db_files_removes_only_benchmark_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("dbpulse-1.db"), b"old").unwrap();
        std::fs::write(dir.path().join("dbpulse-1.db-wal"), b"old").unwrap();
        std::fs::write(dir.path().join("keep.txt"), b"keep").unwrap();

        destroy_db_files(dir.path()).unwrap();

        assert!(!dir.path().join("dbpulse-1.db").exists());
        assert!(!dir.path().join("dbpulse-1.db-wal").exists());
        assert!(dir.path().join("keep.txt").exists());
    }

    #[test]
    fn test_progress_threshold_schedule() {
        let cases = [
            (100, 200),
            (900, 1000),
            (1000, 1500),
            (4500, 5000),
            (5000, 6000),
            (9000, 10000),
            (10000, 15000),
            (45000, 50000),
            (50000, 60000),
            (90000, 100000),
            (100000, 150000),
            (450000, 500000),
            (500000, 600000),
            (1_000_000, 1_100_000),
        ];
        for (current, expected) in cases {
            assert_eq!(next_report_threshold(current), expected, "from {current}");
        }
    }
}
