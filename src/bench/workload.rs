//! Workload name resolution
//!
//! Maps the names accepted by `--benchmarks` to fully derived driver
//! parameters. Counts and value sizes depend on the configuration: the
//! sync variants write 1/100 of the entries (each write costs a full
//! flush), the 100K variants write 1/1000 of the entries at 100 KB each.

use crate::config::Config;

/// Key ordering for write and point-read workloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Sequential,
    Random,
}

/// Whether a write workload wants a freshly created table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbState {
    Fresh,
    Existing,
}

/// Parameters of one write workload run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteSpec {
    /// Fully synchronous durability for this run
    pub sync: bool,
    pub order: Order,
    pub state: DbState,
    pub num_entries: usize,
    pub value_size: usize,
    /// Entries per transaction; 1 means no explicit transactions
    pub entries_per_batch: usize,
}

/// A recognized workload with its parameters resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workload {
    Write(WriteSpec),
    /// Point lookups of `reads` uniformly random keys in `[0, reads)`
    ReadRandom { reads: usize },
    /// One ordered scan visiting at most `reads` rows
    ReadSequential { reads: usize },
}

impl Workload {
    /// Resolve a workload name against the configuration
    ///
    /// Returns `None` for unrecognized names; the caller decides whether
    /// to warn or ignore.
    pub fn parse(name: &str, config: &Config) -> Option<Workload> {
        let num = config.num;
        let value_size = config.value_size;
        let reads = config.read_count();

        let write = |sync, order, state, num_entries, value_size, entries_per_batch| {
            Some(Workload::Write(WriteSpec {
                sync,
                order,
                state,
                num_entries,
                value_size,
                entries_per_batch,
            }))
        };

        use DbState::{Existing, Fresh};
        use Order::{Random, Sequential};
        match name {
            "fillseq" => write(false, Sequential, Fresh, num, value_size, 1),
            "fillseqbatch" => write(false, Sequential, Fresh, num, value_size, 1000),
            "fillrandom" => write(false, Random, Fresh, num, value_size, 1),
            "fillrandbatch" => write(false, Random, Fresh, num, value_size, 1000),
            "overwrite" => write(false, Random, Existing, num, value_size, 1),
            "overwritebatch" => write(false, Random, Existing, num, value_size, 1000),
            "fillrandsync" => write(true, Random, Fresh, num / 100, value_size, 1),
            "fillseqsync" => write(true, Sequential, Fresh, num / 100, value_size, 1),
            "fillrand100K" => write(false, Random, Fresh, num / 1000, 100 * 1000, 1),
            "fillseq100K" => write(false, Sequential, Fresh, num / 1000, 100 * 1000, 1),
            "readseq" => Some(Workload::ReadSequential { reads }),
            "readrandom" => Some(Workload::ReadRandom { reads }),
            "readrand100K" => Some(Workload::ReadRandom {
                reads: reads / 1000,
            }),
            _ => None,
        }
    }
}
