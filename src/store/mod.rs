//! Storage backend abstraction
//!
//! The benchmark loop never talks to SQLite directly; it drives a small
//! key-value operation set through the [`KvStore`] trait. This keeps the
//! timing and sequencing logic independent of the engine glue and lets
//! tests substitute a recording in-memory backend.
//!
//! # Lifecycle
//!
//! 1. A [`StoreOpener`] produces a store handle for a numbered database
//!    file, applying the configured pragmas and creating the table on
//!    fresh opens
//! 2. The benchmark issues upserts, point reads, ordered scans and
//!    transaction boundaries against the handle
//! 3. `close()` consumes the handle; fresh-table workloads close and
//!    reopen with the next file number
//!
//! # Error Handling
//!
//! Every operation returns `Result<_, StoreError>` carrying the underlying
//! engine status. The benchmark treats any store error as fatal: it is
//! reported and the process exits, with no retries.

use std::path::PathBuf;

use thiserror::Error;

pub mod mock;
pub mod sqlite;

pub use mock::{MockOpener, MockStore, StoreOp};
pub use sqlite::{SqliteOpener, SqliteStore};

/// Errors surfaced by a storage backend
#[derive(Debug, Error)]
pub enum StoreError {
    /// Opening or configuring the database failed
    #[error("open error: {0}")]
    Open(#[source] rusqlite::Error),

    /// A statement failed while executing a workload operation
    #[error("sql error: {0}")]
    Sql(#[from] rusqlite::Error),

    /// Closing the database failed
    #[error("close error: {0}")]
    Close(#[source] rusqlite::Error),
}

/// Per-handle configuration applied when a store is opened
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Database file to open or create
    pub path: PathBuf,
    /// Cache size in pages
    pub cache_pages: u32,
    /// Page size in bytes
    pub page_size: u32,
    /// Enable write-ahead logging
    pub wal: bool,
    /// Create the benchmark table (the file is new)
    pub fresh: bool,
}

/// Factory for store handles
///
/// The benchmark reopens the store whenever a workload wants a fresh
/// table, so opening is a separate seam from the handle itself.
pub trait StoreOpener {
    type Store: KvStore;

    fn open(&mut self, config: &StoreConfig) -> Result<Self::Store, StoreError>;
}

/// The key-value operation set exercised by the benchmark
pub trait KvStore {
    /// Insert or replace one key/value pair
    fn upsert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;

    /// Look up one key, draining all result rows; returns the row count
    fn point_read(&mut self, key: &[u8]) -> Result<usize, StoreError>;

    /// Walk the table in key order, visiting at most `limit` rows
    ///
    /// `on_row` receives each row's key and value; returns the number of
    /// rows visited. The scan is not restartable mid-way.
    fn scan(
        &mut self,
        limit: usize,
        on_row: &mut dyn FnMut(&[u8], &[u8]),
    ) -> Result<usize, StoreError>;

    /// Start a write transaction
    fn begin_transaction(&mut self) -> Result<(), StoreError>;

    /// Commit the current transaction
    fn end_transaction(&mut self) -> Result<(), StoreError>;

    /// Switch between fully synchronous and asynchronous durability
    fn set_synchronous(&mut self, full: bool) -> Result<(), StoreError>;

    /// Flush the write-ahead log to the main database (no-op without WAL)
    fn checkpoint(&mut self) -> Result<(), StoreError>;

    /// Close the handle
    fn close(self) -> Result<(), StoreError>;
}
