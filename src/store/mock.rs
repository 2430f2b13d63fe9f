//! Mock storage backend for testing
//!
//! An in-memory implementation of the [`KvStore`] trait that records every
//! operation it receives. Orchestrator tests drive a full benchmark run
//! against it and then assert on the exact operation sequence, without
//! touching a real database.
//!
//! The operation log is shared between the opener and every store it
//! produces, so it survives the close/reopen cycle that fresh-table
//! workloads perform. Table contents are per-handle: a reopened store
//! starts empty, like a fresh database file.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use super::{KvStore, StoreConfig, StoreError, StoreOpener};

/// Record of one store operation, for test verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    Open { fresh: bool },
    Upsert { key: Vec<u8>, value_len: usize },
    PointRead { key: Vec<u8> },
    Scan,
    Begin,
    End,
    SetSynchronous { full: bool },
    Checkpoint,
    Close,
}

/// Opens [`MockStore`] handles that share one operation log
///
/// Clone the opener before handing it to the benchmark to keep a handle on
/// the log.
#[derive(Debug, Clone, Default)]
pub struct MockOpener {
    ops: Arc<Mutex<Vec<StoreOp>>>,
}

impl MockOpener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded operations, in order
    pub fn ops(&self) -> Vec<StoreOp> {
        self.ops.lock().unwrap().clone()
    }
}

impl StoreOpener for MockOpener {
    type Store = MockStore;

    fn open(&mut self, config: &StoreConfig) -> Result<MockStore, StoreError> {
        self.ops.lock().unwrap().push(StoreOp::Open {
            fresh: config.fresh,
        });
        Ok(MockStore {
            ops: Arc::clone(&self.ops),
            table: BTreeMap::new(),
        })
    }
}

/// In-memory key-value store recording its operations
pub struct MockStore {
    ops: Arc<Mutex<Vec<StoreOp>>>,
    table: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MockStore {
    fn record(&self, op: StoreOp) {
        self.ops.lock().unwrap().push(op);
    }
}

impl KvStore for MockStore {
    fn upsert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.record(StoreOp::Upsert {
            key: key.to_vec(),
            value_len: value.len(),
        });
        self.table.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn point_read(&mut self, key: &[u8]) -> Result<usize, StoreError> {
        self.record(StoreOp::PointRead { key: key.to_vec() });
        Ok(usize::from(self.table.contains_key(key)))
    }

    fn scan(
        &mut self,
        limit: usize,
        on_row: &mut dyn FnMut(&[u8], &[u8]),
    ) -> Result<usize, StoreError> {
        self.record(StoreOp::Scan);
        let mut visited = 0;
        for (key, value) in self.table.iter().take(limit) {
            on_row(key, value);
            visited += 1;
        }
        Ok(visited)
    }

    fn begin_transaction(&mut self) -> Result<(), StoreError> {
        self.record(StoreOp::Begin);
        Ok(())
    }

    fn end_transaction(&mut self) -> Result<(), StoreError> {
        self.record(StoreOp::End);
        Ok(())
    }

    fn set_synchronous(&mut self, full: bool) -> Result<(), StoreError> {
        self.record(StoreOp::SetSynchronous { full });
        Ok(())
    }

    fn checkpoint(&mut self) -> Result<(), StoreError> {
        self.record(StoreOp::Checkpoint);
        Ok(())
    }

    fn close(self) -> Result<(), StoreError> {
        self.record(StoreOp::Close);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(opener: &mut MockOpener) -> MockStore {
        let config = StoreConfig {
            path: "mock.db".into(),
            cache_pages: 4096,
            page_size: 1024,
            wal: false,
            fresh: true,
        };
        opener.open(&config).unwrap()
    }

    #[test]
    fn test_log_is_shared_across_reopens() {
        let mut opener = MockOpener::new();
        let handle = opener.clone();

        let mut store = open(&mut opener);
        store.upsert(b"a", b"1").unwrap();
        store.close().unwrap();

        let mut store = open(&mut opener);
        store.point_read(b"a").unwrap();

        let ops = handle.ops();
        assert_eq!(ops.len(), 5);
        assert!(matches!(ops[0], StoreOp::Open { fresh: true }));
        assert!(matches!(ops[2], StoreOp::Close));
        assert!(matches!(ops[3], StoreOp::Open { fresh: true }));
    }

    #[test]
    fn test_reopened_store_starts_empty() {
        let mut opener = MockOpener::new();

        let mut store = open(&mut opener);
        store.upsert(b"a", b"1").unwrap();
        assert_eq!(store.point_read(b"a").unwrap(), 1);
        store.close().unwrap();

        let mut store = open(&mut opener);
        assert_eq!(store.point_read(b"a").unwrap(), 0);
    }

    #[test]
    fn test_scan_visits_keys_in_order() {
        let mut opener = MockOpener::new();
        let mut store = open(&mut opener);
        for key in [b"b", b"a", b"c"] {
            store.upsert(key, b"v").unwrap();
        }

        let mut keys = Vec::new();
        let visited = store
            .scan(2, &mut |key, _value| keys.push(key.to_vec()))
            .unwrap();
        assert_eq!(visited, 2);
        assert_eq!(keys, vec![b"a".to_vec(), b"b".to_vec()]);
    }
}
