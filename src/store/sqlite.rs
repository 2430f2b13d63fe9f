//! SQLite storage backend
//!
//! Thin glue between the [`KvStore`] operation set and rusqlite. The
//! benchmark table is two blob columns with a primary key on the first;
//! workload statements are prepared once per connection and reused through
//! rusqlite's statement cache.

use rusqlite::{params, Connection};

use super::{KvStore, StoreConfig, StoreError, StoreOpener};

/// Opens [`SqliteStore`] handles
#[derive(Debug, Default)]
pub struct SqliteOpener;

impl StoreOpener for SqliteOpener {
    type Store = SqliteStore;

    fn open(&mut self, config: &StoreConfig) -> Result<SqliteStore, StoreError> {
        SqliteStore::open(config)
    }
}

/// One open SQLite database configured for the benchmark
pub struct SqliteStore {
    conn: Connection,
    wal: bool,
}

impl SqliteStore {
    /// Open a database file and apply the benchmark configuration
    ///
    /// Sets cache size, page size (when it differs from the SQLite default
    /// of 1024), journal mode and exclusive locking, and creates the table
    /// on fresh opens. Pragmas that report their new value are read through
    /// `query_row` since they return a result row.
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let conn = Connection::open(&config.path).map_err(StoreError::Open)?;

        conn.execute_batch(&format!("PRAGMA cache_size = {}", config.cache_pages))
            .map_err(StoreError::Open)?;
        if config.page_size != 1024 {
            conn.execute_batch(&format!("PRAGMA page_size = {}", config.page_size))
                .map_err(StoreError::Open)?;
        }
        if config.wal {
            let _mode: String = conn
                .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))
                .map_err(StoreError::Open)?;
            let _pages: i64 = conn
                .query_row("PRAGMA wal_autocheckpoint = 4096", [], |row| row.get(0))
                .map_err(StoreError::Open)?;
        }
        let _mode: String = conn
            .query_row("PRAGMA locking_mode = EXCLUSIVE", [], |row| row.get(0))
            .map_err(StoreError::Open)?;

        if config.fresh {
            conn.execute_batch("CREATE TABLE test (key blob, value blob, PRIMARY KEY (key))")
                .map_err(StoreError::Open)?;
        }

        Ok(Self {
            conn,
            wal: config.wal,
        })
    }
}

impl KvStore for SqliteStore {
    fn upsert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        let mut stmt = self
            .conn
            .prepare_cached("REPLACE INTO test (key, value) VALUES (?1, ?2)")?;
        stmt.execute(params![key, value])?;
        Ok(())
    }

    fn point_read(&mut self, key: &[u8]) -> Result<usize, StoreError> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT * FROM test WHERE key = ?1")?;
        let mut rows = stmt.query(params![key])?;
        let mut count = 0;
        while rows.next()?.is_some() {
            count += 1;
        }
        Ok(count)
    }

    fn scan(
        &mut self,
        limit: usize,
        on_row: &mut dyn FnMut(&[u8], &[u8]),
    ) -> Result<usize, StoreError> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT key, value FROM test ORDER BY key")?;
        let mut rows = stmt.query([])?;
        let mut visited = 0;
        while visited < limit {
            let Some(row) = rows.next()? else { break };
            let key = row.get_ref(0)?.as_blob().map_err(rusqlite::Error::from)?;
            let value = row.get_ref(1)?.as_blob().map_err(rusqlite::Error::from)?;
            on_row(key, value);
            visited += 1;
        }
        Ok(visited)
    }

    fn begin_transaction(&mut self) -> Result<(), StoreError> {
        let mut stmt = self.conn.prepare_cached("BEGIN TRANSACTION")?;
        stmt.execute([])?;
        Ok(())
    }

    fn end_transaction(&mut self) -> Result<(), StoreError> {
        let mut stmt = self.conn.prepare_cached("END TRANSACTION")?;
        stmt.execute([])?;
        Ok(())
    }

    fn set_synchronous(&mut self, full: bool) -> Result<(), StoreError> {
        let pragma = if full {
            "PRAGMA synchronous = FULL"
        } else {
            "PRAGMA synchronous = OFF"
        };
        self.conn.execute_batch(pragma)?;
        Ok(())
    }

    fn checkpoint(&mut self) -> Result<(), StoreError> {
        if self.wal {
            self.conn
                .query_row("PRAGMA wal_checkpoint(FULL)", [], |_row| Ok(()))?;
        }
        Ok(())
    }

    fn close(self) -> Result<(), StoreError> {
        self.conn.close().map_err(|(_conn, err)| StoreError::Close(err))
    }
}
