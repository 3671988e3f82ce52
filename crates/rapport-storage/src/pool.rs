//! ConnectionPool: writer + read pool with round-robin selection.
//!
//! The only place in the crate that holds `Mutex<Connection>`.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use rusqlite::{Connection, OpenFlags};

use rapport_core::errors::StorageError;
use rapport_core::{RapportError, RapportResult};

use crate::pragmas::{configure_connection, configure_readonly_connection};
use crate::to_storage_err;

/// Default number of reader connections.
const DEFAULT_READ_POOL_SIZE: usize = 2;

/// 1 writer + N readers. WAL mode on all connections.
pub struct ConnectionPool {
    writer: Mutex<Connection>,
    readers: Vec<Mutex<Connection>>,
    read_index: AtomicUsize,
}

impl ConnectionPool {
    /// Open a file-backed pool. The writer is opened first so the file exists
    /// before the read-only connections attach to it.
    pub fn open(path: &Path, read_pool_size: usize) -> RapportResult<Self> {
        let pool_size = if read_pool_size == 0 {
            DEFAULT_READ_POOL_SIZE
        } else {
            read_pool_size
        };

        let writer = Connection::open(path)
            .map_err(|e| to_storage_err(format!("open writer {}: {e}", path.display())))?;
        configure_connection(&writer)?;

        let mut readers = Vec::with_capacity(pool_size);
        for i in 0..pool_size {
            let reader = Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
            .map_err(|e| to_storage_err(format!("open reader {i}: {e}")))?;
            configure_readonly_connection(&reader)?;
            readers.push(Mutex::new(reader));
        }

        Ok(Self {
            writer: Mutex::new(writer),
            readers,
            read_index: AtomicUsize::new(0),
        })
    }

    /// Open an in-memory pool. Separate in-memory connections do not share data,
    /// so there are no readers and reads go through the writer.
    pub fn open_in_memory() -> RapportResult<Self> {
        let writer = Connection::open_in_memory()
            .map_err(|e| to_storage_err(format!("open in-memory writer: {e}")))?;
        configure_connection(&writer)?;

        Ok(Self {
            writer: Mutex::new(writer),
            readers: Vec::new(),
            read_index: AtomicUsize::new(0),
        })
    }

    pub fn with_writer<F, T>(&self, f: F) -> RapportResult<T>
    where
        F: FnOnce(&Connection) -> RapportResult<T>,
    {
        let conn = self
            .writer
            .lock()
            .map_err(|e| poisoned(format!("writer: {e}")))?;
        f(&conn)
    }

    /// Execute a closure with a reader connection (round-robin).
    /// Falls back to the writer in in-memory mode.
    pub fn with_reader<F, T>(&self, f: F) -> RapportResult<T>
    where
        F: FnOnce(&Connection) -> RapportResult<T>,
    {
        if self.readers.is_empty() {
            return self.with_writer(f);
        }

        let index = self.read_index.fetch_add(1, Ordering::Relaxed) % self.readers.len();
        let conn = self.readers[index]
            .lock()
            .map_err(|e| poisoned(format!("reader {index}: {e}")))?;
        f(&conn)
    }

    pub fn reader_count(&self) -> usize {
        self.readers.len()
    }

    /// Check WAL mode on the writer connection.
    pub fn is_wal_mode(&self) -> bool {
        self.with_writer(|conn| {
            let mode: String = conn
                .query_row("PRAGMA journal_mode", [], |row| row.get(0))
                .unwrap_or_default();
            Ok(mode.eq_ignore_ascii_case("wal"))
        })
        .unwrap_or(false)
    }
}

fn poisoned(msg: String) -> RapportError {
    RapportError::StorageError(StorageError::LockPoisoned(msg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_reads_through_writer() {
        let pool = ConnectionPool::open_in_memory().unwrap();
        assert_eq!(pool.reader_count(), 0);
        pool.with_writer(|conn| {
            conn.execute_batch("CREATE TABLE t (x INTEGER); INSERT INTO t VALUES (7);")
                .map_err(|e| to_storage_err(e.to_string()))
        })
        .unwrap();
        let x: i64 = pool
            .with_reader(|conn| {
                conn.query_row("SELECT x FROM t", [], |row| row.get(0))
                    .map_err(|e| to_storage_err(e.to_string()))
            })
            .unwrap();
        assert_eq!(x, 7);
    }

    #[test]
    fn file_pool_uses_wal_and_default_reader_count() {
        let dir = tempfile::tempdir().unwrap();
        let pool = ConnectionPool::open(&dir.path().join("rapport.db"), 0).unwrap();
        assert_eq!(pool.reader_count(), DEFAULT_READ_POOL_SIZE);
        assert!(pool.is_wal_mode());
    }
}
