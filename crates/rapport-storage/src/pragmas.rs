//! SQLite PRAGMA configuration. Must run on every connection immediately after opening.

use rusqlite::Connection;

use rapport_core::RapportResult;

use crate::to_storage_err;

const BASE_PRAGMAS: &str = "
    PRAGMA journal_mode = WAL;
    PRAGMA synchronous = NORMAL;
    PRAGMA foreign_keys = ON;
    PRAGMA busy_timeout = 5000;
    PRAGMA cache_size = -8000;
    PRAGMA temp_store = MEMORY;
";

/// Configure the writer connection.
pub fn configure_connection(conn: &Connection) -> RapportResult<()> {
    conn.execute_batch(BASE_PRAGMAS)
        .map_err(|e| to_storage_err(format!("configure connection: {e}")))
}

/// Configure a reader: same PRAGMAs plus `query_only` so reads can never write.
pub fn configure_readonly_connection(conn: &Connection) -> RapportResult<()> {
    conn.execute_batch(BASE_PRAGMAS)
        .and_then(|_| conn.execute_batch("PRAGMA query_only = ON;"))
        .map_err(|e| to_storage_err(format!("configure reader: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pragma_i64(conn: &Connection, name: &str) -> i64 {
        conn.pragma_query_value(None, name, |row| row.get(0)).unwrap()
    }

    #[test]
    fn writer_pragmas_applied() {
        let conn = Connection::open_in_memory().unwrap();
        configure_connection(&conn).unwrap();

        let journal_mode: String = conn
            .pragma_query_value(None, "journal_mode", |row| row.get(0))
            .unwrap();
        // In-memory databases report "memory" instead of "wal".
        assert!(journal_mode == "wal" || journal_mode == "memory");
        assert_eq!(pragma_i64(&conn, "busy_timeout"), 5000);
        assert_eq!(pragma_i64(&conn, "foreign_keys"), 1);
    }

    #[test]
    fn reader_is_query_only() {
        let conn = Connection::open_in_memory().unwrap();
        configure_readonly_connection(&conn).unwrap();
        assert_eq!(pragma_i64(&conn, "query_only"), 1);
        assert!(conn.execute_batch("CREATE TABLE t (x INTEGER)").is_err());
    }
}
