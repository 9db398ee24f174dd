//! Database connection management

use crate::errors::{from_rusqlite, Result};
use rusqlite::Connection;
use staffdb_core::DatabaseConfig;
use std::path::Path;

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(from_rusqlite)
}

/// Open a private in-memory SQLite database
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Open the database named by `config` and apply its connection settings
pub fn open_with_config(config: &DatabaseConfig) -> Result<Connection> {
    let conn = if config.is_in_memory() {
        open_in_memory()?
    } else {
        open(&config.path)?
    };
    configure(&conn, config)?;
    Ok(conn)
}

/// Apply connection settings
///
/// Foreign keys are off by default in SQLite and must be enabled per
/// connection. File databases also switch to WAL journaling.
pub fn configure(conn: &Connection, config: &DatabaseConfig) -> Result<()> {
    configure_pragmas(conn, config.foreign_keys, !config.is_in_memory())
}

/// Set `PRAGMA foreign_keys` and optionally switch to WAL journaling
pub fn configure_pragmas(conn: &Connection, foreign_keys: bool, wal: bool) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", foreign_keys)
        .map_err(from_rusqlite)?;

    if wal {
        // journal_mode reports the resulting mode as a row
        let _mode: String = conn
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .map_err(from_rusqlite)?;
    }

    Ok(())
}

/// Whether `PRAGMA foreign_keys` is on for this connection
pub fn foreign_keys_enabled(conn: &Connection) -> Result<bool> {
    conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0))
        .map_err(from_rusqlite)
}
