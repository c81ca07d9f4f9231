// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! SQLite row store backend
//!
//! Durable key→blob relation addressed by SQLite's implicit rowid.

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use crate::row::RowStore;
use crate::store::StoreError;

/// SQLite-backed row store.
///
/// Thread-safe via internal Mutex (SQLite `Connection` is not `Sync`).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE cache (
///     k TEXT NOT NULL,
///     v BLOB NOT NULL
/// );
/// ```
///
/// Rows are addressed by SQLite's implicit rowid. Key uniqueness is the
/// coordinator's contract, not a schema constraint.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a file-backed store at `path`.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        log::info!("cache file: {}", path.display());

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing).
    pub fn new_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "CREATE TABLE IF NOT EXISTS cache (
                k TEXT NOT NULL,
                v BLOB NOT NULL
            )",
            [],
        )?;
        Ok(())
    }
}

impl RowStore for SqliteStore {
    fn find(&self, key: &str) -> Result<Option<i64>, StoreError> {
        let conn = self.conn.lock();
        let rowid = conn
            .query_row(
                "SELECT rowid FROM cache WHERE k = ?1 LIMIT 1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(rowid)
    }

    fn insert(&self, key: &str, payload: &[u8]) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO cache (k, v) VALUES (?1, ?2)",
            params![key, payload],
        )?;
        Ok(())
    }

    fn update(&self, rowid: i64, payload: &[u8]) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "UPDATE cache SET v = ?2 WHERE rowid = ?1",
            params![rowid, payload],
        )?;
        Ok(())
    }

    fn select(&self, rowid: i64) -> Result<Option<Vec<u8>>, StoreError> {
        let conn = self.conn.lock();
        let payload = conn
            .query_row("SELECT v FROM cache WHERE rowid = ?1", [rowid], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(payload)
    }

    fn delete(&self, rowid: i64) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM cache WHERE rowid = ?1", [rowid])?;
        Ok(())
    }

    fn delete_all(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM cache", [])?;
        Ok(())
    }

    fn count(&self) -> Result<usize, StoreError> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM cache", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
