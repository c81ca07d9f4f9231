// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Row store abstraction
//!
//! Defines the boundary to the durable key→blob relation consumed by the
//! cache coordinator. Keys are unique by coordinator contract; rowids
//! are stable for a row's lifetime; each operation is individually
//! atomic, and no multi-statement transactions are exposed.

use crate::store::StoreError;

/// Durable key→blob relation with stable row identifiers.
///
/// # Implementations
///
/// - `SqliteStore` -- default, file-backed or in-memory
pub trait RowStore: Send + Sync {
    /// Look up the rowid holding `key`, if any.
    fn find(&self, key: &str) -> Result<Option<i64>, StoreError>;

    /// Insert a new row. The caller has confirmed the key is absent.
    fn insert(&self, key: &str, payload: &[u8]) -> Result<(), StoreError>;

    /// Replace the blob of an existing row.
    fn update(&self, rowid: i64, payload: &[u8]) -> Result<(), StoreError>;

    /// Fetch the blob of a row, if the row still exists.
    fn select(&self, rowid: i64) -> Result<Option<Vec<u8>>, StoreError>;

    /// Delete one row.
    fn delete(&self, rowid: i64) -> Result<(), StoreError>;

    /// Delete every row.
    fn delete_all(&self) -> Result<(), StoreError>;

    /// Total number of rows stored.
    fn count(&self) -> Result<usize, StoreError>;
}
