// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Cache coordinator
//!
//! `PrefStore` composes the in-memory overlay with a durable row store:
//! reads go overlay-first, falling back to row fetch + decode + overlay
//! population; writes go to the row store and then refresh the overlay
//! entry. A single lock serializes overlay access; every access runs
//! inside a `begin_access`/`end_access` bracket.

use std::any::Any;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use parking_lot::Mutex;

use crate::codec::{CacheDecode, CacheEncode, DecodeError, EncodeError};
use crate::config;
use crate::overlay::{Overlay, OverlayEntry};
use crate::row::RowStore;
use crate::sqlite::SqliteStore;

/// Coordinator failure.
#[derive(Debug)]
pub enum StoreError {
    /// The key has no overlay entry and no durable row.
    NoSuchValue { key: String },
    /// A value could not be encoded into a frame.
    Encode(EncodeError),
    /// A stored frame could not be decoded as the requested type.
    Decode(DecodeError),
    /// Row store I/O failure, propagated unmodified.
    Database(rusqlite::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NoSuchValue { key } => write!(f, "no such value for key '{}'", key),
            StoreError::Encode(e) => write!(f, "encode failed: {}", e),
            StoreError::Decode(e) => write!(f, "decode failed: {}", e),
            StoreError::Database(e) => write!(f, "database error: {}", e),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StoreError::NoSuchValue { .. } => None,
            StoreError::Encode(e) => Some(e),
            StoreError::Decode(e) => Some(e),
            StoreError::Database(e) => Some(e),
        }
    }
}

impl From<EncodeError> for StoreError {
    fn from(e: EncodeError) -> Self {
        StoreError::Encode(e)
    }
}

impl From<DecodeError> for StoreError {
    fn from(e: DecodeError) -> Self {
        StoreError::Decode(e)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e)
    }
}

/// Two-tier typed key-value store: a decoded-value overlay over a
/// durable row store.
pub struct PrefStore {
    rows: Box<dyn RowStore>,
    overlay: Mutex<Overlay>,
}

impl PrefStore {
    /// Open a store backed by a SQLite file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Ok(Self::with_store(Box::new(SqliteStore::new(path)?)))
    }

    /// Open the store at the platform default location, honoring the
    /// configuration-file override.
    pub fn open_default() -> Result<Self, StoreError> {
        Self::open(default_store_path())
    }

    /// Compose the coordinator over a custom row store backend.
    pub fn with_store(rows: Box<dyn RowStore>) -> Self {
        PrefStore {
            rows,
            overlay: Mutex::new(Overlay::new()),
        }
    }

    /// Insert or update the value for `key`.
    ///
    /// The durable row is written first, then the overlay entry is
    /// created or refreshed (always-populate write policy).
    pub fn set<T>(&self, key: &str, value: T) -> Result<(), StoreError>
    where
        T: CacheEncode + Any + Send + Sync,
    {
        let frame = value.to_frame()?;
        // find-then-write is two store operations, not one transaction:
        // concurrent writers to the same key can interleave here.
        match self.rows.find(key)? {
            Some(rowid) => self.rows.update(rowid, &frame)?,
            None => self.rows.insert(key, &frame)?,
        }
        self.with_overlay(|entries| {
            entries.insert(key.to_string(), Box::new(value) as OverlayEntry);
        });
        Ok(())
    }

    /// Fetch the value for `key`, overlay-first.
    ///
    /// A type-compatible overlay entry is returned directly; otherwise
    /// the durable row is fetched, decoded as `T` and mirrored into the
    /// overlay. Fails with `NoSuchValue` when no row exists; decode
    /// failures propagate unchanged.
    pub fn get<T>(&self, key: &str) -> Result<T, StoreError>
    where
        T: CacheDecode + Any + Clone + Send + Sync,
    {
        let hit = self.with_overlay(|entries| {
            entries
                .get(key)
                .and_then(|entry| entry.downcast_ref::<T>())
                .cloned()
        });
        if let Some(value) = hit {
            return Ok(value);
        }

        let rowid = self
            .rows
            .find(key)?
            .ok_or_else(|| StoreError::NoSuchValue {
                key: key.to_string(),
            })?;
        let payload = self
            .rows
            .select(rowid)?
            .ok_or_else(|| StoreError::NoSuchValue {
                key: key.to_string(),
            })?;
        let (value, _rest) = T::decode_from(&payload)?;
        self.with_overlay(|entries| {
            entries.insert(key.to_string(), Box::new(value.clone()) as OverlayEntry);
        });
        Ok(value)
    }

    /// Remove `key` from both tiers. No-op when the key is absent.
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        if let Some(rowid) = self.rows.find(key)? {
            self.with_overlay(|entries| {
                entries.remove(key);
            });
            self.rows.delete(rowid)?;
        }
        Ok(())
    }

    /// Clear both tiers.
    pub fn remove_all(&self) -> Result<(), StoreError> {
        self.with_overlay(|entries| entries.clear());
        self.rows.delete_all()
    }

    /// External memory-pressure hook: drop the overlay entries when no
    /// access bracket is open. A later `get` transparently reloads.
    ///
    /// Returns true when the content is discarded afterwards.
    pub fn discard_overlay(&self) -> bool {
        self.overlay.lock().discard_if_possible()
    }

    /// Direct access to the underlying row store.
    pub fn rows(&self) -> &dyn RowStore {
        self.rows.as_ref()
    }

    /// Run `f` inside one guarded overlay access bracket.
    ///
    /// The guard is scoped, so the lock is released on every exit path;
    /// `begin_access` reloads a discarded overlay before `f` runs.
    fn with_overlay<R>(&self, f: impl FnOnce(&mut HashMap<String, OverlayEntry>) -> R) -> R {
        let mut overlay = self.overlay.lock();
        let entries = overlay.begin_access();
        let result = f(entries);
        overlay.end_access();
        result
    }
}

/// Default database location: the configuration override when present,
/// else `prefstore.standard.db` in the platform local-data directory
/// (falling back to the working directory).
fn default_store_path() -> PathBuf {
    if let Some(path) = config::storage_override() {
        return path;
    }
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("prefstore.standard.db")
}

static STANDARD: OnceLock<PrefStore> = OnceLock::new();

/// Process-wide standard store, lazily opened once at the default
/// location.
pub fn standard() -> Result<&'static PrefStore, StoreError> {
    if let Some(store) = STANDARD.get() {
        return Ok(store);
    }
    // Built outside get_or_init so an open failure propagates instead of
    // poisoning the cell; a racing thread's spare instance is dropped.
    let store = PrefStore::open_default()?;
    Ok(STANDARD.get_or_init(|| store))
}

/// Clear both tiers of the standard store. No-op when the standard
/// store was never opened.
pub fn reset_standard() -> Result<(), StoreError> {
    match STANDARD.get() {
        Some(store) => store.remove_all(),
        None => Ok(()),
    }
}
