// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed persistent key-value store for application-local settings.
//!
//! Values of the built-in catalog (booleans, fixed-width integers and
//! floats, text, blobs, timestamps, sequences, mappings and serde-coded
//! records) serialize into self-describing binary frames, persist as
//! rows of a SQLite key→blob relation, and stay mirrored in a
//! discardable in-memory overlay so repeated reads skip the fetch/decode
//! round trip.
//!
//! # Architecture
//!
//! ```text
//! PrefStore (coordinator)
//! +-- Overlay   (discardable key → decoded-value mirror)
//! +-- RowStore  (durable key → blob relation; SqliteStore)
//! +-- codec     (type-tagged binary frames)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use prefstore::PrefStore;
//!
//! # fn main() -> Result<(), prefstore::StoreError> {
//! let store = PrefStore::open("settings.db")?;
//! store.set("volume", 11i64)?;
//! let volume: i64 = store.get("volume")?;
//! assert_eq!(volume, 11);
//! # Ok(())
//! # }
//! ```

pub mod codec;
mod config;
mod overlay;
pub mod row;
pub mod sqlite;
pub mod store;

pub use codec::{
    Blob, CacheDecode, CacheEncode, DecodeError, EncodeError, JsonRecord, TypeTag,
};
pub use row::RowStore;
pub use sqlite::SqliteStore;
pub use store::{reset_standard, standard, PrefStore, StoreError};
