// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Discardable in-memory overlay
//!
//! The overlay mirrors a subset of durable rows as decoded values. It is
//! cooperatively discardable: callers bracket every access with
//! `begin_access`/`end_access`, and an external pressure signal may drop
//! the entries whenever the refcount is zero. A discarded overlay
//! reloads empty on the next `begin_access`.

use std::any::Any;
use std::collections::HashMap;

/// Type-erased decoded value held for a key.
pub(crate) type OverlayEntry = Box<dyn Any + Send + Sync>;

/// Active ⇄ Discarded state machine with an access refcount.
///
/// Active holds the entry map; Discarded holds nothing. The transitions:
/// `begin_access` reloads a discarded overlay (empty entries, refcount
/// 1) or bumps the refcount of an active one; `discard_if_possible`
/// drops the entries only at refcount zero.
pub(crate) struct Overlay {
    entries: Option<HashMap<String, OverlayEntry>>,
    access_count: u32,
}

impl Overlay {
    pub(crate) fn new() -> Self {
        Overlay {
            entries: Some(HashMap::new()),
            access_count: 0,
        }
    }

    /// Enter an access bracket and expose the entries.
    pub(crate) fn begin_access(&mut self) -> &mut HashMap<String, OverlayEntry> {
        if self.is_discarded() {
            self.reload();
        } else {
            self.access_count += 1;
        }
        self.entries.get_or_insert_with(HashMap::new)
    }

    /// Leave an access bracket.
    pub(crate) fn end_access(&mut self) {
        if self.access_count > 0 {
            self.access_count -= 1;
        }
    }

    /// Drop the entries if no access bracket is open.
    ///
    /// Returns true when the content is discarded afterwards.
    pub(crate) fn discard_if_possible(&mut self) -> bool {
        if self.access_count == 0 && self.entries.is_some() {
            log::debug!("overlay discarded");
            self.entries = None;
        }
        self.entries.is_none()
    }

    pub(crate) fn is_discarded(&self) -> bool {
        self.entries.is_none()
    }

    /// Rebuild an empty overlay with the refcount at 1. No-op while
    /// active.
    pub(crate) fn reload(&mut self) {
        if self.entries.is_none() {
            log::debug!("overlay reloaded after discard");
            self.entries = Some(HashMap::new());
            self.access_count = 1;
        }
    }
}
