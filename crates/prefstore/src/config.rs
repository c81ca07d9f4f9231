// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Configuration-file override for the storage location
//!
//! A line-oriented `key=value` file consulted once when the default
//! store is constructed. `#` starts a comment, whole-line or inline; a
//! missing file or key falls back to the platform default path.

use std::fs;
use std::path::{Path, PathBuf};

/// Key selecting the database path override.
const STORAGE_PATH_KEY: &str = "storage_path";

/// File name looked up next to the current executable.
const CONFIG_FILE_NAME: &str = "prefstore.conf";

/// Read the value for `key` from the config file at `path`.
///
/// Returns `None` when the file is missing, unreadable or does not
/// define the key.
pub(crate) fn read_value(path: &Path, key: &str) -> Option<String> {
    let contents = fs::read_to_string(path).ok()?;
    for line in contents.lines() {
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }
        let line = match line.find('#') {
            Some(idx) => &line[..idx],
            None => line,
        };
        if let Some((name, value)) = line.split_once('=') {
            if name.trim() == key {
                return Some(value.trim().to_string());
            }
        }
    }
    None
}

/// Location of the config file: `prefstore.conf` next to the current
/// executable.
fn config_file_path() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    Some(exe.parent()?.join(CONFIG_FILE_NAME))
}

/// Storage-path override from the config file, if one is configured.
pub(crate) fn storage_override() -> Option<PathBuf> {
    let path = config_file_path()?;
    read_value(&path, STORAGE_PATH_KEY).map(PathBuf::from)
}
