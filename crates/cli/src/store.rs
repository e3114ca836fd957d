// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Slot persistence: one JSON file per slot with atomic writes.

use std::path::PathBuf;

use crate::record::{CredentialRecord, Slot};

/// File-backed store holding one record file per slot in a data directory.
#[derive(Debug, Clone)]
pub struct RecordStore {
    dir: PathBuf,
}

impl RecordStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file backing `slot`.
    pub fn path(&self, slot: Slot) -> PathBuf {
        self.dir.join(slot.file_name())
    }

    /// Load the record for `slot`.
    ///
    /// Missing, unreadable, malformed, and partial files all read as `None`.
    /// A record the store cannot fully parse does not exist.
    pub fn load(&self, slot: Slot) -> Option<CredentialRecord> {
        let path = self.path(slot);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    tracing::debug!("credential file {} unreadable: {err}", path.display());
                }
                return None;
            }
        };
        let raw: serde_json::Value = match serde_json::from_str(&contents) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::debug!("credential file {} is not valid JSON: {err}", path.display());
                return None;
            }
        };
        let record = CredentialRecord::decode(slot, &raw);
        if record.is_none() {
            tracing::debug!("credential file {} is missing required fields", path.display());
        }
        record
    }

    /// Save the record for `slot` atomically (write tmp + rename).
    ///
    /// The temp filename is unique per process and call so that concurrent
    /// saves cannot corrupt each other through a shared `.tmp` file.
    pub fn save(&self, slot: Slot, record: &CredentialRecord) -> anyhow::Result<()> {
        use std::sync::atomic::{AtomicU32, Ordering};
        static COUNTER: AtomicU32 = AtomicU32::new(0);

        std::fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(&record.encode(slot))?;
        let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
        let tmp_name = format!("{}.{}.{}.tmp", slot.file_name(), std::process::id(), seq);
        let tmp_path = self.dir.join(tmp_name);
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, self.path(slot))?;
        Ok(())
    }

    /// Delete the record for `slot`. Deleting an absent file is not an error.
    pub fn delete(&self, slot: Slot) -> anyhow::Result<()> {
        match std::fs::remove_file(self.path(slot)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
