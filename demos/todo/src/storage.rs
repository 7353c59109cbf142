//! Persistence of the item list in a single named slot.
//!
//! The slot holds JSON. Writes always use the versioned envelope
//! `{"version":1,"items":[...]}`; reads also accept the bare array of
//! records that earlier releases wrote.

use crate::types::{Item, ItemId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tasklist_core::environment::{SlotStorage, StorageError};

/// Schema version written into every saved slot
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    items: &'a [Item],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Persisted {
    Envelope { version: u32, items: Vec<Item> },
    Legacy(Vec<Item>),
}

/// Loads and saves the full item list
#[derive(Clone)]
pub struct TodoStorage {
    backend: Arc<dyn SlotStorage>,
    slot: String,
}

impl std::fmt::Debug for TodoStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoStorage")
            .field("slot", &self.slot)
            .finish_non_exhaustive()
    }
}

impl TodoStorage {
    /// Creates storage over `backend`, using the slot named `slot`
    #[must_use]
    pub fn new(backend: Arc<dyn SlotStorage>, slot: impl Into<String>) -> Self {
        Self {
            backend,
            slot: slot.into(),
        }
    }

    /// Slot name
    #[must_use]
    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Loads the persisted items
    ///
    /// Never fails: a missing slot, an unreadable backend or malformed text
    /// all produce an empty list.
    #[must_use]
    pub fn load(&self) -> Vec<Item> {
        let text = match self.backend.read(&self.slot) {
            Ok(Some(text)) => text,
            Ok(None) => {
                tracing::debug!(slot = %self.slot, "No persisted items, starting empty");
                return Vec::new();
            },
            Err(error) => {
                tracing::warn!(slot = %self.slot, %error, "Failed to read slot, starting empty");
                return Vec::new();
            },
        };

        let items = match serde_json::from_str::<Persisted>(&text) {
            Ok(Persisted::Envelope { version, items }) if version == SCHEMA_VERSION => items,
            Ok(Persisted::Envelope { version, .. }) => {
                tracing::warn!(slot = %self.slot, version, "Unsupported schema version, starting empty");
                return Vec::new();
            },
            Ok(Persisted::Legacy(items)) => items,
            Err(error) => {
                tracing::warn!(slot = %self.slot, %error, "Malformed slot contents, starting empty");
                return Vec::new();
            },
        };

        let items = repair(items);
        tracing::debug!(slot = %self.slot, count = items.len(), "Loaded items");
        items
    }

    /// Overwrites the slot with `items`
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if encoding or the backend write fails.
    pub fn save(&self, items: &[Item]) -> Result<(), StorageError> {
        let text = serde_json::to_string(&EnvelopeRef {
            version: SCHEMA_VERSION,
            items,
        })
        .map_err(|e| StorageError::Serialization(e.to_string()))?;

        self.backend.write(&self.slot, &text)?;
        tracing::debug!(slot = %self.slot, count = items.len(), "Saved items");
        Ok(())
    }
}

/// Restores the list invariants on data read from disk: trimmed non-blank
/// titles and unique ids (first occurrence wins).
fn repair(items: Vec<Item>) -> Vec<Item> {
    let mut seen: HashSet<ItemId> = HashSet::with_capacity(items.len());
    let mut repaired = Vec::with_capacity(items.len());

    for mut item in items {
        let title = item.title.trim();
        if title.is_empty() {
            tracing::warn!(id = %item.id, "Dropping persisted item with blank title");
            continue;
        }
        if !seen.insert(item.id.clone()) {
            tracing::warn!(id = %item.id, "Dropping persisted item with duplicate id");
            continue;
        }
        if title.len() != item.title.len() {
            item.title = title.to_string();
        }
        repaired.push(item);
    }

    repaired
}

/// Slot storage backed by one JSON file per slot in a directory
#[derive(Debug, Clone)]
pub struct FileSlotStorage {
    dir: PathBuf,
}

impl FileSlotStorage {
    /// Stores slots under `dir`, created on first write
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the slot files
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `slot`
    #[must_use]
    pub fn path_for(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{slot}.json"))
    }
}

impl SlotStorage for FileSlotStorage {
    fn read(&self, slot: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(slot)) {
            Ok(text) => Ok(Some(text)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn write(&self, slot: &str, contents: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        // Rename over the old file so a crash never leaves a half-written slot.
        let tmp = self.dir.join(format!(".{slot}.json.tmp"));
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, self.path_for(slot))?;
        Ok(())
    }
}
