/// In-process storage adapter.
///
/// Holds the serialized record in a mutex-guarded slot. Used by tests and by
/// hosts that want a board without durability. Storing the raw string rather
/// than a parsed `Board` keeps the load path identical to the filesystem
/// adapter, so corruption handling can be exercised via `set_raw`.
use std::sync::Mutex;

use crate::types::Board;

use super::{SnapshotStorage, StorageError};

#[derive(Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the raw slot content, bypassing serialization. Test hook for
    /// planting malformed or invariant-violating records.
    pub fn set_raw(&self, content: impl Into<String>) {
        *self.slot.lock().unwrap() = Some(content.into());
    }

    /// Raw slot content, if any.
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().unwrap().clone()
    }
}

impl SnapshotStorage for MemoryStorage {
    fn load(&self) -> Option<Board> {
        let slot = self.slot.lock().unwrap();
        let content = slot.as_deref()?;

        let board: Board = match serde_json::from_str(content) {
            Ok(b) => b,
            Err(e) => {
                log::warn!("[taskboard.storage.load] Corrupted memory slot: {}", e);
                return None;
            }
        };

        if let Err(v) = board.validate() {
            log::warn!(
                "[taskboard.storage.load] Invariant violation in memory slot: {}",
                v
            );
            return None;
        }

        Some(board)
    }

    fn save(&self, board: &Board) -> Result<(), StorageError> {
        let content = serde_json::to_string(board)?;
        *self.slot.lock().unwrap() = Some(content);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.slot.lock().unwrap() = None;
        Ok(())
    }
}
