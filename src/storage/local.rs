/// Filesystem storage adapter.
///
/// Persists the board as one JSON document under a fixed file name in a
/// caller-supplied directory, with:
/// - Atomic writes (write to .tmp, fsync, rename, fsync directory)
/// - Corruption downgraded to "absent" on load, never a hard failure
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::types::Board;

use super::{SnapshotStorage, StorageError, STORAGE_KEY};

/// Board storage backed by a single file on the local filesystem.
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    /// Storage rooted at `dir`; the slot itself is `dir`/`STORAGE_KEY`.
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(STORAGE_KEY),
        }
    }

    /// Path of the persisted slot (diagnostics, tests).
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Atomic write: write to .tmp, fsync, rename over the slot, fsync the
    /// directory so the rename survives a crash.
    fn atomic_write(path: &Path, content: &str) -> Result<(), std::io::Error> {
        let tmp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)?;

        if let Some(dir) = path.parent() {
            if let Ok(d) = fs::File::open(dir) {
                let _ = d.sync_all();
            }
        }
        Ok(())
    }
}

impl SnapshotStorage for LocalStorage {
    fn load(&self) -> Option<Board> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                log::warn!(
                    "[taskboard.storage.load] Unreadable slot {:?}: {}",
                    self.path,
                    e
                );
                return None;
            }
        };

        let board: Board = match serde_json::from_str(&content) {
            Ok(b) => b,
            Err(e) => {
                log::warn!(
                    "[taskboard.storage.load] Corrupted slot {:?}: {}",
                    self.path,
                    e
                );
                return None;
            }
        };

        if let Err(v) = board.validate() {
            log::warn!(
                "[taskboard.storage.load] Invariant violation in slot {:?}: {}",
                self.path,
                v
            );
            return None;
        }

        Some(board)
    }

    fn save(&self, board: &Board) -> Result<(), StorageError> {
        let content = serde_json::to_string(board)?;
        Self::atomic_write(&self.path, &content)?;
        log::debug!(
            "[taskboard.storage.save] Wrote {} tasks to {:?}",
            board.task_count(),
            self.path
        );
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
