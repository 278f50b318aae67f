pub mod local;
pub mod memory;

use crate::types::Board;

/// File name of the persisted board slot (under the adapter's directory).
/// The `v1` suffix tracks `SCHEMA_VERSION`; a future incompatible layout
/// gets a new slot instead of overwriting this one.
pub const STORAGE_KEY: &str = "taskboard.v1.json";

/// Abstract storage seam for the persisted board snapshot.
/// Implementations: LocalStorage (filesystem), MemoryStorage (tests,
/// ephemeral stores).
pub trait SnapshotStorage: Send + Sync {
    /// Read the persisted board. `None` means "nothing usable": the slot is
    /// absent, unreadable, fails to deserialize, or violates board
    /// invariants. Corruption is diagnosed via `log::warn` and downgraded to
    /// `None`, never surfaced as an error — the caller falls back to the
    /// default board.
    fn load(&self) -> Option<Board>;

    /// Atomically replace the persisted board. On failure the previous
    /// value stays intact and readable.
    fn save(&self, board: &Board) -> Result<(), StorageError>;

    /// Remove the persisted value entirely (explicit reset flows).
    fn clear(&self) -> Result<(), StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
