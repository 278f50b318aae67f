/// Core library for the kanban task board.
///
/// The board is a fixed set of three columns (`ideas`, `in-progress`,
/// `completed`) holding ordered tasks. `BoardStore` is the single owner and
/// mutator of board state; `SnapshotStorage` adapters persist snapshots to a
/// durable local slot. Rendering layers talk to the store through
/// `BoardIntent` dispatch and snapshot subscriptions only.
pub mod intent;
pub mod storage;
pub mod store;
pub mod types;

pub use intent::BoardIntent;
pub use storage::{local::LocalStorage, memory::MemoryStorage, SnapshotStorage, StorageError};
pub use store::{BoardError, BoardEvent, BoardStore, SubscriptionId};
pub use types::{Board, BoardViolation, Column, ColumnId, Task, SCHEMA_VERSION};
