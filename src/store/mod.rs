/// The board store: single owner and sole mutator of board state.
///
/// Every operation validates its inputs before touching the board, so a
/// failed intent has no observable effect — no mutation, no notification,
/// no persistence scheduling. Successful mutations notify subscribers
/// synchronously in registration order with the new invariant-consistent
/// snapshot, emit a change event on the broadcast channel, and arm the
/// debounced persistence write.
pub mod debounce;

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::sync::broadcast;

use crate::intent::BoardIntent;
use crate::storage::SnapshotStorage;
use crate::types::{Board, ColumnId, Task};

use debounce::SaveDebouncer;

/// Handle returned by `subscribe`, consumed by `unsubscribe`.
pub type SubscriptionId = u64;

type Listener = Box<dyn FnMut(&Board) + Send>;

/// Caller-input failures, returned synchronously and never fatal to the
/// store.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BoardError {
    #[error("unknown column: {0}")]
    InvalidColumn(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("index {index} out of range (0-{max})")]
    IndexOutOfRange { index: usize, max: usize },
}

/// Change events for host event loops and UI bridges. Snapshot delivery
/// itself goes through the synchronous listener list; these carry the
/// store's monotonic version for cheap staleness checks.
#[derive(Debug, Clone)]
pub enum BoardEvent {
    Mutated { version: u64 },
    Reset { version: u64 },
    Persisted { version: u64 },
    PersistFailed { version: u64 },
}

pub struct BoardStore {
    board: Board,
    storage: Arc<dyn SnapshotStorage>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: SubscriptionId,
    /// Monotonic, bumped once per successful mutation or reset.
    version: u64,
    events: broadcast::Sender<BoardEvent>,
    debouncer: SaveDebouncer,
}

impl BoardStore {
    /// Hydrate from the storage adapter, falling back to the default
    /// three-empty-column board when the slot is absent or unusable.
    pub fn new(storage: Arc<dyn SnapshotStorage>) -> Self {
        Self::with_debounce_window(storage, debounce::DEBOUNCE_WINDOW)
    }

    /// Like `new` with an explicit write-coalescing window. Tests use a
    /// zero window to make `maintain` write immediately.
    pub fn with_debounce_window(storage: Arc<dyn SnapshotStorage>, window: Duration) -> Self {
        let board = match storage.load() {
            Some(b) => {
                log::info!(
                    "[taskboard.store.init] Hydrated board with {} tasks",
                    b.task_count()
                );
                b
            }
            None => {
                log::info!("[taskboard.store.init] No usable snapshot, starting with defaults");
                Board::default()
            }
        };

        let (events, _) = broadcast::channel(64);
        Self {
            board,
            storage,
            listeners: Vec::new(),
            next_subscription: 1,
            version: 0,
            events,
            debouncer: SaveDebouncer::new(window),
        }
    }

    // --- Mutation operations -------------------------------------------

    /// Append a new task to a column. The fresh task gets order max + 1
    /// within the column (0 when empty).
    pub fn add_task(&mut self, column_id: &str, title: &str) -> Result<Board, BoardError> {
        let column = parse_column(column_id)?;
        let title = non_empty_title(title)?;
        let id = self.fresh_task_id();

        let col = self.board.column_mut(column);
        // A hydrated snapshot may carry gaps all the way up to u32::MAX;
        // next_order saturates there, so close the gaps first rather than
        // append a duplicate order value.
        if col.tasks.last().map_or(false, |t| t.order == u32::MAX) {
            col.reindex();
        }

        let task = Task {
            id,
            title,
            created_at: chrono::Utc::now().timestamp_millis(),
            order: col.next_order(),
        };
        log::debug!(
            "[taskboard.store.add] Task {} in column {}",
            task.id,
            column
        );
        col.tasks.push(task);
        Ok(self.commit())
    }

    /// Relocate a task to `target_index` in the target column. Atomic: all
    /// validation happens before any mutation, and both affected columns
    /// are reindexed contiguously afterwards.
    pub fn move_task(
        &mut self,
        task_id: &str,
        target_column_id: &str,
        target_index: usize,
    ) -> Result<Board, BoardError> {
        let target = parse_column(target_column_id)?;
        let (source, source_pos) = self
            .board
            .find_task(task_id)
            .ok_or_else(|| BoardError::TaskNotFound(task_id.to_string()))?;

        // Index is validated against the pre-move count, so len means
        // append even in the same-column case.
        let max = self.board.column(target).tasks.len();
        if target_index > max {
            return Err(BoardError::IndexOutOfRange { index: target_index, max });
        }

        let task = self.board.column_mut(source).tasks.remove(source_pos);
        self.board.column_mut(source).reindex();

        let target_col = self.board.column_mut(target);
        let insert_at = target_index.min(target_col.tasks.len());
        target_col.tasks.insert(insert_at, task);
        target_col.reindex();

        log::debug!(
            "[taskboard.store.move] Task {} {} -> {}[{}]",
            task_id,
            source,
            target,
            insert_at
        );
        Ok(self.commit())
    }

    /// Same-column special case of `move_task`. Fails `TaskNotFound` when
    /// the task exists but lives in a different column than named.
    pub fn reorder_within_column(
        &mut self,
        column_id: &str,
        task_id: &str,
        target_index: usize,
    ) -> Result<Board, BoardError> {
        let column = parse_column(column_id)?;
        match self.board.find_task(task_id) {
            Some((owner, _)) if owner == column => {
                self.move_task(task_id, column_id, target_index)
            }
            _ => Err(BoardError::TaskNotFound(task_id.to_string())),
        }
    }

    /// Remove a task and close the order gap in its column.
    pub fn delete_task(&mut self, task_id: &str) -> Result<Board, BoardError> {
        let (column, pos) = self
            .board
            .find_task(task_id)
            .ok_or_else(|| BoardError::TaskNotFound(task_id.to_string()))?;

        let col = self.board.column_mut(column);
        col.tasks.remove(pos);
        col.reindex();
        log::debug!(
            "[taskboard.store.delete] Task {} from column {}",
            task_id,
            column
        );
        Ok(self.commit())
    }

    /// Update a task's title in place; id, creation time, and order are
    /// preserved.
    pub fn rename_task(&mut self, task_id: &str, new_title: &str) -> Result<Board, BoardError> {
        let new_title = non_empty_title(new_title)?;
        let (column, pos) = self
            .board
            .find_task(task_id)
            .ok_or_else(|| BoardError::TaskNotFound(task_id.to_string()))?;

        self.board.column_mut(column).tasks[pos].title = new_title;
        Ok(self.commit())
    }

    /// Route a view-binding intent to the matching operation.
    pub fn dispatch(&mut self, intent: BoardIntent) -> Result<Board, BoardError> {
        match intent {
            BoardIntent::AddTask { column_id, title } => self.add_task(&column_id, &title),
            BoardIntent::MoveTask {
                task_id,
                target_column_id,
                target_index,
            } => self.move_task(&task_id, &target_column_id, target_index),
            BoardIntent::ReorderWithinColumn {
                column_id,
                task_id,
                target_index,
            } => self.reorder_within_column(&column_id, &task_id, target_index),
            BoardIntent::DeleteTask { task_id } => self.delete_task(&task_id),
            BoardIntent::RenameTask { task_id, new_title } => {
                self.rename_task(&task_id, &new_title)
            }
        }
    }

    /// Clear persisted storage and replace in-memory state with the default
    /// board. Never fails: a storage clear failure is logged and the
    /// in-memory reset proceeds regardless. Any pending debounced write is
    /// cancelled so a stale snapshot cannot resurrect the cleared state.
    pub fn reset_to_default(&mut self) -> Board {
        if let Err(e) = self.storage.clear() {
            log::warn!("[taskboard.store.reset] Failed to clear storage: {}", e);
        }
        self.board = Board::default();
        self.version += 1;
        self.debouncer.cancel();

        let snapshot = self.board.clone();
        self.notify(&snapshot);
        let _ = self.events.send(BoardEvent::Reset { version: self.version });
        snapshot
    }

    // --- Reads, subscriptions, events ----------------------------------

    /// Read-only copy of current board state.
    pub fn snapshot(&self) -> Board {
        self.board.clone()
    }

    /// Store version: bumped once per successful mutation or reset.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Register a listener invoked synchronously, in registration order,
    /// with the new snapshot after every successful mutation.
    pub fn subscribe(&mut self, listener: impl FnMut(&Board) + Send + 'static) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false for an unknown or already-removed
    /// handle.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    /// Broadcast receiver for change events (host event loops, UI bridges).
    pub fn events(&self) -> broadcast::Receiver<BoardEvent> {
        self.events.subscribe()
    }

    // --- Persistence driving -------------------------------------------

    /// A debounced write is armed and has not yet been performed.
    pub fn pending_save(&self) -> bool {
        self.debouncer.is_dirty()
    }

    /// Perform the pending write if mutation activity has quiesced past the
    /// debounce window. Hosts call this from their event loop, or let
    /// `run_autosave` do it.
    pub fn maintain(&mut self) {
        if self.debouncer.take_due(Instant::now()) {
            self.persist();
        }
    }

    /// Perform any pending write immediately (shutdown path).
    pub fn flush(&mut self) {
        if self.debouncer.take_pending() {
            self.persist();
        }
    }

    fn persist(&mut self) {
        match self.storage.save(&self.board) {
            Ok(()) => {
                let _ = self.events.send(BoardEvent::Persisted { version: self.version });
            }
            Err(e) => {
                // The in-memory board stays authoritative; re-arm so the
                // write is retried after another quiescence window.
                log::warn!("[taskboard.store.save] Persistence write failed: {}", e);
                self.debouncer.mark_dirty(Instant::now());
                let _ = self
                    .events
                    .send(BoardEvent::PersistFailed { version: self.version });
            }
        }
    }

    // --- Internals ------------------------------------------------------

    /// Post-mutation bookkeeping: bump version, notify, arm persistence.
    fn commit(&mut self) -> Board {
        debug_assert!(self.board.validate().is_ok());
        self.version += 1;

        let snapshot = self.board.clone();
        self.notify(&snapshot);
        let _ = self.events.send(BoardEvent::Mutated { version: self.version });
        self.debouncer.mark_dirty(Instant::now());
        snapshot
    }

    fn notify(&mut self, snapshot: &Board) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(snapshot);
        }
    }

    /// Fresh task id in `task-<millis hex>-<24-bit hex>` form, salted until
    /// unique within the board.
    fn fresh_task_id(&self) -> String {
        let millis = chrono::Utc::now().timestamp_millis();
        let mut salt = rand_u24();
        loop {
            let id = format!("task-{millis:x}-{salt:06x}");
            if self.board.find_task(&id).is_none() {
                return id;
            }
            salt = (salt + 1) & 0x00FF_FFFF;
        }
    }
}

/// Simple pseudo-random 24-bit value for task id uniqueness.
fn rand_u24() -> u32 {
    chrono::Utc::now().timestamp_subsec_nanos() & 0x00FF_FFFF
}

fn parse_column(column_id: &str) -> Result<ColumnId, BoardError> {
    ColumnId::parse(column_id).ok_or_else(|| BoardError::InvalidColumn(column_id.to_string()))
}

fn non_empty_title(title: &str) -> Result<String, BoardError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(BoardError::InvalidInput("title is empty".to_string()));
    }
    Ok(trimmed.to_string())
}

/// Periodic autosave driver: ticks the store's `maintain` so debounced
/// writes land without the host wiring its own timer.
pub async fn run_autosave(store: Arc<Mutex<BoardStore>>) {
    let mut interval = tokio::time::interval(Duration::from_millis(100));
    loop {
        interval.tick().await;
        store.lock().unwrap().maintain();
    }
}
