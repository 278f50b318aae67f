/// Board data model: the fixed column set, tasks, and the persisted record
/// layout. All mutation goes through `store::BoardStore`; these types carry
/// no behavior beyond lookups, reindexing, and invariant validation.
use serde::{Deserialize, Serialize};

/// Version of the persisted record layout. Bumped on incompatible changes;
/// `load()` treats unrecognized versions as corruption and falls back to the
/// default board.
pub const SCHEMA_VERSION: u32 = 1;

/// The closed set of board columns. Columns are never created or destroyed
/// at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnId {
    Ideas,
    InProgress,
    Completed,
}

impl ColumnId {
    /// All columns, in board display order.
    pub const ALL: [ColumnId; 3] = [ColumnId::Ideas, ColumnId::InProgress, ColumnId::Completed];

    /// Wire/display name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnId::Ideas => "ideas",
            ColumnId::InProgress => "in-progress",
            ColumnId::Completed => "completed",
        }
    }

    /// Parse a wire name. Returns None for anything outside the fixed set.
    pub fn parse(s: &str) -> Option<ColumnId> {
        match s {
            "ideas" => Some(ColumnId::Ideas),
            "in-progress" => Some(ColumnId::InProgress),
            "completed" => Some(ColumnId::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for ColumnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ColumnId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColumnId::parse(s).ok_or(())
    }
}

/// A single work item. `id` is immutable and unique for the board's
/// lifetime; `order` is the sort position within the owning column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    /// Creation time, UTC epoch milliseconds.
    pub created_at: i64,
    pub order: u32,
}

/// One column of the board with its ordered tasks.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub id: ColumnId,
    pub tasks: Vec<Task>,
}

impl Column {
    pub fn empty(id: ColumnId) -> Self {
        Self { id, tasks: Vec::new() }
    }

    /// The order value a newly appended task gets: max + 1, or 0 when
    /// empty. Saturates at `u32::MAX`; a loaded snapshot may legally carry
    /// arbitrary gaps, so the append path must not overflow on extreme
    /// values (callers reindex when the result would collide).
    pub fn next_order(&self) -> u32 {
        self.tasks
            .iter()
            .map(|t| t.order)
            .max()
            .map_or(0, |m| m.saturating_add(1))
    }

    /// Rewrite order values contiguously from 0 in sequence position order.
    /// Run after any removal or insertion so the strictly-increasing
    /// invariant holds trivially.
    pub fn reindex(&mut self) {
        for (i, task) in self.tasks.iter_mut().enumerate() {
            task.order = i as u32;
        }
    }
}

/// The root aggregate: all three columns, always present, always in
/// `ColumnId::ALL` order.
///
/// `columns` is public for read access, but `column`/`column_mut` assume
/// the fixed set is intact and panic otherwise. Hand-assembled boards that
/// bypass `Board::default()` should be checked with `validate` before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BoardRecord", into = "BoardRecord")]
pub struct Board {
    pub schema_version: u32,
    pub columns: Vec<Column>,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            columns: ColumnId::ALL.iter().map(|&id| Column::empty(id)).collect(),
        }
    }
}

impl Board {
    pub fn column(&self, id: ColumnId) -> &Column {
        self.columns
            .iter()
            .find(|c| c.id == id)
            .expect("fixed column set")
    }

    pub fn column_mut(&mut self, id: ColumnId) -> &mut Column {
        self.columns
            .iter_mut()
            .find(|c| c.id == id)
            .expect("fixed column set")
    }

    /// Locate a task by id: owning column and position within it.
    pub fn find_task(&self, task_id: &str) -> Option<(ColumnId, usize)> {
        for col in &self.columns {
            if let Some(pos) = col.tasks.iter().position(|t| t.id == task_id) {
                return Some((col.id, pos));
            }
        }
        None
    }

    /// Total task count across all columns.
    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum()
    }

    /// Check the structural invariants. Used on every load and by tests;
    /// the store's mutation paths keep them true by construction.
    pub fn validate(&self) -> Result<(), BoardViolation> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(BoardViolation::SchemaVersion {
                found: self.schema_version,
                expected: SCHEMA_VERSION,
            });
        }

        let ids: Vec<ColumnId> = self.columns.iter().map(|c| c.id).collect();
        if ids != ColumnId::ALL {
            return Err(BoardViolation::ColumnSet { found: ids });
        }

        let mut seen = std::collections::HashSet::new();
        for col in &self.columns {
            let mut prev: Option<u32> = None;
            for task in &col.tasks {
                if !seen.insert(task.id.clone()) {
                    return Err(BoardViolation::DuplicateTask {
                        task_id: task.id.clone(),
                    });
                }
                if let Some(p) = prev {
                    if task.order <= p {
                        return Err(BoardViolation::OrderNotIncreasing {
                            column: col.id,
                            task_id: task.id.clone(),
                        });
                    }
                }
                prev = Some(task.order);
            }
        }
        Ok(())
    }
}

/// A structural invariant failure, reported by `Board::validate`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BoardViolation {
    #[error("unrecognized schema version {found} (expected {expected})")]
    SchemaVersion { found: u32, expected: u32 },

    #[error("column set {found:?} does not match the fixed enumeration")]
    ColumnSet { found: Vec<ColumnId> },

    #[error("task {task_id} appears more than once")]
    DuplicateTask { task_id: String },

    #[error("order values not strictly increasing in column {column} at task {task_id}")]
    OrderNotIncreasing { column: ColumnId, task_id: String },
}

/// Persisted record layout: columns are a keyed object, not a positional
/// list, so the on-disk document reads naturally and survives column
/// reordering in code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BoardRecord {
    schema_version: u32,
    columns: ColumnsRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ColumnsRecord {
    ideas: Vec<Task>,
    #[serde(rename = "in-progress")]
    in_progress: Vec<Task>,
    completed: Vec<Task>,
}

impl From<Board> for BoardRecord {
    fn from(board: Board) -> Self {
        let take = |id: ColumnId| board.column(id).tasks.clone();
        BoardRecord {
            schema_version: board.schema_version,
            columns: ColumnsRecord {
                ideas: take(ColumnId::Ideas),
                in_progress: take(ColumnId::InProgress),
                completed: take(ColumnId::Completed),
            },
        }
    }
}

impl From<BoardRecord> for Board {
    fn from(record: BoardRecord) -> Self {
        Board {
            schema_version: record.schema_version,
            columns: vec![
                Column { id: ColumnId::Ideas, tasks: record.columns.ideas },
                Column { id: ColumnId::InProgress, tasks: record.columns.in_progress },
                Column { id: ColumnId::Completed, tasks: record.columns.completed },
            ],
        }
    }
}
