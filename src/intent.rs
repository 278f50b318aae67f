/// Mutation intents dispatched by the view binding.
///
/// Intents carry plain identifiers, strings, and indices only — never
/// references into store state. The tagged serde representation is the wire
/// contract for UI layers that ship intents across a process or language
/// boundary.
use serde::{Deserialize, Serialize};

/// A validated request to mutate the board. Routed by
/// `BoardStore::dispatch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BoardIntent {
    AddTask {
        column_id: String,
        title: String,
    },
    MoveTask {
        task_id: String,
        target_column_id: String,
        target_index: usize,
    },
    ReorderWithinColumn {
        column_id: String,
        task_id: String,
        target_index: usize,
    },
    DeleteTask {
        task_id: String,
    },
    RenameTask {
        task_id: String,
        new_title: String,
    },
}
