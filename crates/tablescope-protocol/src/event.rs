use serde::{Deserialize, Serialize};

/// Notifications pushed from the backend to the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params", rename_all = "snake_case")]
pub enum FrontendEvent {
    /// The table schema changed; everything cached per column is stale.
    SchemaUpdate {
        /// If true, the UI should discard its filter/sort state.
        discard_state: bool,
    },
    /// Rows or values changed under an unchanged schema.
    DataUpdate,
}
