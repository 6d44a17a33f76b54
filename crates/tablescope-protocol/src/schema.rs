use serde::{Deserialize, Serialize};

/// Display classification the grid uses to pick renderers and summarizers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ColumnDisplayType {
    Number,
    Boolean,
    String,
    Date,
    Datetime,
    Time,
    Array,
    Struct,
    #[default]
    Unknown,
}

/// Schema for a single column, as reported by the backend.
///
/// Entries are immutable for a given schema version; a `schema_update` event
/// is the only thing that makes a fetched schema stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub column_name: String,
    pub column_index: usize,
    /// Backend-specific type name (e.g. `float64`, `object`).
    pub type_name: String,
    pub type_display: ColumnDisplayType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Nested column schemas for array/struct columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ColumnSchema>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_size: Option<u32>,
}

impl ColumnSchema {
    /// Schema with only the required fields populated.
    pub fn new(
        column_index: usize,
        column_name: impl Into<String>,
        type_name: impl Into<String>,
        type_display: ColumnDisplayType,
    ) -> Self {
        Self {
            column_name: column_name.into(),
            column_index,
            type_name: type_name.into(),
            type_display,
            description: None,
            children: None,
            precision: None,
            scale: None,
            timezone: None,
            type_size: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub columns: Vec<ColumnSchema>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableShape {
    pub num_rows: usize,
    pub num_columns: usize,
}

/// Result of `get_state`.
///
/// Row filters and sort keys are carried as raw JSON: the cache only needs the
/// table shape and never interprets them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendState {
    #[serde(default)]
    pub display_name: String,
    pub table_shape: TableShape,
    #[serde(default)]
    pub row_filters: Vec<serde_json::Value>,
    #[serde(default)]
    pub sort_keys: Vec<serde_json::Value>,
}

impl BackendState {
    pub fn with_shape(display_name: impl Into<String>, table_shape: TableShape) -> Self {
        Self {
            display_name: display_name.into(),
            table_shape,
            row_filters: Vec::new(),
            sort_keys: Vec::new(),
        }
    }
}
