use crate::profile::{ColumnProfileRequest, ColumnProfileResult, ColumnProfileType};
use crate::schema::{BackendState, TableSchema};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("column index {index} out of range (table has {num_columns} columns)")]
    ColumnIndexOutOfRange { index: usize, num_columns: usize },
    #[error("unsupported column profile: {0}")]
    UnsupportedProfile(ColumnProfileType),
}

/// Async RPC boundary to a data-explorer backend (usually a kernel comm).
///
/// Implementations decide their own transport, timeouts and retries; callers
/// such as the summary cache treat every method as a single opaque round trip.
#[async_trait]
pub trait DataExplorerBackend: Send + Sync {
    /// Current table shape plus filter/sort state.
    async fn get_state(&self) -> Result<BackendState, BackendError>;

    /// Schema for columns `start_index .. start_index + num_columns`.
    ///
    /// Backends truncate the span at the table's last column.
    async fn get_schema(
        &self,
        start_index: usize,
        num_columns: usize,
    ) -> Result<TableSchema, BackendError>;

    /// Compute the requested profiles. Results are aligned with `profiles`.
    async fn get_column_profiles(
        &self,
        profiles: Vec<ColumnProfileRequest>,
    ) -> Result<Vec<ColumnProfileResult>, BackendError>;
}
