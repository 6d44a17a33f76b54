use crate::summarize::{display_type, null_count, summarize, type_name};
use crate::table::{ColumnSpec, MemTable, MemTableError, Value};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use tablescope_protocol::{
    BackendError, BackendState, ColumnProfileRequest, ColumnProfileResult, ColumnProfileType,
    ColumnSchema, DataExplorerBackend, FrontendEvent, TableSchema, TableShape,
};

/// Serves a [`MemTable`] as a data-explorer backend.
///
/// Profiles are computed from the current table contents on every request;
/// nothing is memoized. Round trips are counted so callers can observe how
/// many fetches a cache issued.
#[derive(Debug)]
pub struct MemTableBackend {
    display_name: String,
    table: Mutex<MemTable>,
    state_calls: AtomicU64,
    schema_calls: AtomicU64,
    profile_calls: AtomicU64,
}

impl MemTableBackend {
    pub fn new(display_name: impl Into<String>, table: MemTable) -> Self {
        Self {
            display_name: display_name.into(),
            table: Mutex::new(table),
            state_calls: AtomicU64::new(0),
            schema_calls: AtomicU64::new(0),
            profile_calls: AtomicU64::new(0),
        }
    }

    pub fn state_calls(&self) -> u64 {
        self.state_calls.load(Ordering::Relaxed)
    }

    pub fn schema_calls(&self) -> u64 {
        self.schema_calls.load(Ordering::Relaxed)
    }

    pub fn profile_calls(&self) -> u64 {
        self.profile_calls.load(Ordering::Relaxed)
    }

    pub fn table_shape(&self) -> TableShape {
        let table = self.lock();
        TableShape {
            num_rows: table.row_count(),
            num_columns: table.column_count(),
        }
    }

    /// Append a row; returns the event a kernel would send for it.
    pub fn append_row(&self, row: Vec<Value>) -> Result<FrontendEvent, MemTableError> {
        self.lock().append_row(row)?;
        Ok(FrontendEvent::DataUpdate)
    }

    pub fn set_cell(
        &self,
        row: usize,
        col: usize,
        value: Value,
    ) -> Result<FrontendEvent, MemTableError> {
        self.lock().set_cell(row, col, value)?;
        Ok(FrontendEvent::DataUpdate)
    }

    /// Add a column; existing filter/sort state stays valid, so the schema
    /// update does not ask the UI to discard it.
    pub fn add_column(&self, spec: ColumnSpec, fill: Value) -> Result<FrontendEvent, MemTableError> {
        log::debug!("memtable {}: adding column {:?}", self.display_name, spec.name);
        self.lock().add_column(spec, fill)?;
        Ok(FrontendEvent::SchemaUpdate {
            discard_state: false,
        })
    }

    fn lock(&self) -> MutexGuard<'_, MemTable> {
        self.table.lock().expect("memtable mutex poisoned")
    }
}

fn to_backend_error(err: MemTableError) -> BackendError {
    match err {
        MemTableError::ColumnOutOfRange { column, columns } => BackendError::ColumnIndexOutOfRange {
            index: column,
            num_columns: columns,
        },
        other => BackendError::Rpc {
            code: -32602,
            message: other.to_string(),
        },
    }
}

#[async_trait]
impl DataExplorerBackend for MemTableBackend {
    async fn get_state(&self) -> Result<BackendState, BackendError> {
        self.state_calls.fetch_add(1, Ordering::Relaxed);
        Ok(BackendState::with_shape(
            self.display_name.clone(),
            self.table_shape(),
        ))
    }

    async fn get_schema(
        &self,
        start_index: usize,
        num_columns: usize,
    ) -> Result<TableSchema, BackendError> {
        self.schema_calls.fetch_add(1, Ordering::Relaxed);
        let table = self.lock();
        let end = start_index
            .saturating_add(num_columns)
            .min(table.column_count());
        let columns = (start_index..end)
            .filter_map(|idx| {
                let spec = table.column_spec(idx)?;
                Some(ColumnSchema::new(
                    idx,
                    spec.name.clone(),
                    type_name(spec.column_type),
                    display_type(spec.column_type),
                ))
            })
            .collect();
        Ok(TableSchema { columns })
    }

    async fn get_column_profiles(
        &self,
        profiles: Vec<ColumnProfileRequest>,
    ) -> Result<Vec<ColumnProfileResult>, BackendError> {
        self.profile_calls.fetch_add(1, Ordering::Relaxed);
        let table = self.lock();
        let mut results = Vec::with_capacity(profiles.len());
        for request in profiles {
            let column = table.column(request.column_index).map_err(to_backend_error)?;
            let result = match request.profile_type {
                ColumnProfileType::NullCount => {
                    ColumnProfileResult::from_null_count(null_count(column))
                }
                ColumnProfileType::SummaryStats => {
                    ColumnProfileResult::from_summary_stats(summarize(column))
                }
                other @ (ColumnProfileType::FrequencyTable | ColumnProfileType::Histogram) => {
                    return Err(BackendError::UnsupportedProfile(other));
                }
            };
            results.push(result);
        }
        Ok(results)
    }
}
