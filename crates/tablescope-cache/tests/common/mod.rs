#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tablescope_protocol::{
    BackendError, BackendState, ColumnDisplayType, ColumnProfileRequest, ColumnProfileResult,
    ColumnProfileType, ColumnSchema, ColumnSummaryStats, DataExplorerBackend, TableSchema,
    TableShape,
};
use tokio::sync::Notify;

/// Scriptable backend: records every request, can hold the next schema or
/// profile fetch until released, and can fail schema or profile fetches on
/// demand.
#[derive(Default)]
pub struct MockBackend {
    pub num_columns: AtomicUsize,
    pub state_calls: AtomicU64,
    pub schema_requests: Mutex<Vec<(usize, usize)>>,
    pub profile_requests: Mutex<Vec<Vec<ColumnProfileRequest>>>,
    pub fail_schema: AtomicBool,
    pub fail_profiles: AtomicBool,
    schema_gate: Mutex<Option<Arc<Notify>>>,
    profile_gate: Mutex<Option<Arc<Notify>>>,
}

impl MockBackend {
    pub fn with_columns(num_columns: usize) -> Arc<Self> {
        let backend = Self::default();
        backend.num_columns.store(num_columns, Ordering::SeqCst);
        Arc::new(backend)
    }

    /// Hold the next `get_schema` call until the returned handle is notified.
    pub fn gate_next_schema(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.schema_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Hold the next `get_column_profiles` call until the returned handle is notified.
    pub fn gate_next_profiles(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.profile_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn schema_requests(&self) -> Vec<(usize, usize)> {
        self.schema_requests.lock().unwrap().clone()
    }

    pub fn profile_requests(&self) -> Vec<Vec<ColumnProfileRequest>> {
        self.profile_requests.lock().unwrap().clone()
    }

    pub fn profiled_indices(&self, batch: usize) -> Vec<usize> {
        self.profile_requests()[batch]
            .iter()
            .map(|r| r.column_index)
            .collect()
    }
}

#[async_trait]
impl DataExplorerBackend for MockBackend {
    async fn get_state(&self) -> Result<BackendState, BackendError> {
        self.state_calls.fetch_add(1, Ordering::SeqCst);
        Ok(BackendState::with_shape(
            "mock",
            TableShape {
                num_rows: 100,
                num_columns: self.num_columns.load(Ordering::SeqCst),
            },
        ))
    }

    async fn get_schema(
        &self,
        start_index: usize,
        num_columns: usize,
    ) -> Result<TableSchema, BackendError> {
        self.schema_requests
            .lock()
            .unwrap()
            .push((start_index, num_columns));
        let gate = self.schema_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.fail_schema.load(Ordering::SeqCst) {
            return Err(BackendError::Transport("connection reset".to_string()));
        }
        let end = (start_index + num_columns).min(self.num_columns.load(Ordering::SeqCst));
        Ok(TableSchema {
            columns: (start_index..end)
                .map(|idx| {
                    ColumnSchema::new(idx, format!("col{idx}"), "int64", ColumnDisplayType::Number)
                })
                .collect(),
        })
    }

    async fn get_column_profiles(
        &self,
        profiles: Vec<ColumnProfileRequest>,
    ) -> Result<Vec<ColumnProfileResult>, BackendError> {
        self.profile_requests.lock().unwrap().push(profiles.clone());
        let gate = self.profile_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.fail_profiles.load(Ordering::SeqCst) {
            return Err(BackendError::Rpc {
                code: -32603,
                message: "profile computation failed".to_string(),
            });
        }
        Ok(profiles
            .iter()
            .map(|req| match req.profile_type {
                ColumnProfileType::NullCount => {
                    ColumnProfileResult::from_null_count(req.column_index as u64 * 10)
                }
                _ => ColumnProfileResult::from_summary_stats(ColumnSummaryStats::empty(
                    ColumnDisplayType::Number,
                )),
            })
            .collect())
    }
}

/// Yield until `cond` holds; used to line up interleavings on a
/// current-thread runtime.
pub async fn yield_until(mut cond: impl FnMut() -> bool) {
    while !cond() {
        tokio::task::yield_now().await;
    }
}
