//! Data-explorer RPC vocabulary shared by the summary cache and its backends.
//!
//! The types mirror the JSON shapes exchanged with a kernel-side data
//! explorer:
//! - column schema and table shape (`get_schema`, `get_state`)
//! - column profiles: null counts and summary statistics (`get_column_profiles`)
//! - frontend events announcing schema or data changes
//!
//! [`DataExplorerBackend`] is the async boundary a cache talks to. It carries
//! no retry or timeout contract of its own.

#![forbid(unsafe_code)]

mod backend;
mod event;
mod profile;
mod schema;

pub use backend::{BackendError, DataExplorerBackend};
pub use event::FrontendEvent;
pub use profile::{
    ColumnFrequencyTable, ColumnFrequencyTableItem, ColumnHistogram, ColumnProfileRequest,
    ColumnProfileResult, ColumnProfileType, ColumnSummaryStats, SummaryStatsBoolean,
    SummaryStatsNumber, SummaryStatsString,
};
pub use schema::{BackendState, ColumnDisplayType, ColumnSchema, TableSchema, TableShape};
