//! In-memory data-explorer backend.
//!
//! [`MemTable`] is a small row-appendable table of typed, nullable columns.
//! [`MemTableBackend`] serves it through
//! [`DataExplorerBackend`](tablescope_protocol::DataExplorerBackend), computing
//! schema, null counts and summary statistics on demand the way a kernel-side
//! data explorer does. Mutations report the [`FrontendEvent`] a kernel would
//! emit so callers can forward it to a cache.
//!
//! [`FrontendEvent`]: tablescope_protocol::FrontendEvent

#![forbid(unsafe_code)]

mod backend;
mod summarize;
mod table;

pub use backend::MemTableBackend;
pub use summarize::format_number;
pub use table::{ColumnSpec, ColumnType, MemTable, MemTableError, Value};
