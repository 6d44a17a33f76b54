//! Windowed column-summary cache for data-explorer grids.
//!
//! A scrolling grid needs per-column metadata (schema, null counts, summary
//! statistics) for the columns on screen and a margin around them. This crate
//! keeps a local mirror of that metadata in front of a remote
//! [`DataExplorerBackend`](tablescope_protocol::DataExplorerBackend):
//! - an overscanned fetch window derived from the visible columns
//! - batched schema and profile fetches for just the missing indices
//! - last-write-wins coalescing of overlapping update requests
//! - independent invalidation of schema vs. data-derived entries
//! - a broadcast stream of "cache updated" notifications for re-rendering

#![forbid(unsafe_code)]

mod cache;
mod window;

pub use cache::{
    CacheEvent, CachedColumnCounts, Result, SummaryCache, SummaryCacheConfig, SummaryCacheStats,
};
pub use tablescope_protocol::BackendError;
pub use window::{ColumnWindow, UpdateRequest};
