use crate::window::{ColumnWindow, UpdateRequest};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use tablescope_protocol::{
    BackendError, ColumnProfileRequest, ColumnSchema, ColumnSummaryStats, DataExplorerBackend,
    FrontendEvent, TableShape,
};
use tokio::sync::broadcast;

pub type Result<T> = std::result::Result<T, BackendError>;

#[derive(Debug, Clone)]
pub struct SummaryCacheConfig {
    /// Screens of columns kept resident on each side of the visible ones (default: 3).
    pub overscan_factor: usize,
    /// Buffered cache events per subscriber before slow receivers lag (default: 64).
    pub event_capacity: usize,
}

impl Default for SummaryCacheConfig {
    fn default() -> Self {
        Self {
            overscan_factor: 3,
            event_capacity: 64,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SummaryCacheStats {
    /// Update cycles actually run (coalesced requests that never ran are excluded).
    pub update_cycles: u64,
    /// `update_cache` calls that arrived while a cycle was in flight.
    pub coalesced_requests: u64,
    /// Pending requests discarded because the in-flight cycle failed.
    pub dropped_requests: u64,
    pub schema_fetches: u64,
    pub profile_fetches: u64,
    pub invalidations: u64,
}

/// Number of entries held by each per-column map.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CachedColumnCounts {
    pub schemas: usize,
    pub null_counts: usize,
    pub summary_stats: usize,
}

/// Notification broadcast to view code subscribed via [`SummaryCache::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheEvent {
    /// New entries were added; re-render from the cache.
    Updated,
    /// Entries were dropped after a backend change; expect a follow-up update.
    Invalidated,
}

struct Inner {
    table_shape: Option<TableShape>,
    schemas: HashMap<usize, ColumnSchema>,
    null_counts: HashMap<usize, u64>,
    summary_stats: HashMap<usize, ColumnSummaryStats>,
    /// Bumped whenever schema entries are discarded.
    schema_epoch: u64,
    /// Bumped whenever null counts / summary stats are discarded.
    data_epoch: u64,
    updating: bool,
    pending: Option<UpdateRequest>,
    stats: SummaryCacheStats,
}

/// Local mirror of per-column metadata for an overscanned window of columns.
///
/// Schema, null counts and summary statistics live in independent maps keyed by
/// column index. Entries are created lazily by [`SummaryCache::update_cache`] and
/// [`SummaryCache::cache_column_summary_stats`] and are only removed by
/// invalidation:
/// - a data change drops null counts and summary stats but keeps the schema
/// - a schema change drops all three
///
/// Only one update cycle runs at a time. Requests arriving while a cycle is in
/// flight replace any previously pending request (last write wins); the
/// in-flight caller runs the latest pending request once its own cycle is done.
///
/// Lookups never fetch. The state lock is never held across an `.await`, so
/// readers may observe a partially applied cycle; cycles only add entries.
#[derive(Clone)]
pub struct SummaryCache {
    backend: Arc<dyn DataExplorerBackend>,
    config: SummaryCacheConfig,
    inner: Arc<Mutex<Inner>>,
    events: broadcast::Sender<CacheEvent>,
}

impl SummaryCache {
    pub fn new(backend: Arc<dyn DataExplorerBackend>, mut config: SummaryCacheConfig) -> Self {
        config.event_capacity = config.event_capacity.max(1);
        let (events, _) = broadcast::channel(config.event_capacity);
        let inner = Inner {
            table_shape: None,
            schemas: HashMap::new(),
            null_counts: HashMap::new(),
            summary_stats: HashMap::new(),
            schema_epoch: 0,
            data_epoch: 0,
            updating: false,
            pending: None,
            stats: SummaryCacheStats::default(),
        };
        Self {
            backend,
            config,
            inner: Arc::new(Mutex::new(inner)),
            events,
        }
    }

    pub fn config(&self) -> &SummaryCacheConfig {
        &self.config
    }

    /// Subscribe to [`CacheEvent`]s. Events sent before subscribing are not replayed.
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.events.subscribe()
    }

    pub fn column_schema(&self, column_index: usize) -> Option<ColumnSchema> {
        self.lock().schemas.get(&column_index).cloned()
    }

    pub fn column_null_count(&self, column_index: usize) -> Option<u64> {
        self.lock().null_counts.get(&column_index).copied()
    }

    pub fn column_summary_stats(&self, column_index: usize) -> Option<ColumnSummaryStats> {
        self.lock().summary_stats.get(&column_index).cloned()
    }

    /// Last table shape reported by the backend, if one has been fetched.
    pub fn table_shape(&self) -> Option<TableShape> {
        self.lock().table_shape
    }

    pub fn is_updating(&self) -> bool {
        self.lock().updating
    }

    pub fn stats_snapshot(&self) -> SummaryCacheStats {
        self.lock().stats
    }

    pub fn cached_column_counts(&self) -> CachedColumnCounts {
        let inner = self.lock();
        CachedColumnCounts {
            schemas: inner.schemas.len(),
            null_counts: inner.null_counts.len(),
            summary_stats: inner.summary_stats.len(),
        }
    }

    /// Bring the overscanned window around `request` into the cache.
    ///
    /// If a cycle is already running, `request` becomes the pending request
    /// (replacing any earlier one) and this call returns `Ok(())` immediately.
    /// Otherwise this call runs its own cycle and then every request left
    /// pending, one at a time, before returning.
    ///
    /// Backend errors are returned to the caller running the cycle. A failed
    /// cycle drops the pending request instead of running it.
    pub async fn update_cache(&self, request: UpdateRequest) -> Result<()> {
        {
            let mut inner = self.lock();
            if inner.updating {
                if let Some(replaced) = inner.pending.replace(request) {
                    log::trace!("summary cache: pending request {replaced:?} replaced by {request:?}");
                } else {
                    log::trace!("summary cache: deferring {request:?} behind in-flight update");
                }
                inner.stats.coalesced_requests = inner.stats.coalesced_requests.saturating_add(1);
                return Ok(());
            }
            inner.updating = true;
        }

        let mut guard = UpdatingGuard {
            inner: &self.inner,
            armed: true,
        };

        let mut request = request;
        loop {
            // On error the guard clears `updating` and drops any pending request.
            self.run_update_cycle(request).await?;

            let mut inner = self.lock();
            match inner.pending.take() {
                Some(next) => request = next,
                None => {
                    inner.updating = false;
                    guard.armed = false;
                    return Ok(());
                }
            }
        }
    }

    /// Drop null counts and summary stats (schema is kept) and refresh the
    /// table shape from the backend.
    pub async fn invalidate_cache(&self) -> Result<()> {
        {
            let mut inner = self.lock();
            inner.null_counts.clear();
            inner.summary_stats.clear();
            inner.data_epoch = inner.data_epoch.wrapping_add(1);
            inner.stats.invalidations = inner.stats.invalidations.saturating_add(1);
        }
        log::debug!("summary cache: data invalidated");
        self.notify(CacheEvent::Invalidated);
        self.refresh_table_shape().await
    }

    /// Apply a backend notification.
    ///
    /// `DataUpdate` behaves like [`SummaryCache::invalidate_cache`]. `SchemaUpdate`
    /// additionally drops every cached schema entry.
    pub async fn handle_frontend_event(&self, event: FrontendEvent) -> Result<()> {
        match event {
            FrontendEvent::DataUpdate => self.invalidate_cache().await,
            FrontendEvent::SchemaUpdate { discard_state } => {
                {
                    let mut inner = self.lock();
                    inner.schemas.clear();
                    inner.null_counts.clear();
                    inner.summary_stats.clear();
                    inner.schema_epoch = inner.schema_epoch.wrapping_add(1);
                    inner.data_epoch = inner.data_epoch.wrapping_add(1);
                    inner.stats.invalidations = inner.stats.invalidations.saturating_add(1);
                }
                log::debug!("summary cache: schema invalidated (discard_state={discard_state})");
                self.notify(CacheEvent::Invalidated);
                self.refresh_table_shape().await
            }
        }
    }

    /// Fetch summary statistics for `column_indices` in a single batch,
    /// skipping indices that are already cached.
    pub async fn cache_column_summary_stats(&self, column_indices: &[usize]) -> Result<()> {
        let (missing, data_epoch) = {
            let inner = self.lock();
            let mut seen = HashSet::new();
            let missing: Vec<usize> = column_indices
                .iter()
                .copied()
                .filter(|idx| !inner.summary_stats.contains_key(idx) && seen.insert(*idx))
                .collect();
            (missing, inner.data_epoch)
        };
        if missing.is_empty() {
            return Ok(());
        }

        let requests = missing
            .iter()
            .copied()
            .map(ColumnProfileRequest::summary_stats)
            .collect();
        let results = self.backend.get_column_profiles(requests).await?;

        let added = {
            let mut inner = self.lock();
            inner.stats.profile_fetches = inner.stats.profile_fetches.saturating_add(1);
            if inner.data_epoch != data_epoch {
                log::debug!("summary cache: discarding summary stats fetched before invalidation");
                0
            } else {
                let mut added = 0usize;
                for (idx, result) in missing.iter().zip(results) {
                    if let Some(stats) = result.summary_stats {
                        inner.summary_stats.insert(*idx, stats);
                        added += 1;
                    }
                }
                added
            }
        };

        if added > 0 {
            self.notify(CacheEvent::Updated);
        }
        Ok(())
    }

    async fn run_update_cycle(&self, request: UpdateRequest) -> Result<()> {
        let shape = self.table_shape_or_fetch().await?;

        let (window, schema_span, schema_epoch) = {
            let mut inner = self.lock();
            inner.stats.update_cycles = inner.stats.update_cycles.saturating_add(1);
            let Some(window) =
                ColumnWindow::overscanned(request, shape.num_columns, self.config.overscan_factor)
            else {
                log::debug!("summary cache: table has no columns; nothing to fetch");
                return Ok(());
            };

            let mut schema_span: Option<(usize, usize)> = None;
            for idx in window.indices() {
                if !inner.schemas.contains_key(&idx) {
                    schema_span = Some(match schema_span {
                        Some((first, _)) => (first, idx),
                        None => (idx, idx),
                    });
                }
            }
            (window, schema_span, inner.schema_epoch)
        };

        log::debug!(
            "summary cache: update {request:?} -> columns {}..={} (schema span {schema_span:?})",
            window.start,
            window.end,
        );

        let mut changed = false;

        if let Some((first, last)) = schema_span {
            let schema = self.backend.get_schema(first, last - first + 1).await?;
            let mut inner = self.lock();
            inner.stats.schema_fetches = inner.stats.schema_fetches.saturating_add(1);
            if inner.schema_epoch == schema_epoch {
                for column in schema.columns {
                    inner.schemas.insert(column.column_index, column);
                    changed = true;
                }
            } else {
                log::debug!("summary cache: discarding schema fetched before schema change");
            }
        }

        // Null counts are decided after the schema await: an invalidation
        // during that fetch must not void the profile request sent after it.
        let (missing_null_counts, data_epoch) = {
            let inner = self.lock();
            let missing: Vec<usize> = window
                .indices()
                .filter(|idx| !inner.null_counts.contains_key(idx))
                .collect();
            (missing, inner.data_epoch)
        };

        if !missing_null_counts.is_empty() {
            log::debug!(
                "summary cache: fetching {} null counts",
                missing_null_counts.len()
            );
            let requests = missing_null_counts
                .iter()
                .copied()
                .map(ColumnProfileRequest::null_count)
                .collect();
            let results = match self.backend.get_column_profiles(requests).await {
                Ok(results) => results,
                Err(err) => {
                    // Schema entries from this cycle are already visible.
                    if changed {
                        self.notify(CacheEvent::Updated);
                    }
                    return Err(err);
                }
            };
            let mut inner = self.lock();
            inner.stats.profile_fetches = inner.stats.profile_fetches.saturating_add(1);
            if inner.data_epoch == data_epoch {
                for (idx, result) in missing_null_counts.iter().zip(results) {
                    if let Some(count) = result.null_count {
                        inner.null_counts.insert(*idx, count);
                        changed = true;
                    }
                }
            } else {
                log::debug!("summary cache: discarding null counts fetched before invalidation");
            }
        }

        if changed {
            self.notify(CacheEvent::Updated);
        }
        Ok(())
    }

    async fn table_shape_or_fetch(&self) -> Result<TableShape> {
        let cached = self.lock().table_shape;
        if let Some(shape) = cached {
            return Ok(shape);
        }
        self.refresh_table_shape().await?;
        Ok(self.lock().table_shape.unwrap_or_default())
    }

    async fn refresh_table_shape(&self) -> Result<()> {
        // Forget the old shape first so a failed refresh forces a refetch on
        // the next update cycle.
        self.lock().table_shape = None;
        let state = self.backend.get_state().await?;
        log::debug!(
            "summary cache: table shape {} rows x {} columns",
            state.table_shape.num_rows,
            state.table_shape.num_columns
        );
        self.lock().table_shape = Some(state.table_shape);
        Ok(())
    }

    fn notify(&self, event: CacheEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("summary cache mutex poisoned")
    }
}

/// Resets the updating flag when an update loop exits early, either through a
/// backend error or because its future was dropped mid-flight.
struct UpdatingGuard<'a> {
    inner: &'a Mutex<Inner>,
    armed: bool,
}

impl Drop for UpdatingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let Ok(mut inner) = self.inner.lock() else {
            return;
        };
        inner.updating = false;
        if let Some(dropped) = inner.pending.take() {
            log::warn!("summary cache: dropping pending request {dropped:?} after failed update");
            inner.stats.dropped_requests = inner.stats.dropped_requests.saturating_add(1);
        }
    }
}
