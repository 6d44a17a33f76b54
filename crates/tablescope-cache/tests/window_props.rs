use proptest::prelude::*;
use std::sync::Arc;
use tablescope_cache::{ColumnWindow, SummaryCache, SummaryCacheConfig, UpdateRequest};
use tablescope_memtable::{ColumnSpec, ColumnType, MemTable, MemTableBackend, Value};

fn wide_table(columns: usize) -> MemTable {
    let mut table = MemTable::new(
        (0..columns)
            .map(|idx| ColumnSpec::new(format!("c{idx}"), ColumnType::Number))
            .collect(),
    );
    table
        .append_row(
            (0..columns)
                .map(|idx| if idx % 3 == 0 { Value::Null } else { Value::Number(idx as f64) })
                .collect(),
        )
        .expect("append row");
    table
}

proptest! {
    #[test]
    fn window_contains_first_visible_column(
        total in 1usize..5_000,
        first in 0usize..5_000,
        visible in 1usize..300,
        overscan in 0usize..6,
    ) {
        let first = first.min(total - 1);
        let window = ColumnWindow::overscanned(UpdateRequest::new(first, visible), total, overscan)
            .expect("non-empty table");
        prop_assert!(window.start <= first);
        prop_assert!(first <= window.end);
        prop_assert!(window.end < total);
        prop_assert!(window.len() <= visible * (1 + 2 * overscan) + 1);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn update_caches_every_column_in_window(
        total in 1usize..400,
        first in 0usize..400,
        visible in 1usize..40,
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("build runtime");
        let backend = Arc::new(MemTableBackend::new("wide", wide_table(total)));
        let cache = SummaryCache::new(backend.clone(), SummaryCacheConfig::default());
        let request = UpdateRequest::new(first, visible);

        runtime
            .block_on(cache.update_cache(request))
            .expect("update");

        let window = ColumnWindow::overscanned(request, total, cache.config().overscan_factor)
            .expect("non-empty table");
        for idx in window.indices() {
            let schema = cache.column_schema(idx);
            prop_assert_eq!(schema.map(|s| s.column_index), Some(idx));
            let expected_nulls = u64::from(idx % 3 == 0);
            prop_assert_eq!(cache.column_null_count(idx), Some(expected_nulls));
        }
        if window.start > 0 {
            prop_assert!(cache.column_schema(window.start - 1).is_none());
        }
        if window.end + 1 < total {
            prop_assert!(cache.column_null_count(window.end + 1).is_none());
        }
        prop_assert_eq!(backend.schema_calls(), 1);
        prop_assert_eq!(backend.profile_calls(), 1);
    }
}
