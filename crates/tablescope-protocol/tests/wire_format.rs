use pretty_assertions::assert_eq;
use serde_json::json;
use tablescope_protocol::{
    BackendState, ColumnDisplayType, ColumnProfileRequest, ColumnProfileResult, ColumnSchema,
    ColumnSummaryStats, FrontendEvent, SummaryStatsString, TableShape,
};

#[test]
fn column_schema_omits_unset_optional_fields() {
    let schema = ColumnSchema::new(3, "price", "float64", ColumnDisplayType::Number);
    let value = serde_json::to_value(&schema).expect("serialize schema");
    assert_eq!(
        value,
        json!({
            "column_name": "price",
            "column_index": 3,
            "type_name": "float64",
            "type_display": "number",
        })
    );
}

#[test]
fn profile_request_uses_snake_case_profile_types() {
    let value = serde_json::to_value([
        ColumnProfileRequest::null_count(0),
        ColumnProfileRequest::summary_stats(7),
    ])
    .expect("serialize requests");
    assert_eq!(
        value,
        json!([
            {"column_index": 0, "profile_type": "null_count"},
            {"column_index": 7, "profile_type": "summary_stats"},
        ])
    );
}

#[test]
fn profile_result_parses_kernel_payload() {
    let payload = json!([
        {"null_count": 12},
        {"summary_stats": {
            "type_display": "string",
            "string_stats": {"num_empty": 2, "num_unique": 40}
        }},
    ]);
    let results: Vec<ColumnProfileResult> =
        serde_json::from_value(payload).expect("parse profile results");

    assert_eq!(results[0], ColumnProfileResult::from_null_count(12));
    assert_eq!(
        results[1].summary_stats,
        Some(ColumnSummaryStats {
            type_display: ColumnDisplayType::String,
            number_stats: None,
            string_stats: Some(SummaryStatsString {
                num_empty: 2,
                num_unique: 40,
            }),
            boolean_stats: None,
        })
    );
}

#[test]
fn backend_state_tolerates_missing_filter_state() {
    let state: BackendState = serde_json::from_value(json!({
        "table_shape": {"num_rows": 10, "num_columns": 4}
    }))
    .expect("parse state");
    assert_eq!(
        state.table_shape,
        TableShape {
            num_rows: 10,
            num_columns: 4,
        }
    );
    assert!(state.row_filters.is_empty());
    assert!(state.display_name.is_empty());
}

#[test]
fn frontend_events_use_method_and_params() {
    let schema_update = FrontendEvent::SchemaUpdate {
        discard_state: true,
    };
    assert_eq!(
        serde_json::to_value(schema_update).expect("serialize"),
        json!({"method": "schema_update", "params": {"discard_state": true}})
    );

    let parsed: FrontendEvent =
        serde_json::from_value(json!({"method": "data_update"})).expect("parse data update");
    assert_eq!(parsed, FrontendEvent::DataUpdate);
}
