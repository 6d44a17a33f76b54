use crate::table::{Column, ColumnType, Value};
use ordered_float::OrderedFloat;
use std::collections::HashSet;
use tablescope_protocol::{
    ColumnDisplayType, ColumnSummaryStats, SummaryStatsBoolean, SummaryStatsNumber,
    SummaryStatsString,
};

pub(crate) fn display_type(column_type: ColumnType) -> ColumnDisplayType {
    match column_type {
        ColumnType::Number => ColumnDisplayType::Number,
        ColumnType::String => ColumnDisplayType::String,
        ColumnType::Boolean => ColumnDisplayType::Boolean,
    }
}

pub(crate) fn type_name(column_type: ColumnType) -> &'static str {
    match column_type {
        ColumnType::Number => "float64",
        ColumnType::String => "string",
        ColumnType::Boolean => "bool",
    }
}

/// NaN number cells count as missing, matching `summarize_number`.
pub(crate) fn null_count(column: &Column) -> u64 {
    column
        .values
        .iter()
        .filter(|v| match v {
            Value::Null => true,
            Value::Number(n) => n.is_nan(),
            _ => false,
        })
        .count() as u64
}

pub(crate) fn summarize(column: &Column) -> ColumnSummaryStats {
    let type_display = display_type(column.spec.column_type);
    let mut stats = ColumnSummaryStats::empty(type_display);
    match column.spec.column_type {
        ColumnType::Number => stats.number_stats = Some(summarize_number(&column.values)),
        ColumnType::String => stats.string_stats = Some(summarize_string(&column.values)),
        ColumnType::Boolean => stats.boolean_stats = Some(summarize_boolean(&column.values)),
    }
    stats
}

fn summarize_number(values: &[Value]) -> SummaryStatsNumber {
    let mut numbers: Vec<f64> = values
        .iter()
        .filter_map(|v| match v {
            Value::Number(n) if !n.is_nan() => Some(*n),
            _ => None,
        })
        .collect();
    numbers.sort_unstable_by_key(|n| OrderedFloat(*n));

    let count = numbers.len();
    let (min, max) = match (numbers.first(), numbers.last()) {
        (Some(min), Some(max)) => (*min, *max),
        _ => (f64::NAN, f64::NAN),
    };
    let mean = if count == 0 {
        f64::NAN
    } else {
        numbers.iter().sum::<f64>() / count as f64
    };
    let median = match count {
        0 => f64::NAN,
        n if n % 2 == 1 => numbers[n / 2],
        n => (numbers[n / 2 - 1] + numbers[n / 2]) / 2.0,
    };
    // Sample standard deviation (ddof = 1).
    let stdev = if count < 2 {
        f64::NAN
    } else {
        let var = numbers.iter().map(|n| (n - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        var.sqrt()
    };

    SummaryStatsNumber {
        min_value: format_number(min),
        max_value: format_number(max),
        mean: format_number(mean),
        median: format_number(median),
        stdev: format_number(stdev),
    }
}

fn summarize_string(values: &[Value]) -> SummaryStatsString {
    let mut num_empty = 0u64;
    let mut unique: HashSet<&str> = HashSet::new();
    for value in values {
        if let Value::String(s) = value {
            if s.is_empty() {
                num_empty += 1;
            }
            unique.insert(s);
        }
    }
    SummaryStatsString {
        num_empty,
        num_unique: unique.len() as u64,
    }
}

fn summarize_boolean(values: &[Value]) -> SummaryStatsBoolean {
    let mut stats = SummaryStatsBoolean {
        true_count: 0,
        false_count: 0,
    };
    for value in values {
        match value {
            Value::Boolean(true) => stats.true_count += 1,
            Value::Boolean(false) => stats.false_count += 1,
            _ => {}
        }
    }
    stats
}

/// Format a statistic for display: at most six decimals, trailing zeros
/// trimmed but always keeping one fractional digit (`2.0`, `2.5`, `0.333333`).
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let mut out = format!("{value:.6}");
    while out.ends_with('0') && !out.ends_with(".0") {
        out.pop();
    }
    if out == "-0.0" {
        out = "0.0".to_string();
    }
    out
}
