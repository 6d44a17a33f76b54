use crate::schema::ColumnDisplayType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnProfileType {
    NullCount,
    SummaryStats,
    FrequencyTable,
    Histogram,
}

impl std::fmt::Display for ColumnProfileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ColumnProfileType::NullCount => "null_count",
            ColumnProfileType::SummaryStats => "summary_stats",
            ColumnProfileType::FrequencyTable => "frequency_table",
            ColumnProfileType::Histogram => "histogram",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnProfileRequest {
    pub column_index: usize,
    pub profile_type: ColumnProfileType,
}

impl ColumnProfileRequest {
    pub fn null_count(column_index: usize) -> Self {
        Self {
            column_index,
            profile_type: ColumnProfileType::NullCount,
        }
    }

    pub fn summary_stats(column_index: usize) -> Self {
        Self {
            column_index,
            profile_type: ColumnProfileType::SummaryStats,
        }
    }
}

/// Result for one [`ColumnProfileRequest`].
///
/// Results are positionally aligned with the request list; only the field
/// matching the requested profile type is expected to be populated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfileResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub null_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_stats: Option<ColumnSummaryStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub histogram: Option<ColumnHistogram>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_table: Option<ColumnFrequencyTable>,
}

impl ColumnProfileResult {
    pub fn from_null_count(count: u64) -> Self {
        Self {
            null_count: Some(count),
            ..Self::default()
        }
    }

    pub fn from_summary_stats(stats: ColumnSummaryStats) -> Self {
        Self {
            summary_stats: Some(stats),
            ..Self::default()
        }
    }
}

/// Descriptive statistics for a column. The populated variant depends on the
/// column's display type; types without a summarizer carry only `type_display`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSummaryStats {
    pub type_display: ColumnDisplayType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_stats: Option<SummaryStatsNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_stats: Option<SummaryStatsString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boolean_stats: Option<SummaryStatsBoolean>,
}

impl ColumnSummaryStats {
    pub fn empty(type_display: ColumnDisplayType) -> Self {
        Self {
            type_display,
            number_stats: None,
            string_stats: None,
            boolean_stats: None,
        }
    }
}

/// Numeric summary. Values are pre-formatted by the backend for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStatsNumber {
    pub min_value: String,
    pub max_value: String,
    pub mean: String,
    pub median: String,
    pub stdev: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStatsString {
    pub num_empty: u64,
    pub num_unique: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStatsBoolean {
    pub true_count: u64,
    pub false_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnHistogram {
    pub bin_sizes: Vec<u64>,
    pub bin_width: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnFrequencyTable {
    pub counts: Vec<ColumnFrequencyTableItem>,
    pub other_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnFrequencyTableItem {
    pub value: String,
    pub count: u64,
}
