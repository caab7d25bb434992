//! Raw per-column statistics as produced by the spreadsheet profiler.

use serde::{Deserialize, Serialize};

use super::{ColumnRole, ColumnType};

/// Profiling output for one dataset. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawStatisticalSummary {
    pub total_rows: u64,
    pub total_columns: Option<u64>,
    pub data_quality_score: Option<f64>,
    pub warnings: Vec<String>,
    pub columns: Vec<ColumnSummary>,
}

/// Profiling output for one column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub name: String,
    #[serde(rename = "type", default)]
    pub column_type: ColumnType,
    /// Rows inspected for this column; falls back to the dataset row count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<ColumnStats>,
    #[serde(default)]
    pub sample_values: Vec<serde_json::Value>,
    /// Explicit role; wins over inference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<ColumnRole>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,
}

impl ColumnSummary {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            ..Default::default()
        }
    }

    pub fn with_stats(mut self, stats: ColumnStats) -> Self {
        self.stats = Some(stats);
        self
    }
}

/// Descriptive statistics. Numeric fields are kept as raw JSON so a profiler
/// that reports a date or string minimum degrades to "absent".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnStats {
    pub null_count: u64,
    pub unique_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub std_dev: Option<serde_json::Value>,
}

impl ColumnStats {
    pub fn new(null_count: u64, unique_count: u64) -> Self {
        Self {
            null_count,
            unique_count,
            ..Default::default()
        }
    }
}
