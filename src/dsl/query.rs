//! The query plan itself.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::filter::QueryFilter;
use super::measure::MeasureExpr;
use crate::config::QueryLimits;
use crate::error::{HeronError, HeronResult};

/// Time bucket width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Hour => "hour",
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
            Granularity::Quarter => "quarter",
            Granularity::Year => "year",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Truncate a date column to `granularity`. Acts as an extra grouping
/// dimension alongside `group_by`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBucket {
    pub column: String,
    pub granularity: Granularity,
}

impl TimeBucket {
    pub fn new(column: impl Into<String>, granularity: Granularity) -> Self {
        Self {
            column: column.into(),
            granularity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Sort key. `column` names a `group_by` entry or a measure alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub column: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Post-aggregation transform, applied by the executor in listed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostOp {
    PercentOfTotal,
    Rank,
    Cumulative,
    MovingAverage,
}

impl PostOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostOp::PercentOfTotal => "percent_of_total",
            PostOp::Rank => "rank",
            PostOp::Cumulative => "cumulative",
            PostOp::MovingAverage => "moving_average",
        }
    }
}

impl fmt::Display for PostOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One complete analytical query plan against a single dataset.
///
/// Only `dataset_id` and `measures` are required on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryDsl {
    pub dataset_id: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<QueryFilter>,

    /// Grouping columns, in output order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_by: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_bucket: Option<TimeBucket>,

    pub measures: Vec<MeasureExpr>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<OrderBy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post_ops: Vec<PostOp>,
}

impl QueryDsl {
    /// An empty plan for `dataset_id`. Add at least one measure before use.
    pub fn new(dataset_id: impl Into<String>) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            filters: Vec::new(),
            group_by: Vec::new(),
            time_bucket: None,
            measures: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            post_ops: Vec::new(),
        }
    }

    /// Parse a plan from JSON, as emitted by the planner.
    pub fn from_json(json: &str) -> HeronResult<Self> {
        serde_json::from_str(json).map_err(|e| HeronError::json("query DSL", e))
    }

    pub fn to_json(&self) -> HeronResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| HeronError::json("query DSL", e))
    }

    pub fn with_filter(mut self, filter: QueryFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_group_by(mut self, column: impl Into<String>) -> Self {
        self.group_by.push(column.into());
        self
    }

    pub fn with_time_bucket(mut self, bucket: TimeBucket) -> Self {
        self.time_bucket = Some(bucket);
        self
    }

    pub fn with_measure(mut self, measure: impl Into<MeasureExpr>) -> Self {
        self.measures.push(measure.into());
        self
    }

    pub fn with_order_by(mut self, order: OrderBy) -> Self {
        self.order_by.push(order);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_post_op(mut self, op: PostOp) -> Self {
        self.post_ops.push(op);
        self
    }

    /// Row cap the executor must apply: `min(limit, max_result_rows)`.
    pub fn effective_limit(&self, limits: &QueryLimits) -> usize {
        limits.effective_limit(self.limit)
    }

    /// Whether `name` is a measure alias in this plan.
    pub fn has_alias(&self, name: &str) -> bool {
        self.measures.iter().any(|m| m.alias() == name)
    }

    /// Result column names: group_by entries, then the time bucket column,
    /// then measure aliases.
    pub fn output_columns(&self) -> Vec<&str> {
        self.group_by
            .iter()
            .map(String::as_str)
            .chain(self.time_bucket.as_ref().map(|tb| tb.column.as_str()))
            .chain(self.measures.iter().map(MeasureExpr::alias))
            .collect()
    }
}
