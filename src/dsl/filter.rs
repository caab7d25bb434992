//! Row filters applied before aggregation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operator of a [`QueryFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    NotIn,
    Contains,
    Between,
    DateBetween,
}

impl FilterOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "eq",
            FilterOperator::Ne => "ne",
            FilterOperator::Gt => "gt",
            FilterOperator::Gte => "gte",
            FilterOperator::Lt => "lt",
            FilterOperator::Lte => "lte",
            FilterOperator::In => "in",
            FilterOperator::NotIn => "not_in",
            FilterOperator::Contains => "contains",
            FilterOperator::Between => "between",
            FilterOperator::DateBetween => "date_between",
        }
    }

    /// Range operators take an upper bound in `value2`.
    pub fn is_range(&self) -> bool {
        matches!(self, FilterOperator::Between | FilterOperator::DateBetween)
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single predicate. Filters in a query are AND-combined.
///
/// Values stay untyped JSON; operator/value compatibility is the executor's
/// concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryFilter {
    pub column: String,
    pub operator: FilterOperator,
    pub value: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value2: Option<serde_json::Value>,
}

impl QueryFilter {
    pub fn new(
        column: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        Self {
            column: column.into(),
            operator,
            value: value.into(),
            value2: None,
        }
    }

    /// A `between` filter over `[low, high]`.
    pub fn between(
        column: impl Into<String>,
        low: impl Into<serde_json::Value>,
        high: impl Into<serde_json::Value>,
    ) -> Self {
        Self {
            column: column.into(),
            operator: FilterOperator::Between,
            value: low.into(),
            value2: Some(high.into()),
        }
    }
}
