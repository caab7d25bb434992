//! Query policy limits.

use serde::{Deserialize, Serialize};

/// Group-by columns above this distinct-value count trigger a slow-query warning.
pub const MAX_GROUP_BY_CARDINALITY: u64 = 5000;

/// Hard cap on result rows; larger requested limits are capped by the executor.
pub const MAX_RESULT_ROWS: usize = 10_000;

/// Timeout hint handed to the executor. Not enforced here.
pub const MAX_QUERY_TIMEOUT_MS: u64 = 30_000;

/// Maximum number of `group_by` entries in one query.
pub const MAX_GROUP_BY_COLUMNS: usize = 5;

/// Policy thresholds applied by the validator.
///
/// Passed explicitly so validation stays a function of its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryLimits {
    pub max_group_by_cardinality: u64,
    pub max_result_rows: usize,
    pub max_query_timeout_ms: u64,
    pub max_group_by_columns: usize,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            max_group_by_cardinality: MAX_GROUP_BY_CARDINALITY,
            max_result_rows: MAX_RESULT_ROWS,
            max_query_timeout_ms: MAX_QUERY_TIMEOUT_MS,
            max_group_by_columns: MAX_GROUP_BY_COLUMNS,
        }
    }
}

impl QueryLimits {
    /// The row cap that applies to a query requesting `requested` rows.
    pub fn effective_limit(&self, requested: Option<usize>) -> usize {
        match requested {
            Some(n) => n.min(self.max_result_rows),
            None => self.max_result_rows,
        }
    }
}
