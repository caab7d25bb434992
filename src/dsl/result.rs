//! Validation and execution results exchanged with the planner and executor.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::QueryLimits;

/// A problem that makes a query plan unexecutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryValidationError {
    /// Top-level DSL field at fault (`"measures"`, `"group_by"`, ...).
    pub field: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl QueryValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for QueryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " ({})", suggestion)?;
        }
        Ok(())
    }
}

/// Outcome of validating a plan against a catalog.
///
/// `valid` is true iff `errors` is empty. `warnings` is `None` rather than
/// an empty list when there is nothing to report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryValidationResult {
    pub valid: bool,
    pub errors: Vec<QueryValidationError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<String>>,
}

impl QueryValidationResult {
    /// Assemble a result, deriving `valid` and normalizing empty warnings.
    pub fn from_parts(errors: Vec<QueryValidationError>, warnings: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings: if warnings.is_empty() {
                None
            } else {
                Some(warnings)
            },
        }
    }

    /// A passing result with no warnings.
    pub fn ok() -> Self {
        Self::from_parts(Vec::new(), Vec::new())
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Fields with at least one error, in first-seen order.
    pub fn error_fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        for error in &self.errors {
            if !fields.contains(&error.field.as_str()) {
                fields.push(&error.field);
            }
        }
        fields
    }

    pub fn warnings(&self) -> &[String] {
        self.warnings.as_deref().unwrap_or_default()
    }
}

/// Tabular result the executor hands back to the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryExecutionResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
    pub row_count: usize,
    pub execution_time_ms: u64,
    /// Rows were cut, or the requested limit exceeded the maximum.
    pub was_limited: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_limit: Option<usize>,
}

impl QueryExecutionResult {
    /// Build a result, truncating `rows` to the effective limit.
    pub fn capped(
        columns: Vec<String>,
        mut rows: Vec<Vec<serde_json::Value>>,
        requested_limit: Option<usize>,
        limits: &QueryLimits,
        execution_time_ms: u64,
    ) -> Self {
        let effective = limits.effective_limit(requested_limit);
        let truncated = rows.len() > effective;
        rows.truncate(effective);

        let request_capped = requested_limit.is_some_and(|n| n > limits.max_result_rows);
        let was_limited = truncated || request_capped;

        Self {
            columns,
            row_count: rows.len(),
            rows,
            execution_time_ms,
            was_limited,
            actual_limit: (requested_limit.is_some() || was_limited).then_some(effective),
        }
    }
}
