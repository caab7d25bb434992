//! Validation of query plans against a dataset catalog.
//!
//! Checks run in a fixed order and never short-circuit, so one pass reports
//! every problem:
//!
//! 1. dataset identity
//! 2. filter columns exist
//! 3. group-by size, existence and cardinality (warning)
//! 4. time bucket column exists and is a date
//! 5. measures: non-empty, columns present, exist and are numeric where the
//!    aggregation needs it; ratio numerators and denominators included
//! 6. order-by keys are group-by columns or measure aliases
//! 7. limit above the row cap (warning)
//!
//! Validation is a pure function of its inputs. Problems are data in the
//! returned [`QueryValidationResult`]; nothing here panics or returns `Err`.
//!
//! # Example
//!
//! ```
//! use heron::catalog::{ColumnMetadata, ColumnType, DatasetCatalog};
//! use heron::dsl::{AggregateOp, Measure, QueryDsl};
//! use heron::validation::validate;
//!
//! let catalog = DatasetCatalog::new("d1", vec![
//!     ColumnMetadata::new("city", ColumnType::Text),
//!     ColumnMetadata::new("amount", ColumnType::Numeric),
//! ]);
//! let dsl = QueryDsl::new("d1").with_measure(Measure::new(AggregateOp::Avg, "city", "avg_city"));
//!
//! let result = validate(&dsl, &catalog);
//! assert!(!result.valid);
//! assert_eq!(result.errors[0].field, "measures");
//! assert_eq!(result.errors[0].suggestion.as_deref(), Some("Numeric columns: amount"));
//! ```

use tracing::debug;

use crate::catalog::DatasetCatalog;
use crate::config::QueryLimits;
use crate::dsl::{Measure, MeasureExpr, QueryDsl, QueryValidationError, QueryValidationResult};

/// Validate `dsl` against `catalog` with the default limits.
pub fn validate(dsl: &QueryDsl, catalog: &DatasetCatalog) -> QueryValidationResult {
    validate_with_limits(dsl, catalog, &QueryLimits::default())
}

/// Validate `dsl` against `catalog` under explicit policy limits.
pub fn validate_with_limits(
    dsl: &QueryDsl,
    catalog: &DatasetCatalog,
    limits: &QueryLimits,
) -> QueryValidationResult {
    let mut validator = Validator::new(catalog, limits);
    validator.validate_query(dsl);

    let result = QueryValidationResult::from_parts(validator.errors, validator.warnings);
    debug!(
        dataset_id = %dsl.dataset_id,
        valid = result.valid,
        errors = result.errors.len(),
        warnings = result.warnings().len(),
        "validated query plan"
    );
    result
}

/// Internal validator state that collects errors and warnings.
struct Validator<'a> {
    catalog: &'a DatasetCatalog,
    limits: &'a QueryLimits,
    errors: Vec<QueryValidationError>,
    warnings: Vec<String>,
}

impl<'a> Validator<'a> {
    fn new(catalog: &'a DatasetCatalog, limits: &'a QueryLimits) -> Self {
        Self {
            catalog,
            limits,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    // ========================================================================
    // Diagnostic helpers
    // ========================================================================

    fn error(&mut self, field: &str, message: impl Into<String>, suggestion: Option<String>) {
        let mut error = QueryValidationError::new(field, message);
        error.suggestion = suggestion;
        self.errors.push(error);
    }

    fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    fn available_columns(&self) -> String {
        format!("Available columns: {}", name_list(&self.catalog.column_names()))
    }

    fn numeric_columns(&self) -> String {
        format!(
            "Numeric columns: {}",
            name_list(&self.catalog.numeric_column_names())
        )
    }

    fn date_columns(&self) -> String {
        format!("Date columns: {}", name_list(&self.catalog.date_column_names()))
    }

    // ========================================================================
    // Checks, in reporting order
    // ========================================================================

    fn validate_query(&mut self, dsl: &QueryDsl) {
        self.validate_dataset(dsl);
        self.validate_filters(dsl);
        self.validate_group_by(dsl);
        self.validate_time_bucket(dsl);
        self.validate_measures(dsl);
        self.validate_order_by(dsl);
        self.validate_limit(dsl);
    }

    fn validate_dataset(&mut self, dsl: &QueryDsl) {
        let expected = self.catalog.dataset_id.clone();
        let suggestion = Some(format!("Use dataset_id '{}'", expected));

        if dsl.dataset_id.trim().is_empty() {
            self.error("dataset_id", "dataset_id is required", suggestion);
        } else if dsl.dataset_id != expected {
            self.error(
                "dataset_id",
                format!(
                    "Dataset ID mismatch: query targets '{}' but the catalog is for '{}'",
                    dsl.dataset_id, expected
                ),
                suggestion,
            );
        }
    }

    fn validate_filters(&mut self, dsl: &QueryDsl) {
        let catalog = self.catalog;
        for filter in &dsl.filters {
            if !catalog.has_column(&filter.column) {
                let suggestion = Some(self.available_columns());
                self.error(
                    "filters",
                    format!("Filter column '{}' does not exist", filter.column),
                    suggestion,
                );
            }
        }
    }

    fn validate_group_by(&mut self, dsl: &QueryDsl) {
        let max_columns = self.limits.max_group_by_columns;
        if dsl.group_by.len() > max_columns {
            self.error(
                "group_by",
                format!(
                    "Too many group_by columns: {} (max {})",
                    dsl.group_by.len(),
                    max_columns
                ),
                Some(format!("Group by at most {} columns", max_columns)),
            );
        }

        let catalog = self.catalog;
        for name in &dsl.group_by {
            match catalog.column(name) {
                None => {
                    let suggestion = Some(self.available_columns());
                    self.error(
                        "group_by",
                        format!("Group by column '{}' does not exist", name),
                        suggestion,
                    );
                }
                Some(column) if column.cardinality > self.limits.max_group_by_cardinality => {
                    let message = format!(
                        "Column '{}' has high cardinality ({} distinct values, threshold {}); \
                         grouping by it may be slow",
                        name, column.cardinality, self.limits.max_group_by_cardinality
                    );
                    self.warning(message);
                }
                Some(_) => {}
            }
        }
    }

    fn validate_time_bucket(&mut self, dsl: &QueryDsl) {
        let Some(bucket) = &dsl.time_bucket else {
            return;
        };

        let catalog = self.catalog;
        match catalog.column(&bucket.column) {
            None => {
                let suggestion = Some(self.date_columns());
                self.error(
                    "time_bucket",
                    format!("Time bucket column '{}' does not exist", bucket.column),
                    suggestion,
                );
            }
            Some(column) if !column.is_date() => {
                let message = format!(
                    "Time bucket column '{}' must be a date column, found {}",
                    bucket.column, column.column_type
                );
                let suggestion = Some(self.date_columns());
                self.error("time_bucket", message, suggestion);
            }
            Some(_) => {}
        }
    }

    fn validate_measures(&mut self, dsl: &QueryDsl) {
        if dsl.measures.is_empty() {
            self.error(
                "measures",
                "At least one measure is required",
                Some("Add a measure such as {\"operation\": \"count\", \"alias\": \"count\"}".to_string()),
            );
            return;
        }

        for measure in &dsl.measures {
            match measure {
                MeasureExpr::Simple(simple) => {
                    self.validate_simple_measure(simple, &format!("Measure '{}'", simple.alias));
                }
                MeasureExpr::Ratio(ratio) => {
                    self.validate_simple_measure(
                        &ratio.numerator,
                        &format!("Ratio '{}' numerator", ratio.alias),
                    );
                    self.validate_simple_measure(
                        &ratio.denominator,
                        &format!("Ratio '{}' denominator", ratio.alias),
                    );
                }
            }
        }
    }

    /// Column presence, existence and type for one aggregation. `label`
    /// prefixes messages so ratio sides can be told apart.
    fn validate_simple_measure(&mut self, measure: &Measure, label: &str) {
        let Some(column_name) = &measure.column else {
            if measure.operation.requires_column() {
                self.error(
                    "measures",
                    format!("{}: operation '{}' requires a column", label, measure.operation),
                    None,
                );
            }
            return;
        };

        let catalog = self.catalog;
        let Some(column) = catalog.column(column_name) else {
            let suggestion = Some(self.available_columns());
            self.error(
                "measures",
                format!("{}: column '{}' does not exist", label, column_name),
                suggestion,
            );
            return;
        };

        if measure.operation.requires_numeric() && !column.is_numeric() {
            let message = format!(
                "{}: operation '{}' requires a numeric column, but '{}' is {}",
                label, measure.operation, column_name, column.column_type
            );
            let suggestion = Some(self.numeric_columns());
            self.error("measures", message, suggestion);
        }
    }

    fn validate_order_by(&mut self, dsl: &QueryDsl) {
        for order in &dsl.order_by {
            let in_group_by = dsl.group_by.iter().any(|g| g == &order.column);
            if in_group_by || dsl.has_alias(&order.column) {
                continue;
            }

            let sortable: Vec<&str> = dsl
                .group_by
                .iter()
                .map(String::as_str)
                .chain(dsl.measures.iter().map(MeasureExpr::alias))
                .collect();
            self.error(
                "order_by",
                format!(
                    "Order by column '{}' must be in group_by or be a measure alias",
                    order.column
                ),
                Some(format!("Sortable columns: {}", name_list(&sortable))),
            );
        }
    }

    fn validate_limit(&mut self, dsl: &QueryDsl) {
        let max_rows = self.limits.max_result_rows;
        if let Some(limit) = dsl.limit.filter(|&limit| limit > max_rows) {
            self.warning(format!(
                "Requested limit {} exceeds the maximum of {} rows; results will be capped at {}",
                limit, max_rows, max_rows
            ));
        }
    }
}

/// Comma-separated names, or "none".
fn name_list(names: &[&str]) -> String {
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}
