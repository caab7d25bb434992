//! Catalog construction from profiling statistics.
//!
//! Turns a [`RawStatisticalSummary`] into a [`DatasetCatalog`]: null rates,
//! inferred roles, descriptive stats and synonyms per column. Missing or
//! malformed statistics degrade to safe defaults; building never fails and
//! the same input always produces the same catalog.

use std::collections::HashSet;

use tracing::{debug, warn};

use super::inflection::derive_synonyms;
use super::summary::{ColumnStats, ColumnSummary, RawStatisticalSummary};
use super::{duplicate_column_warning, ColumnMetadata, ColumnRole, ColumnType, DatasetCatalog};

/// Build a catalog with the default options.
pub fn build_catalog(dataset_id: &str, summary: &RawStatisticalSummary) -> DatasetCatalog {
    CatalogBuilder::default().build(dataset_id, summary)
}

/// Infer a column's role from its type and cardinality.
///
/// Type wins: numeric columns are measures and date columns are time. Any
/// other column whose values are all distinct is an identifier once there
/// are more than `identifier_min_rows` rows. Everything else is a dimension.
pub fn infer_role(
    column_type: ColumnType,
    unique_count: u64,
    total_count: u64,
    identifier_min_rows: u64,
) -> ColumnRole {
    match column_type {
        ColumnType::Numeric => ColumnRole::Measure,
        ColumnType::Date => ColumnRole::Time,
        _ if unique_count == total_count && total_count > identifier_min_rows => {
            ColumnRole::Identifier
        }
        _ => ColumnRole::Dimension,
    }
}

/// Configurable catalog builder.
#[derive(Debug, Clone)]
pub struct CatalogBuilder {
    identifier_min_rows: u64,
    generate_synonyms: bool,
}

impl Default for CatalogBuilder {
    fn default() -> Self {
        Self {
            identifier_min_rows: 100,
            generate_synonyms: true,
        }
    }
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identifier_min_rows(mut self, rows: u64) -> Self {
        self.identifier_min_rows = rows;
        self
    }

    pub fn generate_synonyms(mut self, enabled: bool) -> Self {
        self.generate_synonyms = enabled;
        self
    }

    pub fn build(&self, dataset_id: &str, summary: &RawStatisticalSummary) -> DatasetCatalog {
        let mut warnings = summary.warnings.clone();
        let mut seen = HashSet::new();
        let mut columns = Vec::with_capacity(summary.columns.len());

        for column in &summary.columns {
            if !seen.insert(column.name.as_str()) {
                warn!(
                    dataset_id,
                    column = %column.name,
                    "duplicate column in summary, keeping first"
                );
                warnings.push(duplicate_column_warning(&column.name));
                continue;
            }
            columns.push(self.build_column(column, summary.total_rows));
        }

        let catalog = DatasetCatalog {
            dataset_id: dataset_id.to_string(),
            row_count: summary.total_rows,
            column_count: summary.total_columns.unwrap_or(columns.len() as u64),
            columns,
            quality_score: summary.data_quality_score,
            warnings,
        };

        debug!(
            dataset_id,
            rows = catalog.row_count,
            columns = catalog.columns.len(),
            "built dataset catalog"
        );

        catalog
    }

    fn build_column(&self, column: &ColumnSummary, total_rows: u64) -> ColumnMetadata {
        let total_count = column.count.unwrap_or(total_rows);
        let default_stats = ColumnStats::default();
        let stats = column.stats.as_ref().unwrap_or(&default_stats);

        let null_percentage = null_percentage(stats.null_count, total_count);
        // Descriptive stats only describe numeric columns
        let numeric = column.column_type == ColumnType::Numeric;
        let stat = |value: &Option<serde_json::Value>| number(value).filter(|_| numeric);
        let role = column.role.unwrap_or_else(|| {
            infer_role(
                column.column_type,
                stats.unique_count,
                total_count,
                self.identifier_min_rows,
            )
        });

        ColumnMetadata {
            name: column.name.clone(),
            column_type: column.column_type,
            role,
            nullable: null_percentage > 0.0,
            null_percentage,
            cardinality: stats.unique_count,
            sample_values: column.sample_values.clone(),
            synonyms: self.synonyms_for(column),
            min: stat(&stats.min),
            max: stat(&stats.max),
            mean: stat(&stats.mean),
            median: stat(&stats.median),
            std_dev: stat(&stats.std_dev),
        }
    }

    fn synonyms_for(&self, column: &ColumnSummary) -> Vec<String> {
        let mut synonyms = column.synonyms.clone();
        if self.generate_synonyms {
            for derived in derive_synonyms(&column.name) {
                if !synonyms.iter().any(|s| s.eq_ignore_ascii_case(&derived)) {
                    synonyms.push(derived);
                }
            }
        }
        synonyms
    }
}

/// Percentage of null rows, 0 when there are no rows.
fn null_percentage(null_count: u64, total_count: u64) -> f64 {
    if total_count == 0 {
        return 0.0;
    }
    (null_count as f64 / total_count as f64 * 100.0).clamp(0.0, 100.0)
}

fn number(value: &Option<serde_json::Value>) -> Option<f64> {
    value.as_ref().and_then(serde_json::Value::as_f64)
}
