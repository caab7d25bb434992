//! Dataset catalogs: the validation context for query plans.
//!
//! A [`DatasetCatalog`] is built once per dataset from the statistical summary
//! produced by a profiling step (see [`builder`]) and reused, unchanged, for
//! every plan validated against that dataset.
//!
//! # Example
//!
//! ```
//! use heron::catalog::{build_catalog, ColumnRole, RawStatisticalSummary};
//!
//! let summary: RawStatisticalSummary = serde_json::from_str(r#"{
//!     "total_rows": 1200,
//!     "columns": [
//!         { "name": "amount", "type": "numeric",
//!           "stats": { "null_count": 0, "unique_count": 950, "min": 1.5, "max": 980.0 } },
//!         { "name": "order_date", "type": "date",
//!           "stats": { "null_count": 12, "unique_count": 365 } },
//!         { "name": "region", "type": "text",
//!           "stats": { "null_count": 0, "unique_count": 4 },
//!           "sample_values": ["North", "South"] }
//!     ]
//! }"#).unwrap();
//!
//! let catalog = build_catalog("orders", &summary);
//! assert_eq!(catalog.column("amount").unwrap().role, ColumnRole::Measure);
//! assert_eq!(catalog.column("order_date").unwrap().role, ColumnRole::Time);
//! assert_eq!(catalog.column("region").unwrap().role, ColumnRole::Dimension);
//! ```

pub mod builder;
mod inflection;
mod summary;

pub use builder::{build_catalog, infer_role, CatalogBuilder};
pub use inflection::{humanize, pluralize, singularize};
pub use summary::{ColumnStats, ColumnSummary, RawStatisticalSummary};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::warn;

/// Storage type of a column, as reported by profiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ColumnType {
    Numeric,
    Text,
    Date,
    Boolean,
    /// Mixed or unrecognised content.
    #[default]
    Mixed,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Numeric => "numeric",
            ColumnType::Text => "text",
            ColumnType::Date => "date",
            ColumnType::Boolean => "boolean",
            ColumnType::Mixed => "mixed",
        }
    }
}

impl From<String> for ColumnType {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "numeric" => ColumnType::Numeric,
            "text" => ColumnType::Text,
            "date" => ColumnType::Date,
            "boolean" => ColumnType::Boolean,
            _ => ColumnType::Mixed,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic role of a column. A hint for planners, never authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnRole {
    Dimension,
    Measure,
    Time,
    Identifier,
}

impl ColumnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnRole::Dimension => "dimension",
            ColumnRole::Measure => "measure",
            ColumnRole::Time => "time",
            ColumnRole::Identifier => "identifier",
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One dataset column.
///
/// Profilers report the distinct count as `unique_count`, `cardinality` or
/// both; either key is read into `cardinality`, and `cardinality` wins when
/// both are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ColumnRecord")]
pub struct ColumnMetadata {
    /// Unique within its catalog.
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub role: ColumnRole,
    pub nullable: bool,
    /// 0 to 100.
    pub null_percentage: f64,
    /// Distinct value count.
    pub cardinality: u64,
    #[serde(default)]
    pub sample_values: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub median: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub std_dev: Option<f64>,
}

/// Wire shape of [`ColumnMetadata`] before the distinct counts are merged.
#[derive(Deserialize)]
struct ColumnRecord {
    name: String,
    #[serde(rename = "type")]
    column_type: ColumnType,
    role: ColumnRole,
    nullable: bool,
    null_percentage: f64,
    #[serde(default)]
    cardinality: Option<u64>,
    #[serde(default)]
    unique_count: Option<u64>,
    #[serde(default)]
    sample_values: Vec<serde_json::Value>,
    #[serde(default)]
    synonyms: Vec<String>,
    #[serde(default)]
    min: Option<f64>,
    #[serde(default)]
    max: Option<f64>,
    #[serde(default)]
    mean: Option<f64>,
    #[serde(default)]
    median: Option<f64>,
    #[serde(default)]
    std_dev: Option<f64>,
}

impl From<ColumnRecord> for ColumnMetadata {
    fn from(record: ColumnRecord) -> Self {
        Self {
            name: record.name,
            column_type: record.column_type,
            role: record.role,
            nullable: record.nullable,
            null_percentage: record.null_percentage,
            cardinality: record.cardinality.or(record.unique_count).unwrap_or(0),
            sample_values: record.sample_values,
            synonyms: record.synonyms,
            min: record.min,
            max: record.max,
            mean: record.mean,
            median: record.median,
            std_dev: record.std_dev,
        }
    }
}

impl ColumnMetadata {
    /// A column with no statistics. Role follows the type-based inference.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            role: infer_role(column_type, 0, 0, u64::MAX),
            nullable: false,
            null_percentage: 0.0,
            cardinality: 0,
            sample_values: Vec::new(),
            synonyms: Vec::new(),
            min: None,
            max: None,
            mean: None,
            median: None,
            std_dev: None,
        }
    }

    pub fn with_role(mut self, role: ColumnRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_cardinality(mut self, cardinality: u64) -> Self {
        self.cardinality = cardinality;
        self
    }

    pub fn with_synonyms<I, S>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms = synonyms.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_numeric(&self) -> bool {
        self.column_type == ColumnType::Numeric
    }

    pub fn is_date(&self) -> bool {
        self.column_type == ColumnType::Date
    }

    /// Case-insensitive match on the name or any synonym.
    pub fn answers_to(&self, term: &str) -> bool {
        self.name.eq_ignore_ascii_case(term)
            || self.synonyms.iter().any(|s| s.eq_ignore_ascii_case(term))
    }
}

/// Column metadata for one dataset.
///
/// Column names are unique. [`DatasetCatalog::new`] and deserialization keep
/// the first column of each name and record a warning for every duplicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CatalogRecord")]
pub struct DatasetCatalog {
    pub dataset_id: String,
    pub row_count: u64,
    pub column_count: u64,
    pub columns: Vec<ColumnMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<f64>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

#[derive(Deserialize)]
struct CatalogRecord {
    dataset_id: String,
    row_count: u64,
    column_count: u64,
    columns: Vec<ColumnMetadata>,
    #[serde(default)]
    quality_score: Option<f64>,
    #[serde(default)]
    warnings: Vec<String>,
}

impl From<CatalogRecord> for DatasetCatalog {
    fn from(record: CatalogRecord) -> Self {
        let mut catalog = Self {
            dataset_id: record.dataset_id,
            row_count: record.row_count,
            column_count: record.column_count,
            columns: record.columns,
            quality_score: record.quality_score,
            warnings: record.warnings,
        };
        catalog.drop_duplicate_columns();
        catalog
    }
}

/// Catalog warning for a column name seen more than once.
pub(crate) fn duplicate_column_warning(name: &str) -> String {
    format!("Duplicate column '{}' ignored; the first definition is used", name)
}

impl DatasetCatalog {
    /// A catalog over `columns` with no dataset-level statistics.
    pub fn new(dataset_id: impl Into<String>, columns: Vec<ColumnMetadata>) -> Self {
        let mut catalog = Self {
            dataset_id: dataset_id.into(),
            row_count: 0,
            column_count: 0,
            columns,
            quality_score: None,
            warnings: Vec::new(),
        };
        catalog.drop_duplicate_columns();
        catalog.column_count = catalog.columns.len() as u64;
        catalog
    }

    fn drop_duplicate_columns(&mut self) {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        self.columns.retain(|column| {
            if seen.insert(column.name.clone()) {
                true
            } else {
                duplicates.push(column.name.clone());
                false
            }
        });

        for name in duplicates {
            warn!(
                dataset_id = %self.dataset_id,
                column = %name,
                "duplicate column in catalog, keeping first"
            );
            self.warnings.push(duplicate_column_warning(&name));
        }
    }

    /// Look up a column by exact name. Names are unique, see [`DatasetCatalog`].
    pub fn column(&self, name: &str) -> Option<&ColumnMetadata> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn columns_of_type(&self, column_type: ColumnType) -> impl Iterator<Item = &ColumnMetadata> {
        self.columns
            .iter()
            .filter(move |c| c.column_type == column_type)
    }

    pub fn numeric_column_names(&self) -> Vec<&str> {
        self.columns_of_type(ColumnType::Numeric)
            .map(|c| c.name.as_str())
            .collect()
    }

    pub fn date_column_names(&self) -> Vec<&str> {
        self.columns_of_type(ColumnType::Date)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Map a natural-language term to a column.
    ///
    /// Tries the exact name, then a case-insensitive name, then synonyms.
    pub fn resolve_column(&self, term: &str) -> Option<&ColumnMetadata> {
        let term = term.trim();
        self.column(term)
            .or_else(|| {
                self.columns
                    .iter()
                    .find(|c| c.name.eq_ignore_ascii_case(term))
            })
            .or_else(|| self.columns.iter().find(|c| c.answers_to(term)))
    }
}
