//! The query DSL: a typed intermediate representation for analytical queries.
//!
//! An LLM planner emits a [`QueryDsl`] as JSON instead of raw SQL, so the plan
//! can be checked against a [`crate::catalog::DatasetCatalog`] before anything
//! runs. The vocabulary is closed: filters, grouping, time bucketing, measures
//! (including ratios), ordering, a row limit and post-aggregation transforms.
//!
//! # Example
//!
//! ```
//! use heron::dsl::QueryDsl;
//!
//! let dsl = QueryDsl::from_json(r#"{
//!     "dataset_id": "sales_2024",
//!     "group_by": ["region"],
//!     "measures": [
//!         { "operation": "sum", "column": "amount", "alias": "revenue" },
//!         {
//!             "operation": "ratio",
//!             "numerator": { "operation": "sum", "column": "profit", "alias": "p" },
//!             "denominator": { "operation": "sum", "column": "amount", "alias": "a" },
//!             "safe_zero": true,
//!             "alias": "margin"
//!         }
//!     ],
//!     "order_by": [{ "column": "revenue", "direction": "desc" }],
//!     "limit": 10
//! }"#).unwrap();
//!
//! assert_eq!(dsl.output_columns(), vec!["region", "revenue", "margin"]);
//! ```

mod filter;
mod measure;
mod query;
mod result;

pub use filter::{FilterOperator, QueryFilter};
pub use measure::{AggregateOp, Measure, MeasureExpr, RatioMeasure, RatioOp};
pub use query::{Granularity, OrderBy, PostOp, QueryDsl, SortDirection, TimeBucket};
pub use result::{QueryExecutionResult, QueryValidationError, QueryValidationResult};
