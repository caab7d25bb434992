//! # Heron
//!
//! Catalog-aware validation for analytical query plans.
//!
//! ## Architecture
//!
//! Heron sits between an LLM planner that turns a natural-language question
//! into a structured query plan and the SQL executor that runs it:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │          RawStatisticalSummary (profiling output)        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [catalog builder]
//! ┌─────────────────────────────────────────────────────────┐
//! │     DatasetCatalog (typed, role-tagged columns)          │
//! └─────────────────────────────────────────────────────────┘
//!                          │            ▲
//!                          │            │ QueryDsl (from planner)
//!                          ▼ [validator]
//! ┌─────────────────────────────────────────────────────────┐
//! │   QueryValidationResult (errors + warnings, as data)     │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [external executor, only if valid]
//! ┌─────────────────────────────────────────────────────────┐
//! │                 QueryExecutionResult                     │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything in this crate is synchronous and pure: no I/O happens outside
//! of [`config::Settings`] loading and the CLI binary.

pub mod catalog;
pub mod config;
pub mod dsl;
pub mod error;
pub mod validation;

pub use catalog::{build_catalog, CatalogBuilder, ColumnMetadata, ColumnRole, ColumnType, DatasetCatalog};
pub use config::{QueryLimits, Settings};
pub use dsl::{
    AggregateOp, FilterOperator, Granularity, Measure, MeasureExpr, OrderBy, PostOp, QueryDsl,
    QueryExecutionResult, QueryFilter, QueryValidationError, QueryValidationResult, RatioMeasure,
    SortDirection, TimeBucket,
};
pub use error::{HeronError, HeronResult};
pub use validation::{validate, validate_with_limits};
