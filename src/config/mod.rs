//! Configuration module for Heron.
//!
//! Handles query policy limits and TOML settings.

mod limits;
mod settings;

pub use limits::{
    QueryLimits, MAX_GROUP_BY_CARDINALITY, MAX_GROUP_BY_COLUMNS, MAX_QUERY_TIMEOUT_MS,
    MAX_RESULT_ROWS,
};
pub use settings::{expand_env_vars, CatalogSettings, LoggingSettings, Settings, SettingsError};
