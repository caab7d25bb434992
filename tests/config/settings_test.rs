//! TOML settings.

use heron::catalog::{ColumnRole, ColumnStats, ColumnSummary, ColumnType, RawStatisticalSummary};
use heron::config::{QueryLimits, Settings, SettingsError};
use std::env;
use std::fs;

#[test]
fn test_default_settings() {
    let settings = Settings::default();

    assert_eq!(settings.limits, QueryLimits::default());
    assert_eq!(settings.catalog.identifier_min_rows, 100);
    assert!(settings.catalog.generate_synonyms);
    assert_eq!(settings.logging.filter, "heron=info");
}

#[test]
fn test_parse_toml() {
    let toml = r#"
[limits]
max_group_by_cardinality = 2000
max_result_rows = 500

[catalog]
identifier_min_rows = 10
generate_synonyms = false

[logging]
filter = "heron=debug"
"#;

    let settings = Settings::from_toml(toml).unwrap();

    assert_eq!(settings.limits.max_group_by_cardinality, 2000);
    assert_eq!(settings.limits.max_result_rows, 500);
    // Unset keys keep their defaults
    assert_eq!(settings.limits.max_group_by_columns, 5);
    assert_eq!(settings.limits.max_query_timeout_ms, 30_000);
    assert_eq!(settings.catalog.identifier_min_rows, 10);
    assert!(!settings.catalog.generate_synonyms);
    assert_eq!(settings.logging.filter, "heron=debug");
}

#[test]
fn test_empty_toml_is_default() {
    let settings = Settings::from_toml("").unwrap();
    assert_eq!(settings.limits, QueryLimits::default());
}

#[test]
fn test_zero_limit_is_rejected() {
    let result = Settings::from_toml("[limits]\nmax_result_rows = 0\n");
    match result {
        Err(SettingsError::InvalidConfig(msg)) => assert!(msg.contains("max_result_rows")),
        other => panic!("expected InvalidConfig, got {:?}", other),
    }
}

#[test]
fn test_malformed_toml() {
    let result = Settings::from_toml("[limits\nmax_result_rows = 1");
    assert!(matches!(result, Err(SettingsError::ParseError(_))));
}

#[test]
fn test_from_file() {
    let path = env::temp_dir().join(format!("heron_settings_test_{}.toml", std::process::id()));
    fs::write(&path, "[limits]\nmax_group_by_columns = 3\n").unwrap();

    let settings = Settings::from_file(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(settings.limits.max_group_by_columns, 3);
}

#[test]
fn test_missing_file() {
    let result = Settings::from_file("/nonexistent/heron.toml");
    assert!(matches!(result, Err(SettingsError::FileNotFound(_))));
}

#[test]
fn test_logging_filter_expansion() {
    env::set_var("HERON_SETTINGS_TEST_LEVEL", "trace");
    let settings = Settings::from_toml("[logging]\nfilter = \"heron=${HERON_SETTINGS_TEST_LEVEL}\"\n")
        .unwrap();
    assert_eq!(settings.logging.resolved_filter().unwrap(), "heron=trace");
    env::remove_var("HERON_SETTINGS_TEST_LEVEL");
}

#[test]
fn test_catalog_settings_configure_builder() {
    let settings = Settings::from_toml("[catalog]\nidentifier_min_rows = 5\ngenerate_synonyms = false\n")
        .unwrap();
    let summary = RawStatisticalSummary {
        total_rows: 8,
        columns: vec![
            ColumnSummary::new("ticket_code", ColumnType::Text).with_stats(ColumnStats::new(0, 8))
        ],
        ..Default::default()
    };

    let catalog = settings.catalog.builder().build("d", &summary);
    assert_eq!(catalog.columns[0].role, ColumnRole::Identifier);
    assert!(catalog.columns[0].synonyms.is_empty());
}
