//! Ratio measures are validated side by side, like simple measures.

use heron::catalog::{ColumnMetadata, ColumnType, DatasetCatalog};
use heron::dsl::{AggregateOp, Measure, OrderBy, QueryDsl, RatioMeasure};
use heron::validation::validate;
use insta::assert_snapshot;

fn catalog() -> DatasetCatalog {
    DatasetCatalog::new(
        "d1",
        vec![
            ColumnMetadata::new("region", ColumnType::Text),
            ColumnMetadata::new("profit", ColumnType::Numeric),
            ColumnMetadata::new("amount", ColumnType::Numeric),
        ],
    )
}

fn with_ratio(numerator: Measure, denominator: Measure) -> QueryDsl {
    QueryDsl::new("d1").with_measure(RatioMeasure::new(numerator, denominator, "margin"))
}

#[test]
fn test_valid_ratio() {
    let dsl = with_ratio(
        Measure::new(AggregateOp::Sum, "profit", "p"),
        Measure::new(AggregateOp::Sum, "amount", "a"),
    );
    let result = validate(&dsl, &catalog());
    assert!(result.valid, "{:?}", result.errors);
}

#[test]
fn test_ratio_over_row_count() {
    let dsl = with_ratio(Measure::new(AggregateOp::Sum, "profit", "p"), Measure::count("n"));
    assert!(validate(&dsl, &catalog()).valid);
}

#[test]
fn test_numerator_column_missing() {
    let dsl = with_ratio(
        Measure::new(AggregateOp::Sum, "revenue", "r"),
        Measure::new(AggregateOp::Sum, "amount", "a"),
    );
    let result = validate(&dsl, &catalog());

    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].field, "measures");
    assert_snapshot!(
        &result.errors[0].message,
        @"Ratio 'margin' numerator: column 'revenue' does not exist"
    );
}

#[test]
fn test_denominator_wrong_type() {
    let dsl = with_ratio(
        Measure::new(AggregateOp::Sum, "profit", "p"),
        Measure::new(AggregateOp::Avg, "region", "a"),
    );
    let result = validate(&dsl, &catalog());

    assert_eq!(result.errors.len(), 1);
    assert_snapshot!(
        &result.errors[0].message,
        @"Ratio 'margin' denominator: operation 'avg' requires a numeric column, but 'region' is text"
    );
    assert_eq!(
        result.errors[0].suggestion.as_deref(),
        Some("Numeric columns: profit, amount")
    );
}

#[test]
fn test_both_sides_reported() {
    let dsl = with_ratio(
        Measure {
            operation: AggregateOp::Sum,
            column: None,
            alias: "p".to_string(),
        },
        Measure::new(AggregateOp::Max, "nope", "a"),
    );
    let result = validate(&dsl, &catalog());

    assert_eq!(result.errors.len(), 2);
    assert!(result.errors[0].message.starts_with("Ratio 'margin' numerator:"));
    assert!(result.errors[1].message.starts_with("Ratio 'margin' denominator:"));
}

#[test]
fn test_ratio_alias_is_sortable() {
    let dsl = with_ratio(
        Measure::new(AggregateOp::Sum, "profit", "p"),
        Measure::new(AggregateOp::Sum, "amount", "a"),
    )
    .with_group_by("region")
    .with_order_by(OrderBy::desc("margin"));
    assert!(validate(&dsl, &catalog()).valid);
}

#[test]
fn test_inner_aliases_are_not_sortable() {
    let dsl = with_ratio(
        Measure::new(AggregateOp::Sum, "profit", "p"),
        Measure::new(AggregateOp::Sum, "amount", "a"),
    )
    .with_order_by(OrderBy::desc("p"));
    let result = validate(&dsl, &catalog());
    assert_eq!(result.error_fields(), vec!["order_by"]);
}
