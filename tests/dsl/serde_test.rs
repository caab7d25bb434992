//! Wire format of query plans and validation results.

use heron::dsl::{
    AggregateOp, FilterOperator, Granularity, Measure, MeasureExpr, OrderBy, PostOp, QueryDsl,
    QueryFilter, QueryValidationError, QueryValidationResult, RatioMeasure, SortDirection,
};
use heron::error::read_json;
use heron::HeronError;
use serde_json::json;

#[test]
fn test_minimal_plan() {
    let dsl = QueryDsl::from_json(
        r#"{ "dataset_id": "d1", "measures": [{ "operation": "count", "alias": "total" }] }"#,
    )
    .unwrap();

    assert_eq!(dsl.dataset_id, "d1");
    assert!(dsl.filters.is_empty());
    assert!(dsl.group_by.is_empty());
    assert!(dsl.time_bucket.is_none());
    assert!(dsl.order_by.is_empty());
    assert!(dsl.limit.is_none());
    assert!(dsl.post_ops.is_empty());
    assert_eq!(dsl.measures, vec![MeasureExpr::Simple(Measure::count("total"))]);
}

#[test]
fn test_full_plan() {
    let dsl = QueryDsl::from_json(
        r#"{
            "dataset_id": "sales",
            "filters": [
                { "column": "region", "operator": "in", "value": ["North", "South"] },
                { "column": "order_date", "operator": "date_between",
                  "value": "2024-01-01", "value2": "2024-06-30" }
            ],
            "group_by": ["region"],
            "time_bucket": { "column": "order_date", "granularity": "quarter" },
            "measures": [
                { "operation": "sum", "column": "amount", "alias": "revenue" },
                { "operation": "count_distinct", "column": "customer_id", "alias": "customers" }
            ],
            "order_by": [{ "column": "revenue", "direction": "desc" }],
            "limit": 20,
            "post_ops": ["percent_of_total", "rank"]
        }"#,
    )
    .unwrap();

    assert_eq!(dsl.filters[0].operator, FilterOperator::In);
    assert_eq!(dsl.filters[0].value, json!(["North", "South"]));
    assert_eq!(dsl.filters[1].operator, FilterOperator::DateBetween);
    assert!(dsl.filters[1].operator.is_range());
    assert_eq!(dsl.filters[1].value2, Some(json!("2024-06-30")));

    let bucket = dsl.time_bucket.as_ref().unwrap();
    assert_eq!(bucket.granularity, Granularity::Quarter);

    assert_eq!(dsl.order_by, vec![OrderBy::desc("revenue")]);
    assert_eq!(dsl.limit, Some(20));
    assert_eq!(dsl.post_ops, vec![PostOp::PercentOfTotal, PostOp::Rank]);
    assert_eq!(
        dsl.output_columns(),
        vec!["region", "order_date", "revenue", "customers"]
    );
}

#[test]
fn test_ratio_measure_is_recognised() {
    let dsl = QueryDsl::from_json(
        r#"{
            "dataset_id": "d1",
            "measures": [{
                "operation": "ratio",
                "numerator": { "operation": "sum", "column": "profit", "alias": "p" },
                "denominator": { "operation": "count", "alias": "n" },
                "safe_zero": true,
                "alias": "profit_per_order"
            }]
        }"#,
    )
    .unwrap();

    let MeasureExpr::Ratio(ratio) = &dsl.measures[0] else {
        panic!("expected a ratio measure, got {:?}", dsl.measures[0]);
    };
    assert_eq!(ratio.alias, "profit_per_order");
    assert_eq!(ratio.numerator.operation, AggregateOp::Sum);
    assert_eq!(ratio.denominator, Measure::count("n"));
    assert_eq!(ratio.safe_zero, Some(true));
    assert_eq!(dsl.measures[0].columns(), vec!["profit"]);
}

#[test]
fn test_ratio_serializes_with_operation_tag() {
    let ratio = RatioMeasure::new(
        Measure::new(AggregateOp::Sum, "profit", "p"),
        Measure::new(AggregateOp::Sum, "amount", "a"),
        "margin",
    )
    .with_safe_zero(false);

    let value = serde_json::to_value(MeasureExpr::from(ratio)).unwrap();
    assert_eq!(value["operation"], json!("ratio"));
    assert_eq!(value["safe_zero"], json!(false));
    assert_eq!(value["numerator"]["column"], json!("profit"));
}

#[test]
fn test_order_by_direction_defaults_to_asc() {
    let order: OrderBy = serde_json::from_value(json!({ "column": "region" })).unwrap();
    assert_eq!(order.direction, SortDirection::Asc);
}

#[test]
fn test_between_filter_builder() {
    let filter = QueryFilter::between("amount", 10, 100);
    let value = serde_json::to_value(&filter).unwrap();
    assert_eq!(
        value,
        json!({ "column": "amount", "operator": "between", "value": 10, "value2": 100 })
    );
}

#[test]
fn test_empty_optional_fields_are_omitted() {
    let dsl = QueryDsl::new("d1").with_measure(Measure::count("n"));
    let value = serde_json::to_value(&dsl).unwrap();
    assert_eq!(
        value,
        json!({ "dataset_id": "d1", "measures": [{ "operation": "count", "alias": "n" }] })
    );
}

#[test]
fn test_unknown_operation_is_a_parse_error() {
    let result = QueryDsl::from_json(
        r#"{ "dataset_id": "d1", "measures": [{ "operation": "median", "column": "x", "alias": "m" }] }"#,
    );
    assert!(matches!(result, Err(HeronError::Json { .. })));
}

#[test]
fn test_malformed_ratio_side_reports_inner_error() {
    let result = QueryDsl::from_json(
        r#"{
            "dataset_id": "d1",
            "measures": [{
                "operation": "ratio",
                "numerator": { "operation": "median", "column": "profit", "alias": "p" },
                "denominator": { "operation": "count", "alias": "n" },
                "alias": "margin"
            }]
        }"#,
    );

    let message = match result {
        Err(error @ HeronError::Json { .. }) => error.to_string(),
        other => panic!("expected a JSON error, got {:?}", other),
    };
    assert!(message.contains("unknown variant `median`"), "{}", message);
    assert!(!message.contains("did not match any variant"), "{}", message);
}

#[test]
fn test_ratio_recognised_by_numerator_key() {
    let result = QueryDsl::from_json(
        r#"{
            "dataset_id": "d1",
            "measures": [{
                "operation": "sum",
                "numerator": { "operation": "sum", "column": "profit", "alias": "p" },
                "denominator": { "operation": "count", "alias": "n" },
                "alias": "margin"
            }]
        }"#,
    );

    let message = result.unwrap_err().to_string();
    assert!(message.contains("unknown variant `sum`"), "{}", message);
}

#[test]
fn test_missing_required_fields_are_parse_errors() {
    assert!(QueryDsl::from_json(r#"{ "dataset_id": "d1" }"#).is_err());
    assert!(QueryDsl::from_json(r#"{ "measures": [] }"#).is_err());
}

#[test]
fn test_unknown_granularity_is_a_parse_error() {
    let result = QueryDsl::from_json(
        r#"{ "dataset_id": "d1", "time_bucket": { "column": "d", "granularity": "decade" },
             "measures": [{ "operation": "count", "alias": "n" }] }"#,
    );
    assert!(result.is_err());
}

#[test]
fn test_validation_result_omits_absent_warnings() {
    let ok = QueryValidationResult::ok();
    assert_eq!(
        serde_json::to_value(&ok).unwrap(),
        json!({ "valid": true, "errors": [] })
    );

    let failed = QueryValidationResult::from_parts(
        vec![QueryValidationError::new("measures", "At least one measure is required")],
        vec!["slow".to_string()],
    );
    let value = serde_json::to_value(&failed).unwrap();
    assert_eq!(value["valid"], json!(false));
    assert_eq!(value["warnings"], json!(["slow"]));
    assert!(value["errors"][0].get("suggestion").is_none());
}

#[test]
fn test_from_parts_normalizes_empty_warnings() {
    let result = QueryValidationResult::from_parts(Vec::new(), Vec::new());
    assert!(result.valid);
    assert_eq!(result.warnings, None);
    assert!(result.warnings().is_empty());
}

#[test]
fn test_error_display() {
    let error = QueryValidationError::new("filters", "Filter column 'x' does not exist")
        .with_suggestion("Available columns: a, b");
    assert_eq!(
        error.to_string(),
        "filters: Filter column 'x' does not exist (Available columns: a, b)"
    );
}

#[test]
fn test_read_query_file() {
    let path = std::env::temp_dir().join(format!("heron_plan_{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "dataset_id": "d1", "measures": [{ "operation": "nope" }] }"#).unwrap();
    let malformed = read_json::<QueryDsl, _>(&path, "query DSL");
    std::fs::remove_file(&path).unwrap();

    match malformed {
        Err(error @ HeronError::Json { .. }) => {
            assert!(error.to_string().starts_with("Malformed query DSL:"), "{}", error)
        }
        other => panic!("expected a JSON error, got {:?}", other),
    }

    let missing = read_json::<QueryDsl, _>("/nonexistent/plan.json", "query DSL");
    assert!(matches!(missing, Err(HeronError::Io { .. })));
}
