//! Aggregations and derived ratio measures.

use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

/// Aggregate function of a simple [`Measure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateOp {
    Sum,
    Avg,
    Min,
    Max,
    Count,
    CountDistinct,
}

impl AggregateOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateOp::Sum => "sum",
            AggregateOp::Avg => "avg",
            AggregateOp::Min => "min",
            AggregateOp::Max => "max",
            AggregateOp::Count => "count",
            AggregateOp::CountDistinct => "count_distinct",
        }
    }

    /// Every operation except `count` needs a column to aggregate.
    pub fn requires_column(&self) -> bool {
        !matches!(self, AggregateOp::Count)
    }

    /// Arithmetic aggregations only make sense over numeric columns.
    pub fn requires_numeric(&self) -> bool {
        matches!(
            self,
            AggregateOp::Sum | AggregateOp::Avg | AggregateOp::Min | AggregateOp::Max
        )
    }
}

impl fmt::Display for AggregateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A simple aggregation producing one output field named `alias`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    pub operation: AggregateOp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    pub alias: String,
}

impl Measure {
    pub fn new(operation: AggregateOp, column: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            operation,
            column: Some(column.into()),
            alias: alias.into(),
        }
    }

    /// `count(*)`.
    pub fn count(alias: impl Into<String>) -> Self {
        Self {
            operation: AggregateOp::Count,
            column: None,
            alias: alias.into(),
        }
    }
}

/// Tag carried in the `operation` field of a ratio measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioOp {
    #[default]
    Ratio,
}

/// `numerator / denominator`, each a simple measure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioMeasure {
    pub operation: RatioOp,
    pub numerator: Measure,
    pub denominator: Measure,
    /// Division by zero yields NULL/0 instead of an error. The policy
    /// belongs to the executor; the flag is only carried through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safe_zero: Option<bool>,
    pub alias: String,
}

impl RatioMeasure {
    pub fn new(numerator: Measure, denominator: Measure, alias: impl Into<String>) -> Self {
        Self {
            operation: RatioOp::Ratio,
            numerator,
            denominator,
            safe_zero: None,
            alias: alias.into(),
        }
    }

    pub fn with_safe_zero(mut self, safe_zero: bool) -> Self {
        self.safe_zero = Some(safe_zero);
        self
    }
}

/// One entry of `QueryDsl::measures`.
///
/// On the wire this is the untagged union `Measure | RatioMeasure`; the
/// ratio form is recognised by `operation: "ratio"` or a `numerator` key.
/// Errors inside either form are reported as they are, not as a failed
/// variant match.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MeasureExpr {
    Ratio(RatioMeasure),
    Simple(Measure),
}

impl<'de> Deserialize<'de> for MeasureExpr {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let operation = value.get("operation").and_then(serde_json::Value::as_str);
        let is_ratio = operation == Some("ratio") || value.get("numerator").is_some();

        let expr = if is_ratio {
            RatioMeasure::deserialize(value).map(MeasureExpr::Ratio)
        } else {
            Measure::deserialize(value).map(MeasureExpr::Simple)
        };
        expr.map_err(de::Error::custom)
    }
}

impl MeasureExpr {
    /// Output field name.
    pub fn alias(&self) -> &str {
        match self {
            MeasureExpr::Simple(m) => &m.alias,
            MeasureExpr::Ratio(r) => &r.alias,
        }
    }

    /// Columns referenced by this measure, numerator before denominator.
    pub fn columns(&self) -> Vec<&str> {
        match self {
            MeasureExpr::Simple(m) => m.column.as_deref().into_iter().collect(),
            MeasureExpr::Ratio(r) => r
                .numerator
                .column
                .as_deref()
                .into_iter()
                .chain(r.denominator.column.as_deref())
                .collect(),
        }
    }
}

impl From<Measure> for MeasureExpr {
    fn from(measure: Measure) -> Self {
        MeasureExpr::Simple(measure)
    }
}

impl From<RatioMeasure> for MeasureExpr {
    fn from(ratio: RatioMeasure) -> Self {
        MeasureExpr::Ratio(ratio)
    }
}
