//! Cell module - typed normalization of raw extracted values

use serde_json::Value;

use crate::metric::MetricType;

/// Sentinel strings the backend is instructed to use for absent metrics
const ABSENT_SENTINELS: [&str; 2] = ["Not found", "N/A"];

/// A normalized table cell
///
/// Produced by [`CellValue::normalize`] from one raw backend value and
/// the metric's declared type. `Number` cells are eligible for numeric
/// column formats in the artifact; `Text` cells never are, even in a
/// numeric column.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Metric absent or value uncoercible; the cell stays blank
    Empty,

    /// The whole document failed extraction; rendered distinctly from blank
    Error,

    /// Numeric value
    Number(f64),

    /// Plain text value
    Text(String),
}

impl CellValue {
    /// Coerce a raw extracted value to the metric's declared type
    ///
    /// Deterministic and total: coercion failure degrades to
    /// [`CellValue::Empty`] (for numbers and percentages) or to a text
    /// passthrough, never to an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use tally_domain::{CellValue, MetricType};
    ///
    /// let v = CellValue::normalize(&json!("$5,000,000"), MetricType::Number);
    /// assert_eq!(v, CellValue::Number(5_000_000.0));
    ///
    /// let v = CellValue::normalize(&json!("15%"), MetricType::Percentage);
    /// assert_eq!(v, CellValue::Number(0.15));
    /// ```
    pub fn normalize(raw: &Value, metric_type: MetricType) -> Self {
        if is_absent(raw) {
            return CellValue::Empty;
        }

        match metric_type {
            MetricType::Number => normalize_number(raw),
            MetricType::Percentage => normalize_percentage(raw),
            MetricType::Date => passthrough(raw),
            MetricType::Text => CellValue::Text(render_raw(raw)),
        }
    }

    /// Whether this cell renders as blank
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// How the cell reads in the artifact
    ///
    /// Used for column-width measurement and for writing non-numeric
    /// cells. `Empty` renders as the empty string.
    pub fn render(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Error => "Error".to_string(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s.clone(),
        }
    }
}

/// Null and the absent-value sentinels normalize to an empty cell
fn is_absent(raw: &Value) -> bool {
    match raw {
        Value::Null => true,
        Value::String(s) => ABSENT_SENTINELS.contains(&s.as_str()),
        _ => false,
    }
}

/// Numbers: strip `$` and thousands separators, then a strict parse
fn normalize_number(raw: &Value) -> CellValue {
    match raw {
        Value::Number(n) => n.as_f64().map(CellValue::Number).unwrap_or(CellValue::Empty),
        Value::String(s) => {
            let cleaned: String = s.chars().filter(|c| !matches!(c, '$' | ',')).collect();
            match cleaned.trim().parse::<f64>() {
                Ok(n) => CellValue::Number(n),
                Err(_) => CellValue::Empty,
            }
        }
        _ => CellValue::Empty,
    }
}

/// Percentages arrive either as decimal fractions (passed through) or as
/// strings with a percent sign (stripped, parsed, divided by 100). A
/// string without a percent sign that still parses is taken as a
/// fraction; one that does not passes through as text.
fn normalize_percentage(raw: &Value) -> CellValue {
    match raw {
        Value::Number(n) => n.as_f64().map(CellValue::Number).unwrap_or(CellValue::Empty),
        Value::String(s) if s.contains('%') => {
            let cleaned: String = s.chars().filter(|c| *c != '%').collect();
            match cleaned.trim().parse::<f64>() {
                Ok(n) => CellValue::Number(n / 100.0),
                Err(_) => CellValue::Empty,
            }
        }
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(n) => CellValue::Number(n),
            Err(_) => CellValue::Text(s.clone()),
        },
        other => CellValue::Text(render_raw(other)),
    }
}

/// Dates pass through without reformatting
fn passthrough(raw: &Value) -> CellValue {
    match raw {
        Value::Number(n) => n.as_f64().map(CellValue::Number).unwrap_or(CellValue::Empty),
        Value::String(s) => CellValue::Text(s.clone()),
        other => CellValue::Text(render_raw(other)),
    }
}

/// Stringify a raw value: strings verbatim, scalars via their display
/// form, composites as compact JSON
fn render_raw(raw: &Value) -> String {
    match raw {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
