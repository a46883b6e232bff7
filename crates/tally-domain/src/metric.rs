//! Metric module - named, typed extraction targets

use serde::{Deserialize, Serialize};

/// Declared type of a metric value
///
/// The type drives normalization and column formatting:
/// - Text: verbatim strings (the default)
/// - Number: decimal numbers, thousands-separated in the artifact
/// - Date: fixed MM/DD/YYYY convention, passed through untouched
/// - Percentage: decimal fractions (0.15 means 15%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricType {
    /// Verbatim text
    Text,

    /// Decimal number, currency symbols and separators stripped
    Number,

    /// Date string, passed through without reformatting
    Date,

    /// Decimal fraction of 1.0
    Percentage,
}

impl MetricType {
    /// Get the type name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::Text => "text",
            MetricType::Number => "number",
            MetricType::Date => "date",
            MetricType::Percentage => "percentage",
        }
    }

    /// Parse a type from a string (internal use)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(MetricType::Text),
            "number" => Some(MetricType::Number),
            "date" => Some(MetricType::Date),
            "percentage" => Some(MetricType::Percentage),
            _ => None,
        }
    }

    /// Infer a type from a free-text hint
    ///
    /// First match wins, in order: number ("number", "amount", or a
    /// dollar sign), date ("date"), percentage ("percent" or a percent
    /// sign), then text as the default.
    pub fn infer(hint: &str) -> Self {
        let hint = hint.to_lowercase();
        if hint.contains("number") || hint.contains("amount") || hint.contains('$') {
            MetricType::Number
        } else if hint.contains("date") {
            MetricType::Date
        } else if hint.contains("percent") || hint.contains('%') {
            MetricType::Percentage
        } else {
            MetricType::Text
        }
    }
}

impl std::str::FromStr for MetricType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid metric type: {}", s))
    }
}

impl std::fmt::Display for MetricType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One metric to extract from every document in a batch
///
/// Immutable once created by the schema parser. The `name` is the
/// user-facing column label; the `key` is a lowercased identifier
/// derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricDefinition {
    /// Display label, as authored in the specification line
    pub name: String,

    /// Declared value type
    pub metric_type: MetricType,

    /// Normalized identifier: lowercased name with every character
    /// outside `[a-z0-9]` replaced by an underscore
    pub key: String,
}

impl MetricDefinition {
    /// Create a definition, deriving the key from the name
    pub fn new(name: impl Into<String>, metric_type: MetricType) -> Self {
        let name = name.into();
        let key = derive_key(&name);
        Self {
            name,
            metric_type,
            key,
        }
    }
}

/// Derive a normalized key from a metric name
///
/// Lowercases the name and maps every character outside `[a-z0-9]` to an
/// underscore, one underscore per character.
pub fn derive_key(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                '_'
            }
        })
        .collect()
}
