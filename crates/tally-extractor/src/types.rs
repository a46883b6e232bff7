//! Result types for extraction

use serde_json::{Map, Value};

/// Outcome of extracting one document
///
/// `error` set and `values` empty signals total failure for that
/// document. Partial `values` with missing metric names is a valid
/// success: a metric absent from a document is expected, not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentExtraction {
    /// Label of the document, usually the original file name
    pub label: String,

    /// Raw extracted values keyed by metric name, verbatim from the backend
    pub values: Map<String, Value>,

    /// Failure description, when the whole document failed
    pub error: Option<String>,
}

impl DocumentExtraction {
    /// A successful extraction with its raw values
    pub fn success(label: impl Into<String>, values: Map<String, Value>) -> Self {
        Self {
            label: label.into(),
            values,
            error: None,
        }
    }

    /// A failed extraction; values stay empty
    pub fn failure(label: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            values: Map::new(),
            error: Some(error.into()),
        }
    }

    /// Whether this document failed entirely
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }

    /// Look up a raw value by metric name
    ///
    /// Exact match first, falling back to the first case-insensitive
    /// match.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        if let Some(value) = self.values.get(name) {
            return Some(value);
        }

        self.values
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }
}
