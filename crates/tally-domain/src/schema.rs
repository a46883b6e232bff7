//! Schema module - parsing free-text metric specifications

use serde::{Deserialize, Serialize};

use crate::metric::{MetricDefinition, MetricType};

/// Ordered list of metrics for one batch run
///
/// Parsed from a line-oriented specification. Order is significant: it
/// defines the artifact's column order. Duplicate names are kept as
/// authored; callers are responsible for distinct names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSchema {
    metrics: Vec<MetricDefinition>,
}

impl MetricSchema {
    /// Parse a specification string, one metric per line
    ///
    /// Each line is trimmed and stripped of at most one leading bullet
    /// marker (`-`, `•`, or `*`). A line with a colon splits at the
    /// first colon into a name and a type hint; a line without one is a
    /// name with any parenthesized annotations removed and defaults to
    /// text. Lines left with an empty name are dropped. Parsing never
    /// fails; an all-blank input yields an empty schema.
    ///
    /// # Examples
    ///
    /// ```
    /// use tally_domain::{MetricSchema, MetricType};
    ///
    /// let schema = MetricSchema::parse("- Contract Value: number\n- Vendor");
    /// assert_eq!(schema.len(), 2);
    /// assert_eq!(schema.metrics()[0].name, "Contract Value");
    /// assert_eq!(schema.metrics()[0].metric_type, MetricType::Number);
    /// assert_eq!(schema.metrics()[0].key, "contract_value");
    /// ```
    pub fn parse(text: &str) -> Self {
        let mut metrics = Vec::new();

        for line in text.lines() {
            let line = strip_bullet(line.trim());

            let (name, metric_type) = match line.split_once(':') {
                Some((name, hint)) => {
                    (name.trim().to_string(), MetricType::infer(hint.trim()))
                }
                None => (strip_parentheticals(line), MetricType::Text),
            };

            if name.is_empty() {
                continue;
            }

            metrics.push(MetricDefinition::new(name, metric_type));
        }

        Self { metrics }
    }

    /// Build a schema from already-constructed definitions
    pub fn from_definitions(metrics: Vec<MetricDefinition>) -> Self {
        Self { metrics }
    }

    /// The metric definitions, in column order
    pub fn metrics(&self) -> &[MetricDefinition] {
        &self.metrics
    }

    /// Number of metrics in the schema
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    /// Whether the schema has no metrics
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Iterate over the definitions in column order
    pub fn iter(&self) -> std::slice::Iter<'_, MetricDefinition> {
        self.metrics.iter()
    }
}

/// Strip at most one leading bullet marker plus trailing whitespace
fn strip_bullet(line: &str) -> &str {
    line.strip_prefix(['-', '•', '*'])
        .map(str::trim_start)
        .unwrap_or(line)
}

/// Remove every `( ... )` run, matching non-greedily and never nesting.
/// An unclosed parenthesis keeps the rest of the line.
fn strip_parentheticals(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;

    while let Some(open) = rest.find('(') {
        match rest[open..].find(')') {
            Some(close) => {
                out.push_str(&rest[..open]);
                rest = &rest[open + close + 1..];
            }
            None => break,
        }
    }

    out.push_str(rest);
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bulleted_typed_line() {
        let schema = MetricSchema::parse("- Contract Value: number");

        assert_eq!(schema.len(), 1);
        let def = &schema.metrics()[0];
        assert_eq!(def.name, "Contract Value");
        assert_eq!(def.metric_type, MetricType::Number);
        assert_eq!(def.key, "contract_value");
    }

    #[test]
    fn test_parse_bullet_variants() {
        let schema = MetricSchema::parse("- Alpha\n• Beta\n* Gamma");

        let names: Vec<_> = schema.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta", "Gamma"]);
    }

    #[test]
    fn test_parse_splits_at_first_colon() {
        let schema = MetricSchema::parse("Start Time: date: local");

        let def = &schema.metrics()[0];
        assert_eq!(def.name, "Start Time");
        assert_eq!(def.metric_type, MetricType::Date);
    }

    #[test]
    fn test_parse_hint_defaults_to_text() {
        let schema = MetricSchema::parse("Vendor: whatever\nNotes:");

        assert_eq!(schema.metrics()[0].metric_type, MetricType::Text);
        assert_eq!(schema.metrics()[1].metric_type, MetricType::Text);
        assert_eq!(schema.metrics()[1].name, "Notes");
    }

    #[test]
    fn test_parse_no_colon_strips_parentheticals() {
        let schema = MetricSchema::parse("- Revenue (in millions)");

        let def = &schema.metrics()[0];
        assert_eq!(def.name, "Revenue");
        assert_eq!(def.metric_type, MetricType::Text);
    }

    #[test]
    fn test_parse_no_colon_never_infers_type() {
        // Inference only applies to colon hints
        let schema = MetricSchema::parse("Total Amount (USD)");

        let def = &schema.metrics()[0];
        assert_eq!(def.name, "Total Amount");
        assert_eq!(def.metric_type, MetricType::Text);
    }

    #[test]
    fn test_parse_unclosed_parenthesis_kept() {
        let schema = MetricSchema::parse("Revenue (in millions");

        assert_eq!(schema.metrics()[0].name, "Revenue (in millions");
    }

    #[test]
    fn test_parse_drops_empty_lines() {
        let schema = MetricSchema::parse("\n  \n- \n:\nReal Metric\n");

        assert_eq!(schema.len(), 1);
        assert_eq!(schema.metrics()[0].name, "Real Metric");
    }

    #[test]
    fn test_parse_preserves_order_and_duplicates() {
        let schema = MetricSchema::parse("B\nA\nB");

        let names: Vec<_> = schema.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "B"]);
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(MetricSchema::parse("").is_empty());
        assert!(MetricSchema::parse("   \n\n  ").is_empty());
    }

    #[test]
    fn test_strip_parentheticals_multiple_runs() {
        assert_eq!(strip_parentheticals("a (x) b (y) c"), "a  b  c");
        assert_eq!(strip_parentheticals("x(a(b)c)y"), "xc)y");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: parsing is total and never yields empty names
        #[test]
        fn test_parse_total(lines in prop::collection::vec(".*", 0..8)) {
            let text = lines.join("\n");
            let schema = MetricSchema::parse(&text);

            for def in schema.metrics() {
                prop_assert!(!def.name.is_empty());
                prop_assert!(def
                    .key
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
            }
        }
    }
}
