//! Instruction engineering for metric extraction

use serde_json::{json, Map, Value};
use tally_domain::{MetricSchema, MetricType};

/// Builds the extraction instruction sent alongside each document
///
/// The instruction echoes the user's metric lines verbatim (bullets
/// stripped), states the value conventions, and shows an example reply
/// object keyed by the exact metric names.
pub struct InstructionBuilder {
    schema: MetricSchema,
    spec_text: String,
}

impl InstructionBuilder {
    /// Create a builder for one batch's schema and raw specification text
    pub fn new(schema: &MetricSchema, spec_text: &str) -> Self {
        Self {
            schema: schema.clone(),
            spec_text: spec_text.to_string(),
        }
    }

    /// Build the complete extraction instruction
    pub fn build(&self) -> String {
        let mut instruction = String::new();

        // 1. Task statement
        instruction.push_str(EXTRACTION_INSTRUCTIONS);
        instruction.push_str("\n\n");

        // 2. The user's metric lines, cleaned of bullets
        instruction.push_str("The metrics to extract from this document:\n");
        instruction.push_str(&self.cleaned_metric_lines());
        instruction.push_str("\n\n");

        // 3. Value conventions
        instruction.push_str(VALUE_CONVENTIONS);
        instruction.push_str("\n\n");

        // 4. Output format with a schema-derived example
        instruction.push_str(
            "Return your response as a single JSON object whose keys match the metric names \
             EXACTLY as listed above (without any leading hyphens or bullets).\n\n",
        );
        instruction.push_str("Example response format:\n");
        instruction.push_str(&self.example_object());

        instruction
    }

    /// The raw specification lines, trimmed and stripped of bullet markers
    fn cleaned_metric_lines(&self) -> String {
        self.spec_text
            .lines()
            .map(|line| {
                let line = line.trim();
                line.strip_prefix(['-', '•', '*'])
                    .map(str::trim_start)
                    .unwrap_or(line)
            })
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// An example reply object with one type-appropriate sample per metric
    fn example_object(&self) -> String {
        let mut map = Map::new();
        for def in self.schema.iter() {
            let sample = match def.metric_type {
                MetricType::Text => json!("Example text"),
                MetricType::Number => json!(5000000),
                MetricType::Date => json!("12/31/2023"),
                MetricType::Percentage => json!(0.15),
            };
            map.insert(def.name.clone(), sample);
        }

        serde_json::to_string_pretty(&Value::Object(map)).unwrap_or_else(|_| "{}".to_string())
    }
}

const EXTRACTION_INSTRUCTIONS: &str = "\
You are analyzing a document to extract specific metrics.";

const VALUE_CONVENTIONS: &str = r#"For each metric:
- If found, provide the exact value
- If not found, return "Not found" or "N/A"
- For numbers, extract numeric values only (no currency symbols or commas)
- For dates, use MM/DD/YYYY format
- For percentages, return as decimal (e.g., 0.15 for 15%)"#;
