//! Output formatting for the CLI.

use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};
use tally_domain::MetricSchema;
use tally_service::BatchReceipt;

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Format a receipt's per-document outcomes as a table.
    pub fn receipt_table(&self, receipt: &BatchReceipt) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Document", "Status", "Detail"]);

        for outcome in &receipt.outcomes {
            let status = if outcome.ok { "OK" } else { "Failed" };
            let detail = outcome.error.as_deref().unwrap_or("-");
            builder.push_record([outcome.label.as_str(), status, detail]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format a parsed metric schema as a table.
    pub fn schema_table(&self, schema: &MetricSchema) -> String {
        if schema.is_empty() {
            return self.colorize("No metrics found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Metric", "Type", "Key"]);

        for def in schema.iter() {
            builder.push_record([
                def.name.as_str(),
                def.metric_type.as_str(),
                def.key.as_str(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_service::DocumentOutcome;

    fn sample_receipt() -> BatchReceipt {
        BatchReceipt {
            run_id: "0190a8b2-5c4e-7000-8000-000000000000".to_string(),
            total_documents: 2,
            succeeded: 1,
            failed: 1,
            file_name: "tally_x.xlsx".to_string(),
            path: "outputs/tally_x.xlsx".into(),
            outcomes: vec![
                DocumentOutcome {
                    label: "acme.pdf".to_string(),
                    ok: true,
                    error: None,
                },
                DocumentOutcome {
                    label: "broken.pdf".to_string(),
                    ok: false,
                    error: Some("simulated outage".to_string()),
                },
            ],
        }
    }

    #[test]
    fn test_receipt_table() {
        let formatter = Formatter::new(false);
        let output = formatter.receipt_table(&sample_receipt());

        assert!(output.contains("Document"));
        assert!(output.contains("acme.pdf"));
        assert!(output.contains("OK"));
        assert!(output.contains("Failed"));
        assert!(output.contains("simulated outage"));
    }

    #[test]
    fn test_schema_table() {
        let formatter = Formatter::new(false);
        let schema = MetricSchema::parse("Contract Value: number\nVendor");
        let output = formatter.schema_table(&schema);

        assert!(output.contains("Contract Value"));
        assert!(output.contains("number"));
        assert!(output.contains("contract_value"));
        assert!(output.contains("Vendor"));
    }

    #[test]
    fn test_empty_schema_table() {
        let formatter = Formatter::new(false);
        let output = formatter.schema_table(&MetricSchema::parse(""));

        assert!(output.contains("No metrics found"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(false);
        assert_eq!(formatter.success("done"), "✓ done");
        assert_eq!(formatter.error("broke"), "✗ broke");
        assert_eq!(formatter.info("note"), "ℹ note");
        assert_eq!(formatter.warning("careful"), "⚠ careful");
    }
}
