//! Integration tests for the extraction pipeline

#[cfg(test)]
mod tests {
    use crate::{run_batch, ExtractorConfig, MetricExtractor};
    use serde_json::json;
    use tally_domain::{CellValue, Document, DocumentSource, MetricSchema, MetricType};
    use tally_llm::MockBackend;

    fn source(label: &str) -> DocumentSource {
        DocumentSource::Memory(Document::pdf(label, vec![0x25, 0x50, 0x44, 0x46]))
    }

    #[tokio::test]
    async fn test_full_extraction_flow() {
        let spec = "- Company Name: text\n- Transaction Value: number\n- Success Fee: percent";
        let schema = MetricSchema::parse(spec);
        assert_eq!(schema.len(), 3);

        let mut backend = MockBackend::default();
        backend.add_reply(
            "acme.pdf",
            r#"Here is what I found:
{"Company Name": "Acme Corp", "Transaction Value": "$5,000,000", "Success Fee": "12%"}"#,
        );

        let extractor = MetricExtractor::new(backend, ExtractorConfig::unthrottled());
        let results = run_batch(&extractor, vec![source("acme.pdf")], &schema, spec).await;

        assert_eq!(results.len(), 1);
        let row = &results[0];
        assert!(!row.is_failure());
        assert_eq!(row.values.get("Company Name"), Some(&json!("Acme Corp")));

        // Raw values stay verbatim; normalization happens downstream
        assert_eq!(
            row.values.get("Transaction Value"),
            Some(&json!("$5,000,000"))
        );
        let value = CellValue::normalize(
            row.values.get("Transaction Value").unwrap(),
            MetricType::Number,
        );
        assert_eq!(value, CellValue::Number(5_000_000.0));

        let fee = CellValue::normalize(
            row.values.get("Success Fee").unwrap(),
            MetricType::Percentage,
        );
        assert_eq!(fee, CellValue::Number(0.12));
    }

    #[tokio::test]
    async fn test_batch_with_mixed_outcomes() {
        let spec = "Vendor: text";
        let schema = MetricSchema::parse(spec);

        let mut backend = MockBackend::new(r#"{"Vendor": "Acme"}"#);
        backend.add_error("down.pdf", "simulated outage");
        backend.add_reply("prose.pdf", "I was unable to locate any of these metrics.");

        let sources = vec![source("ok.pdf"), source("down.pdf"), source("prose.pdf")];
        let extractor = MetricExtractor::new(backend, ExtractorConfig::unthrottled());
        let results = run_batch(&extractor, sources, &schema, spec).await;

        assert_eq!(results.len(), 3);
        assert!(!results[0].is_failure());
        assert!(results[1].is_failure());
        assert!(results[2].is_failure());

        // Distinct failure modes surface distinct messages
        assert!(results[1].error.as_deref().unwrap().contains("simulated outage"));
        assert!(results[2].error.as_deref().unwrap().contains("No structured object"));
    }

    #[tokio::test]
    async fn test_partial_values_are_not_failures() {
        let spec = "Vendor: text\nTotal: number";
        let schema = MetricSchema::parse(spec);

        // Backend reports one metric found, one missing
        let backend = MockBackend::new(r#"{"Vendor": "Acme", "Total": "Not found"}"#);
        let extractor = MetricExtractor::new(backend, ExtractorConfig::unthrottled());

        let results = run_batch(&extractor, vec![source("a.pdf")], &schema, spec).await;

        assert!(!results[0].is_failure());
        let total = CellValue::normalize(results[0].values.get("Total").unwrap(), MetricType::Number);
        assert_eq!(total, CellValue::Empty);
    }

    #[tokio::test]
    async fn test_instruction_reaches_backend_with_conventions() {
        let spec = "- Closing Date: date";
        let schema = MetricSchema::parse(spec);

        let backend = MockBackend::new(r#"{"Closing Date": "12/31/2023"}"#);
        let probe = backend.clone();
        let extractor = MetricExtractor::new(backend, ExtractorConfig::unthrottled());

        run_batch(&extractor, vec![source("deal.pdf")], &schema, spec).await;

        assert_eq!(probe.call_count(), 1);
        assert_eq!(probe.calls(), vec!["deal.pdf"]);
    }

    #[tokio::test]
    async fn test_config_round_trip_preserves_throttling() {
        let config = ExtractorConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();

        assert_eq!(parsed.call_delay_ms, 1000);
        assert_eq!(parsed.max_documents, 20);
        assert!(parsed.validate().is_ok());
    }
}
