//! Workbook assembly from batch results

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tally_domain::{CellValue, MetricDefinition, MetricSchema, MetricType, RunId};
use tally_extractor::DocumentExtraction;
use tracing::info;

use crate::artifact::{Artifact, ArtifactSummary};
use crate::error::WorkbookError;

/// Name of the data sheet
const DATA_SHEET: &str = "Metrics";

/// Name of the summary sheet
const SUMMARY_SHEET: &str = "Summary";

/// First column header on the data sheet
const LABEL_HEADER: &str = "Document";

/// Rendering of a failed document's cells
const ERROR_MARKER: &str = "Error";

/// Column width clamp, in characters
const MIN_COL_WIDTH: usize = 10;
const MAX_COL_WIDTH: usize = 50;

/// One document's row, with cells aligned to the schema
///
/// Derived deterministically from one extraction result plus the schema;
/// cell N corresponds to metric N.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    /// The document's label, rendered in the first column
    pub label: String,

    /// One normalized cell per schema metric, in schema order
    pub cells: Vec<CellValue>,
}

/// Builds the xlsx artifact for one batch
///
/// The data sheet gets one row per extraction result in batch order;
/// number- and percentage-typed columns carry numeric formats that apply
/// only to cells that normalized to actual numbers.
pub struct WorkbookBuilder<'a> {
    schema: &'a MetricSchema,
    results: &'a [DocumentExtraction],
}

impl<'a> WorkbookBuilder<'a> {
    /// Create a builder over one batch's schema and results
    pub fn new(schema: &'a MetricSchema, results: &'a [DocumentExtraction]) -> Self {
        Self { schema, results }
    }

    /// The data sheet's header row: `Document` plus the metric names
    pub fn header(&self) -> Vec<String> {
        std::iter::once(LABEL_HEADER.to_string())
            .chain(self.schema.iter().map(|def| def.name.clone()))
            .collect()
    }

    /// Resolve every result into a row aligned to the schema
    pub fn rows(&self) -> Vec<NormalizedRow> {
        self.results
            .iter()
            .map(|result| NormalizedRow {
                label: result.label.clone(),
                cells: self
                    .schema
                    .iter()
                    .map(|def| resolve_cell(result, def))
                    .collect(),
            })
            .collect()
    }

    /// Write the artifact under `output_dir`, keyed by the run id
    ///
    /// Creates the directory if absent. The file is named
    /// `tally_{run_id}.xlsx`.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or the
    /// workbook cannot be serialized to disk.
    pub fn write(&self, run_id: RunId, output_dir: &Path) -> Result<Artifact, WorkbookError> {
        std::fs::create_dir_all(output_dir)?;

        let file_name = format!("tally_{}.xlsx", run_id);
        let path = output_dir.join(&file_name);
        let summary = ArtifactSummary::tally(self.results);

        let mut workbook = Workbook::new();

        let data = workbook.add_worksheet();
        data.set_name(DATA_SHEET)?;
        self.write_data_sheet(data)?;

        let summary_sheet = workbook.add_worksheet();
        summary_sheet.set_name(SUMMARY_SHEET)?;
        self.write_summary_sheet(summary_sheet, &summary)?;

        workbook.save(&path)?;
        info!(
            "Workbook written to {} ({} rows, {} columns)",
            path.display(),
            self.results.len(),
            self.schema.len() + 1
        );

        Ok(Artifact {
            path,
            file_name,
            summary,
        })
    }

    fn write_data_sheet(&self, sheet: &mut Worksheet) -> Result<(), WorkbookError> {
        let bold = Format::new().set_bold();
        let number_format = Format::new().set_num_format("#,##0");
        let percent_format = Format::new().set_num_format("0.00%");

        let header = self.header();
        let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
        for (col, title) in header.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, title.as_str(), &bold)?;
        }

        for (r, row) in self.rows().into_iter().enumerate() {
            let row_num = (r + 1) as u32;
            widths[0] = widths[0].max(row.label.chars().count());
            sheet.write_string(row_num, 0, row.label.as_str())?;

            for (c, (cell, def)) in row.cells.iter().zip(self.schema.iter()).enumerate() {
                let col = (c + 1) as u16;
                widths[c + 1] = widths[c + 1].max(cell.render().chars().count());

                match cell {
                    CellValue::Empty => {}
                    CellValue::Error => {
                        sheet.write_string(row_num, col, ERROR_MARKER)?;
                    }
                    CellValue::Text(text) => {
                        sheet.write_string(row_num, col, text.as_str())?;
                    }
                    CellValue::Number(n) => match def.metric_type {
                        MetricType::Number => {
                            sheet.write_number_with_format(row_num, col, *n, &number_format)?;
                        }
                        MetricType::Percentage => {
                            sheet.write_number_with_format(row_num, col, *n, &percent_format)?;
                        }
                        MetricType::Text | MetricType::Date => {
                            sheet.write_number(row_num, col, *n)?;
                        }
                    },
                }
            }
        }

        for (col, longest) in widths.iter().enumerate() {
            sheet.set_column_width(col as u16, column_width(*longest))?;
        }

        Ok(())
    }

    fn write_summary_sheet(
        &self,
        sheet: &mut Worksheet,
        summary: &ArtifactSummary,
    ) -> Result<(), WorkbookError> {
        let bold = Format::new().set_bold();

        sheet.write_string_with_format(0, 0, "Batch Extraction Summary", &bold)?;

        sheet.write_string(2, 0, "Generated:")?;
        sheet.write_string(
            2,
            1,
            summary
                .generated_at
                .format("%m/%d/%Y %I:%M:%S %p")
                .to_string(),
        )?;
        sheet.write_string(3, 0, "Total Documents:")?;
        sheet.write_number(3, 1, summary.total_documents as f64)?;
        sheet.write_string(4, 0, "Successful:")?;
        sheet.write_number(4, 1, summary.succeeded as f64)?;
        sheet.write_string(5, 0, "Failed:")?;
        sheet.write_number(5, 1, summary.failed as f64)?;

        sheet.write_string(7, 0, "Metrics Extracted:")?;
        for (i, def) in self.schema.iter().enumerate() {
            sheet.write_string(
                (8 + i) as u32,
                0,
                format!("- {} ({})", def.name, def.metric_type),
            )?;
        }

        sheet.set_column_width(0, 24.0)?;

        Ok(())
    }
}

/// Resolve one cell: named lookup, then the error/empty markers
///
/// Lookup is exact-name first, case-insensitive second. A miss on a
/// failed document is an error marker; a miss on a successful one is an
/// ordinary empty cell.
fn resolve_cell(result: &DocumentExtraction, def: &MetricDefinition) -> CellValue {
    match result.lookup(&def.name) {
        Some(raw) => CellValue::normalize(raw, def.metric_type),
        None if result.is_failure() => CellValue::Error,
        None => CellValue::Empty,
    }
}

/// Width for a column whose longest rendered value is `longest` chars
fn column_width(longest: usize) -> f64 {
    (longest + 2).clamp(MIN_COL_WIDTH, MAX_COL_WIDTH) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};

    fn values(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn two_metric_schema() -> MetricSchema {
        MetricSchema::parse("Company Name: text\nTransaction Value: number")
    }

    #[test]
    fn test_header_is_label_plus_schema() {
        let schema = two_metric_schema();
        let builder = WorkbookBuilder::new(&schema, &[]);

        let header = builder.header();
        assert_eq!(header.len(), schema.len() + 1);
        assert_eq!(header[0], "Document");
        assert_eq!(header[1], "Company Name");
        assert_eq!(header[2], "Transaction Value");
    }

    #[test]
    fn test_one_row_per_result_in_order() {
        let schema = two_metric_schema();
        let results = vec![
            DocumentExtraction::success("b.pdf", Map::new()),
            DocumentExtraction::failure("a.pdf", "down"),
            DocumentExtraction::success("c.pdf", Map::new()),
        ];
        let builder = WorkbookBuilder::new(&schema, &results);

        let rows = builder.rows();
        assert_eq!(rows.len(), results.len());
        let labels: Vec<_> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["b.pdf", "a.pdf", "c.pdf"]);
        for row in &rows {
            assert_eq!(row.cells.len(), schema.len());
        }
    }

    #[test]
    fn test_failed_row_renders_error_markers() {
        let schema = two_metric_schema();
        let results = vec![
            DocumentExtraction::success(
                "doc1.pdf",
                values(&[
                    ("Company Name", json!("Acme")),
                    ("Transaction Value", json!("$5,000,000")),
                ]),
            ),
            DocumentExtraction::failure("doc2.pdf", "backend outage"),
        ];
        let builder = WorkbookBuilder::new(&schema, &results);

        let rows = builder.rows();
        assert_eq!(rows[0].label, "doc1.pdf");
        assert_eq!(rows[0].cells[0], CellValue::Text("Acme".to_string()));
        assert_eq!(rows[0].cells[1], CellValue::Number(5_000_000.0));

        assert_eq!(rows[1].label, "doc2.pdf");
        assert_eq!(rows[1].cells, vec![CellValue::Error, CellValue::Error]);
    }

    #[test]
    fn test_missing_metric_on_success_is_empty_not_error() {
        let schema = two_metric_schema();
        let results = vec![DocumentExtraction::success(
            "doc1.pdf",
            values(&[("Company Name", json!("Acme"))]),
        )];
        let builder = WorkbookBuilder::new(&schema, &results);

        let rows = builder.rows();
        assert_eq!(rows[0].cells[1], CellValue::Empty);
    }

    #[test]
    fn test_lookup_falls_back_to_case_insensitive() {
        let schema = two_metric_schema();
        let results = vec![DocumentExtraction::success(
            "doc1.pdf",
            values(&[("company name", json!("Acme"))]),
        )];
        let builder = WorkbookBuilder::new(&schema, &results);

        let rows = builder.rows();
        assert_eq!(rows[0].cells[0], CellValue::Text("Acme".to_string()));
    }

    #[test]
    fn test_column_width_clamps() {
        assert_eq!(column_width(0), 10.0);
        assert_eq!(column_width(8), 10.0);
        assert_eq!(column_width(20), 22.0);
        assert_eq!(column_width(200), 50.0);
    }

    #[test]
    fn test_write_produces_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let schema = two_metric_schema();
        let results = vec![
            DocumentExtraction::success(
                "doc1.pdf",
                values(&[
                    ("Company Name", json!("Acme")),
                    ("Transaction Value", json!(5_000_000)),
                ]),
            ),
            DocumentExtraction::failure("doc2.pdf", "backend outage"),
        ];

        let run_id = RunId::new();
        let artifact = WorkbookBuilder::new(&schema, &results)
            .write(run_id, dir.path())
            .unwrap();

        assert_eq!(artifact.file_name, format!("tally_{}.xlsx", run_id));
        assert!(artifact.path.exists());
        assert!(std::fs::metadata(&artifact.path).unwrap().len() > 0);
        assert_eq!(artifact.summary.total_documents, 2);
        assert_eq!(artifact.summary.succeeded, 1);
        assert_eq!(artifact.summary.failed, 1);
    }

    #[test]
    fn test_write_creates_missing_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("outputs").join("deep");
        let schema = two_metric_schema();
        let results = vec![DocumentExtraction::success("doc1.pdf", Map::new())];

        let artifact = WorkbookBuilder::new(&schema, &results)
            .write(RunId::new(), &nested)
            .unwrap();

        assert!(artifact.path.starts_with(&nested));
        assert!(artifact.path.exists());
    }

    #[test]
    fn test_write_empty_schema_still_has_label_column() {
        let dir = tempfile::tempdir().unwrap();
        let schema = MetricSchema::parse("");
        let results = vec![DocumentExtraction::success("doc1.pdf", Map::new())];
        let builder = WorkbookBuilder::new(&schema, &results);

        assert_eq!(builder.header(), vec!["Document".to_string()]);
        let artifact = builder.write(RunId::new(), dir.path()).unwrap();
        assert!(artifact.path.exists());
    }
}
