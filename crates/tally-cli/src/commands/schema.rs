//! Schema command implementation.

use std::fs;

use tally_domain::MetricSchema;

use crate::cli::SchemaArgs;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the schema command: parse a metric specification and show
/// the columns a run would produce, without calling the backend.
pub fn execute_schema(args: SchemaArgs, formatter: &Formatter, json: bool) -> Result<()> {
    let spec_text = fs::read_to_string(&args.metrics)?;
    let schema = MetricSchema::parse(&spec_text);

    if json {
        println!("{}", serde_json::to_string_pretty(&schema)?);
        return Ok(());
    }

    println!("{}", formatter.schema_table(&schema));
    if !schema.is_empty() {
        println!();
        println!(
            "{}",
            formatter.info(&format!("{} metric(s)", schema.len()))
        );
    }

    Ok(())
}
