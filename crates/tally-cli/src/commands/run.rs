//! Run command implementation.

use std::fs;
use std::path::{Path, PathBuf};

use tally_domain::{Document, DocumentSource};
use tally_extractor::ExtractorConfig;
use tally_llm::AnthropicBackend;
use tally_registry::RegistryConfig;
use tally_service::{BatchReceipt, ServiceConfig, TallyService};
use tracing::debug;

use crate::cli::RunArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;

/// Execute the run command.
pub async fn execute_run(args: RunArgs, formatter: &Formatter, json: bool) -> Result<()> {
    let spec_text = fs::read_to_string(&args.metrics)?;
    let sources = load_documents(&args.documents)?;
    let backend = build_backend(&args)?;

    let config = ServiceConfig {
        extractor: ExtractorConfig::default(),
        registry: RegistryConfig::default(),
        output_dir: args.out.clone(),
    };
    let service = TallyService::new(backend, config);

    let receipt = service.run_batch_extraction(sources, &spec_text).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&receipt)?);
        return Ok(());
    }

    println!("{}", formatter.receipt_table(&receipt));
    println!();
    println!("{}", status_line(&receipt, formatter));
    println!(
        "{}",
        formatter.info(&format!("Artifact: {}", receipt.path.display()))
    );

    Ok(())
}

/// Pick the status line for a finished batch by its outcome mix
fn status_line(receipt: &BatchReceipt, formatter: &Formatter) -> String {
    if receipt.failed == 0 {
        formatter.success(&format!("{} document(s) extracted", receipt.succeeded))
    } else if receipt.succeeded == 0 {
        formatter.error(&format!("All {} document(s) failed", receipt.failed))
    } else {
        formatter.warning(&format!(
            "{} of {} document(s) extracted",
            receipt.succeeded, receipt.total_documents
        ))
    }
}

/// Load command-line document paths as in-memory sources
///
/// User files are only ever read; nothing here moves or deletes them.
fn load_documents(paths: &[PathBuf]) -> Result<Vec<DocumentSource>> {
    paths
        .iter()
        .map(|path| {
            if !is_pdf(path) {
                return Err(CliError::InvalidInput(format!(
                    "Only PDF documents are supported: {}",
                    path.display()
                )));
            }

            let bytes = fs::read(path)?;
            debug!("Loaded {} ({} bytes)", path.display(), bytes.len());

            Ok(DocumentSource::Memory(Document::pdf(
                document_label(path),
                bytes,
            )))
        })
        .collect()
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// A document's label is its bare file name
fn document_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn build_backend(args: &RunArgs) -> Result<AnthropicBackend> {
    let backend = match &args.api_key {
        Some(key) => AnthropicBackend::new(key.as_str(), args.model.as_str())?,
        None => AnthropicBackend::from_env(args.model.as_str())?,
    };

    Ok(match &args.endpoint {
        Some(endpoint) => backend.with_endpoint(endpoint.as_str()),
        None => backend,
    })
}
