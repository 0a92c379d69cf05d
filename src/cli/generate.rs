//! Derive the statements of a mapper manifest

use std::path::PathBuf;

use super::CliError;
use crate::{
    config::Manifest,
    generator::generate,
    output::{self, OutputFormat},
    translator::StatementDocument,
};

/// Options for the generate command
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Mapper manifest (YAML or JSON)
    pub manifest: PathBuf,
    /// Existing statement document to extend
    pub existing: Option<PathBuf>,
    pub format: OutputFormat,
    /// Pretty-print JSON output
    pub pretty: bool,
    /// Fail when any method produced no statement
    pub strict: bool,
}

/// Runs one derivation and renders the resulting document.
pub fn execute_generate(options: &GenerateOptions) -> Result<String, CliError> {
    let manifest = Manifest::from_path(&options.manifest)?;
    let existing = options
        .existing
        .as_ref()
        .map(StatementDocument::from_path)
        .transpose()?;

    let report = generate(&manifest, existing)?;
    for skipped in &report.skipped {
        eprintln!("skipped {}: {}", skipped.name, skipped.reason);
    }
    for failed in &report.failed {
        eprintln!("failed {}: {}", failed.name, failed.error);
    }
    if options.strict && !report.is_complete() {
        return Err(CliError::Incomplete(report.skipped.len() + report.failed.len()));
    }

    Ok(output::render(&report.document, options.format, options.pretty)?)
}
