//! One derivation run over a mapper.

use thiserror::Error;

use crate::{
    binder::MethodBinder,
    config::{ConfigError, Manifest},
    mapper::{SkippedMethod, derive_methods},
    translator::{
        DocumentError, IdSnapshot, SqlTranslator, StatementDocument, TranslateError,
        TranslateOutcome,
    },
    types::{TypeResolver, TypeSystem},
};

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// A derived method the translator could not build a statement for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedMethod {
    pub name: String,
    pub error: TranslateError,
}

/// Result of a run: the updated document and what happened to each method.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub document: StatementDocument,
    /// Methods whose statement was added, in order
    pub added: Vec<String>,
    /// Methods that already had a statement
    pub existing: Vec<String>,
    pub skipped: Vec<SkippedMethod>,
    pub failed: Vec<FailedMethod>,
}

impl GenerationReport {
    fn new(document: StatementDocument) -> Self {
        GenerationReport {
            document,
            added: Vec::new(),
            existing: Vec::new(),
            skipped: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// Whether every candidate method ended up with a statement
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty() && self.failed.is_empty()
    }
}

/// Derives the statements of the manifest's mapper into `existing`, or into
/// a fresh document when there is none.
///
/// Per-method problems are reported, never raised; only an unknown mapper or
/// a document of another namespace fail the run.
pub fn generate(
    manifest: &Manifest,
    existing: Option<StatementDocument>,
) -> Result<GenerationReport, GenerateError> {
    let types = manifest.type_table();
    if types.declared_members(&manifest.mapper).is_none() {
        return Err(ConfigError::UnknownMapper(manifest.mapper.clone()).into());
    }

    let namespace = manifest.namespace();
    let document = match existing {
        Some(document) => {
            document.ensure_namespace(&namespace)?;
            document
        }
        None => StatementDocument::new(&namespace),
    };
    let mut snapshot = IdSnapshot::of(&document);
    let mut report = GenerationReport::new(document);

    let naming = manifest.config.naming;
    let resolver = TypeResolver::new(&types, &naming, manifest.config.resolver_config());
    let binder = MethodBinder::new(resolver);
    let translator = SqlTranslator::new(manifest.table(), naming);

    for derived in derive_methods(&binder, &manifest.mapper) {
        let derived = match derived {
            Ok(derived) => derived,
            Err(skipped) => {
                report.skipped.push(skipped);
                continue;
            }
        };

        let name = derived.info.name.clone();
        match report
            .document
            .apply(&translator, &derived.query, &derived.info, &mut snapshot)
        {
            Ok(TranslateOutcome::Added) => report.added.push(name),
            Ok(TranslateOutcome::AlreadyExists) => report.existing.push(name),
            Err(error) => {
                log::warn!("{}: no statement generated: {}", name, error);
                report.failed.push(FailedMethod { name, error });
            }
        }
    }

    log::info!(
        "{}: {} added, {} already present, {} skipped, {} failed",
        namespace,
        report.added.len(),
        report.existing.len(),
        report.skipped.len(),
        report.failed.len()
    );
    Ok(report)
}
