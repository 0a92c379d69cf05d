//! CLI support for mapgen
//!
//! Provides programmatic access to the mapgen subcommands so they can be
//! embedded in build tooling.

mod docs;
mod generate;
mod inspect;

pub use docs::{DocCategory, get_doc_category, get_docs_overview};
pub use generate::{GenerateOptions, execute_generate};
pub use inspect::{NameReport, parse_name, resolve_type};

use std::io;

use thiserror::Error;

use crate::{
    config::ConfigError,
    generator::GenerateError,
    output::OutputError,
    parser::ParseError,
    translator::DocumentError,
    types::{ResolveError, SignatureError},
};

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Invalid type signature: {0}")]
    Signature(#[from] SignatureError),

    #[error("Resolution error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Manifest error: {0}")]
    Config(#[from] ConfigError),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Pass a method name or pipe names to stdin.")]
    NoInput,

    #[error("{0} method(s) produced no statement")]
    Incomplete(usize),

    #[error("Unknown category: '{0}'\nRun 'mapgen docs' to see available categories.")]
    UnknownCategory(String),
}
