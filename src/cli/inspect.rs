//! Inspect single method names and type signatures

use std::path::Path;

use serde::Serialize;

use super::CliError;
use crate::{
    ast::{Query, Token},
    config::Manifest,
    lexer::Lexer,
    parser::{ParseError, parse_method_name},
    types::{TypeDescriptor, TypeRef, TypeResolver},
};

/// Tokens and AST of one method name
#[derive(Debug, Clone, Serialize)]
pub struct NameReport {
    pub name: String,
    pub tokens: Vec<Token>,
    pub query: Query,
}

pub fn parse_name(name: &str) -> Result<NameReport, CliError> {
    let query = parse_method_name(name)?;
    let tokens = Lexer::new(name).tokenize().map_err(ParseError::from)?;
    Ok(NameReport {
        name: name.to_string(),
        tokens,
        query,
    })
}

/// Resolves `signature` against the types of a manifest, as seen from the
/// manifest's mapper.
pub fn resolve_type(manifest: &Path, signature: &str) -> Result<TypeDescriptor, CliError> {
    let manifest = Manifest::from_path(manifest)?;
    let ty = TypeRef::parse(signature)?;
    let types = manifest.type_table();
    let naming = manifest.config.naming;
    let resolver = TypeResolver::new(&types, &naming, manifest.config.resolver_config());
    Ok(resolver.resolve(&TypeRef::simple(&manifest.mapper), &ty)?)
}
