//! Candidate method collection and per-method derivation for a mapper type.

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

use crate::{
    ast::Query,
    binder::{BindError, MethodBinder, MethodInfo},
    parser::{ParseError, parse_method_name},
    types::{MethodDecl, TypeRef, TypeSystem},
};

const OBJECT_TYPE: &str = "java.lang.Object";

/// A method of the mapper or one of its super-interfaces.
#[derive(Debug, Clone)]
pub struct CandidateMethod<'a> {
    /// Erased name of the type that declares the method
    pub declaring_type: String,
    pub method: &'a MethodDecl,
}

/// Collects the methods of `mapper` that are eligible for derivation.
///
/// Super-interface methods come before the mapper's own, each declaration is
/// listed once, and static, default, native, `Object` and explicitly
/// mapped methods are left out.
pub fn collect_methods<'a, T: TypeSystem + ?Sized>(
    types: &'a T,
    mapper: &str,
) -> Vec<CandidateMethod<'a>> {
    let mut visited = HashSet::new();
    let mut collected = Vec::new();
    collect_from(types, mapper, &mut visited, &mut collected);

    let mut seen = HashSet::new();
    collected
        .into_iter()
        .filter(|c| {
            seen.insert((
                c.declaring_type.clone(),
                c.method.name.as_str(),
                c.method.signature(),
            ))
        })
        .filter(is_derivable)
        .collect()
}

fn collect_from<'a, T: TypeSystem + ?Sized>(
    types: &'a T,
    name: &str,
    visited: &mut HashSet<String>,
    collected: &mut Vec<CandidateMethod<'a>>,
) {
    if !visited.insert(name.to_string()) {
        return;
    }
    let Some(members) = types.declared_members(name) else {
        log::debug!("{} is not a known type, skipping its methods", name);
        return;
    };

    for sup in types.supertypes(&TypeRef::simple(name)) {
        if let Some(sup_name) = sup.erasure() {
            collect_from(types, sup_name, visited, collected);
        }
    }

    collected.extend(members.methods.iter().map(|method| CandidateMethod {
        declaring_type: name.to_string(),
        method,
    }));
}

fn is_derivable(candidate: &CandidateMethod<'_>) -> bool {
    let method = candidate.method;
    let reason = if method.is_static {
        "static"
    } else if method.is_default {
        "default"
    } else if method.is_native {
        "native"
    } else if candidate.declaring_type == OBJECT_TYPE {
        "declared on Object"
    } else if method.statement.is_some() {
        "explicitly mapped"
    } else {
        return true;
    };
    log::debug!("{}: not a candidate ({})", method.name, reason);
    false
}

/// A method whose name and signature were derived into a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedMethod {
    pub query: Query,
    pub info: MethodInfo,
}

/// Why a candidate method produced no query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("not derivable: {0}")]
    NotDerivable(#[from] ParseError),

    #[error("rejected: {0}")]
    Rejected(#[from] BindError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedMethod {
    pub name: String,
    pub reason: SkipReason,
}

/// Parses and binds one candidate method.
pub fn derive_method<T: TypeSystem + ?Sized>(
    binder: &MethodBinder<'_, T>,
    mapper: &TypeRef,
    method: &MethodDecl,
) -> Result<DerivedMethod, SkippedMethod> {
    let skipped = |reason: SkipReason| SkippedMethod {
        name: method.name.clone(),
        reason,
    };

    let query = parse_method_name(&method.name).map_err(|e| skipped(e.into()))?;
    let info = binder
        .bind(mapper, &query, method)
        .map_err(|e| skipped(e.into()))?;
    log::debug!("{}: derived {:?} query", method.name, query.operation);
    Ok(DerivedMethod { query, info })
}

/// Derives every candidate method of `mapper`.
///
/// A failure is confined to the method it occurs in.
pub fn derive_methods<T: TypeSystem + ?Sized>(
    binder: &MethodBinder<'_, T>,
    mapper: &str,
) -> Vec<Result<DerivedMethod, SkippedMethod>> {
    let owner = TypeRef::simple(mapper);
    collect_methods(binder.resolver().types(), mapper)
        .into_iter()
        .map(|candidate| {
            let derived = derive_method(binder, &owner, candidate.method);
            if let Err(skipped) = &derived {
                log::warn!("skipping {}: {}", skipped.name, skipped.reason);
            }
            derived
        })
        .collect()
}
