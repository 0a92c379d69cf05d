//! Merges a parsed method name with the resolved types of its signature.

use serde::Serialize;
use thiserror::Error;

use crate::{
    ast::{OperationKind, Query},
    naming::decapitalize,
    types::{
        BeanField, MethodDecl, ResolveError, TypeDescriptor, TypeRef, TypeResolver, TypeSystem,
    },
};

/// A bound method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
    /// Exposed name: the alias if one is declared, else the identifier
    pub name: String,
    /// Column name
    pub column: String,
    pub is_iterable: bool,
    pub is_bean: bool,
    /// Fields of the innermost bean, empty for scalars
    pub bean_fields: Vec<BeanField>,
}

impl Param {
    pub fn new(ty: TypeDescriptor, name: impl Into<String>, column: impl Into<String>) -> Self {
        Param {
            is_iterable: ty.is_iterable(),
            is_bean: ty.is_bean(),
            bean_fields: ty.leaf().fields().to_vec(),
            name: name.into(),
            column: column.into(),
            ty,
        }
    }
}

/// The bound return value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Return {
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
    pub is_iterable: bool,
    pub is_bean: bool,
    pub bean_fields: Vec<BeanField>,
}

impl Return {
    pub fn new(ty: TypeDescriptor) -> Self {
        Return {
            is_iterable: ty.is_iterable(),
            is_bean: ty.is_bean(),
            bean_fields: ty.leaf().fields().to_vec(),
            ty,
        }
    }

    pub fn is_void(&self) -> bool {
        self.ty == TypeDescriptor::Void
    }
}

/// Everything a translator needs to know about one method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodInfo {
    pub name: String,
    pub operation: OperationKind,
    pub params: Vec<Param>,
    #[serde(rename = "return")]
    pub ret: Return,
    /// Declared names of parameters left out because their type did not resolve
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dropped: Vec<String>,
}

impl MethodInfo {
    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("return type of `{method}` is not supported: {source}")]
    UnsupportedReturn {
        method: String,
        #[source]
        source: ResolveError,
    },
}

/// Binds queries to method signatures through a [`TypeResolver`].
pub struct MethodBinder<'a, T: TypeSystem + ?Sized> {
    resolver: TypeResolver<'a, T>,
}

impl<'a, T: TypeSystem + ?Sized> MethodBinder<'a, T> {
    pub fn new(resolver: TypeResolver<'a, T>) -> Self {
        MethodBinder { resolver }
    }

    pub fn resolver(&self) -> &TypeResolver<'a, T> {
        &self.resolver
    }

    /// Builds the [`MethodInfo`] of `method` as seen from the mapper type `owner`.
    ///
    /// A parameter whose type cannot be resolved is left out of the bound
    /// list and recorded in [`MethodInfo::dropped`]; an unresolvable return
    /// type rejects the whole method.
    pub fn bind(
        &self,
        owner: &TypeRef,
        query: &Query,
        method: &MethodDecl,
    ) -> Result<MethodInfo, BindError> {
        let ret = self
            .resolver
            .resolve(owner, &method.returns)
            .map_err(|source| BindError::UnsupportedReturn {
                method: method.name.clone(),
                source,
            })?;

        let naming = self.resolver.naming();
        let mut params = Vec::with_capacity(method.params.len());
        let mut dropped = Vec::new();
        for decl in &method.params {
            let ty = match self.resolver.resolve(owner, &decl.ty) {
                Ok(ty) => ty,
                Err(e) => {
                    log::warn!(
                        "{}: dropping parameter `{}` of type {}: {}",
                        method.name,
                        decl.name,
                        decl.ty,
                        e
                    );
                    dropped.push(decl.name.clone());
                    continue;
                }
            };
            let name = decl.alias.clone().unwrap_or_else(|| decl.name.clone());
            let column = decl
                .column
                .clone()
                .unwrap_or_else(|| naming.convert(&decapitalize(&name)));
            params.push(Param::new(ty, name, column));
        }

        Ok(MethodInfo {
            name: method.name.clone(),
            operation: query.operation,
            params,
            ret: Return::new(ret),
            dropped,
        })
    }
}
