//! # Type model and resolution
//!
//! Parameters and return values of a mapper method are classified by walking
//! the inheritance and generic closure of their declared types.
//!
//! - **[signature]** - [`TypeRef`], type references and their textual form
//! - **[decl]** - class/interface declarations with fields and methods
//! - **[table]** - [`TypeTable`], an in-memory [`TypeSystem`]
//! - **[resolver]** - [`TypeResolver`], type reference → [`TypeDescriptor`]
//!
//! The [`TypeSystem`] trait is the only capability the resolver needs. Any
//! source of type information (a precomputed table, a compiler front end)
//! can back it.
use std::collections::HashSet;

pub mod decl;
pub mod resolver;
pub mod signature;
pub mod table;

pub use decl::{DeclKind, FieldDecl, MethodDecl, ParamDecl, TypeDecl};
pub use resolver::{BeanField, ResolveError, ResolverConfig, TypeDescriptor, TypeKind, TypeResolver};
pub use signature::{SignatureError, TypeRef};
pub use table::TypeTable;

/// Declared members of one type.
#[derive(Debug, Clone, Copy)]
pub struct Members<'a> {
    pub fields: &'a [FieldDecl],
    pub methods: &'a [MethodDecl],
}

/// Type introspection capability.
pub trait TypeSystem {
    /// Direct supertypes of `ty` (superclass first, then interfaces), with the
    /// type arguments of `ty` substituted into them.
    fn supertypes(&self, ty: &TypeRef) -> Vec<TypeRef>;

    /// Members declared by the named type itself; `None` for unknown types.
    fn declared_members(&self, name: &str) -> Option<Members<'_>>;

    /// Type parameter names of the named generic declaration.
    fn type_parameters(&self, name: &str) -> &[String];

    /// Every transitive supertype of `ty`, depth-first, each erased type once.
    fn supertype_closure(&self, ty: &TypeRef) -> Vec<TypeRef> {
        let mut seen: HashSet<String> = ty.erasure().map(str::to_string).into_iter().collect();
        let mut closure = Vec::new();
        walk_supertypes(self, ty, &mut seen, &mut closure);
        closure
    }
}

fn walk_supertypes<T: TypeSystem + ?Sized>(
    types: &T,
    ty: &TypeRef,
    seen: &mut HashSet<String>,
    closure: &mut Vec<TypeRef>,
) {
    for sup in types.supertypes(ty) {
        let Some(name) = sup.erasure() else { continue };
        if seen.insert(name.to_string()) {
            closure.push(sup.clone());
            walk_supertypes(types, &sup, seen, closure);
        }
    }
}
