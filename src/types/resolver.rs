use std::{
    collections::HashSet,
    sync::LazyLock,
};

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::{
    naming::{NamingConverter, decapitalize},
    types::{FieldDecl, TypeRef, TypeSystem},
};

/// Deepest array/iterable/generic nesting that still resolves.
pub const MAX_DEPTH: usize = 2;

/// Namespaces whose types are treated as opaque scalar leaves.
pub const DEFAULT_OPAQUE_PREFIXES: &[&str] = &[
    "java.applet",
    "java.awt",
    "java.beans",
    "java.io",
    "java.lang",
    "java.math",
    "java.net",
    "java.nio",
    "java.rmi",
    "java.security",
    "java.sql",
    "java.text",
    "java.time",
    "java.util",
];

pub const DEFAULT_ITERABLE_TYPE: &str = "java.lang.Iterable";

static GETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^get(.+)$").expect("getter pattern is valid"));
static SETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^set(.+)$").expect("setter pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TypeKind {
    Scalar,
    Iterable,
    Bean,
    Void,
}

/// Bean property mapped to a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BeanField {
    /// Field name in the bean
    pub name: String,
    /// Column name
    pub column: String,
    pub generated_key: bool,
}

/// Classification of a resolved type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeDescriptor {
    /// Primitive or opaque platform type
    Scalar { name: String },

    Void,

    /// Array or iterable, wrapping the descriptor of its element type
    Iterable {
        name: String,
        element: Box<TypeDescriptor>,
    },

    /// Introspected type with its readable and writable fields
    Bean { name: String, fields: Vec<BeanField> },
}

impl TypeDescriptor {
    pub fn kind(&self) -> TypeKind {
        match self {
            TypeDescriptor::Scalar { .. } => TypeKind::Scalar,
            TypeDescriptor::Void => TypeKind::Void,
            TypeDescriptor::Iterable { .. } => TypeKind::Iterable,
            TypeDescriptor::Bean { .. } => TypeKind::Bean,
        }
    }

    pub fn qualified_name(&self) -> &str {
        match self {
            TypeDescriptor::Scalar { name }
            | TypeDescriptor::Iterable { name, .. }
            | TypeDescriptor::Bean { name, .. } => name,
            TypeDescriptor::Void => "void",
        }
    }

    pub fn element(&self) -> Option<&TypeDescriptor> {
        match self {
            TypeDescriptor::Iterable { element, .. } => Some(element),
            _ => None,
        }
    }

    pub fn fields(&self) -> &[BeanField] {
        match self {
            TypeDescriptor::Bean { fields, .. } => fields,
            _ => &[],
        }
    }

    /// Innermost element descriptor
    pub fn leaf(&self) -> &TypeDescriptor {
        match self {
            TypeDescriptor::Iterable { element, .. } => element.leaf(),
            other => other,
        }
    }

    pub fn is_iterable(&self) -> bool {
        self.kind() == TypeKind::Iterable
    }

    /// Whether the innermost element is a bean
    pub fn is_bean(&self) -> bool {
        self.leaf().kind() == TypeKind::Bean
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("`{ty}` is nested deeper than {max} levels")]
    DepthExceeded { ty: String, max: usize },

    #[error("iterable type `{name}` has no type argument")]
    RawIterable { name: String },

    #[error("unknown type `{name}`")]
    UnknownType { name: String },

    #[error("type variable `{name}` of `{owner}` cannot be resolved")]
    UnresolvedVariable { name: String, owner: String },

    #[error("type variable `{name}` of `{owner}` resolves back to itself")]
    CyclicVariable { name: String, owner: String },
}

/// Resolver settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Declared types under these prefixes resolve to opaque scalars
    pub opaque_prefixes: Vec<String>,
    /// Type whose implementors resolve to iterables
    pub iterable_type: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            opaque_prefixes: DEFAULT_OPAQUE_PREFIXES.iter().map(|p| p.to_string()).collect(),
            iterable_type: DEFAULT_ITERABLE_TYPE.to_string(),
        }
    }
}

/// Resolves type references into [`TypeDescriptor`]s.
pub struct TypeResolver<'a, T: TypeSystem + ?Sized> {
    types: &'a T,
    naming: &'a dyn NamingConverter,
    config: ResolverConfig,
}

impl<'a, T: TypeSystem + ?Sized> TypeResolver<'a, T> {
    pub fn new(types: &'a T, naming: &'a dyn NamingConverter, config: ResolverConfig) -> Self {
        TypeResolver {
            types,
            naming,
            config,
        }
    }

    pub fn types(&self) -> &'a T {
        self.types
    }

    pub fn naming(&self) -> &'a dyn NamingConverter {
        self.naming
    }

    /// Resolves `ty` as it appears in a member of `owner`.
    ///
    /// Type variables are substituted with the arguments `owner` supplies to
    /// the generic supertype that introduces them.
    pub fn resolve(&self, owner: &TypeRef, ty: &TypeRef) -> Result<TypeDescriptor, ResolveError> {
        self.resolve_at(owner, ty, 0, &mut HashSet::new())
    }

    fn resolve_at(
        &self,
        owner: &TypeRef,
        ty: &TypeRef,
        depth: usize,
        substituted: &mut HashSet<(String, String)>,
    ) -> Result<TypeDescriptor, ResolveError> {
        if depth > MAX_DEPTH {
            return Err(ResolveError::DepthExceeded {
                ty: ty.to_string(),
                max: MAX_DEPTH,
            });
        }

        match ty {
            TypeRef::Primitive(name) => Ok(TypeDescriptor::Scalar { name: name.clone() }),
            TypeRef::Void => Ok(TypeDescriptor::Void),
            TypeRef::Array(element) => {
                let element = self.resolve_at(owner, element, depth + 1, substituted)?;
                Ok(TypeDescriptor::Iterable {
                    name: ty.to_string(),
                    element: Box::new(element),
                })
            }
            TypeRef::Declared { name, args } => {
                if self.is_iterable(ty) {
                    let Some(arg) = args.first() else {
                        return Err(ResolveError::RawIterable { name: name.clone() });
                    };
                    let element = self.resolve_at(owner, arg, depth + 1, substituted)?;
                    Ok(TypeDescriptor::Iterable {
                        name: name.clone(),
                        element: Box::new(element),
                    })
                } else if self.is_opaque(name) {
                    Ok(TypeDescriptor::Scalar { name: name.clone() })
                } else {
                    self.resolve_bean(ty, name)
                }
            }
            TypeRef::Var { name, owner: declaring } => {
                self.resolve_var(owner, name, declaring, depth, substituted)
            }
        }
    }

    fn resolve_var(
        &self,
        owner: &TypeRef,
        name: &str,
        declaring: &str,
        depth: usize,
        substituted: &mut HashSet<(String, String)>,
    ) -> Result<TypeDescriptor, ResolveError> {
        if !substituted.insert((declaring.to_string(), name.to_string())) {
            return Err(ResolveError::CyclicVariable {
                name: name.to_string(),
                owner: declaring.to_string(),
            });
        }
        let unresolved = || ResolveError::UnresolvedVariable {
            name: name.to_string(),
            owner: declaring.to_string(),
        };

        let index = self
            .types
            .type_parameters(declaring)
            .iter()
            .position(|p| p == name)
            .ok_or_else(unresolved)?;

        let candidates = std::iter::once(owner.clone()).chain(self.types.supertype_closure(owner));
        for sup in candidates {
            if sup.erasure() != Some(declaring) {
                continue;
            }
            if let Some(arg) = sup.args().get(index) {
                log::debug!("type variable {} of {} is {}", name, declaring, arg);
                return self.resolve_at(owner, arg, depth, substituted);
            }
        }
        Err(unresolved())
    }

    fn is_iterable(&self, ty: &TypeRef) -> bool {
        let iterable = self.config.iterable_type.as_str();
        ty.erasure() == Some(iterable)
            || self
                .types
                .supertype_closure(ty)
                .iter()
                .any(|sup| sup.erasure() == Some(iterable))
    }

    fn is_opaque(&self, name: &str) -> bool {
        self.config
            .opaque_prefixes
            .iter()
            .any(|prefix| name.starts_with(prefix.as_str()))
    }

    fn resolve_bean(&self, ty: &TypeRef, name: &str) -> Result<TypeDescriptor, ResolveError> {
        if self.types.declared_members(name).is_none() {
            return Err(ResolveError::UnknownType {
                name: name.to_string(),
            });
        }

        // most general ancestor first, the type itself last
        let mut chain = self.types.supertype_closure(ty);
        chain.reverse();
        chain.push(ty.clone());

        let mut fields: Vec<BeanField> = Vec::new();
        let mut seen = HashSet::new();
        let mut getters = HashSet::new();
        let mut setters = HashSet::new();

        for link in &chain {
            let Some(members) = link.erasure().and_then(|n| self.types.declared_members(n)) else {
                continue;
            };

            for field in members.fields {
                if seen.insert(field.name.as_str()) {
                    fields.push(self.bean_field(field));
                }
            }

            for method in members.methods {
                if let Some(caps) = GETTER.captures(&method.name) {
                    getters.insert(decapitalize(&caps[1]));
                } else if let Some(caps) = SETTER.captures(&method.name) {
                    setters.insert(decapitalize(&caps[1]));
                }
            }
        }

        fields.retain(|field| {
            let stem = decapitalize(&field.name);
            getters.contains(&stem) && setters.contains(&stem)
        });

        Ok(TypeDescriptor::Bean {
            name: name.to_string(),
            fields,
        })
    }

    fn bean_field(&self, field: &FieldDecl) -> BeanField {
        BeanField {
            name: field.name.clone(),
            column: field
                .column
                .clone()
                .unwrap_or_else(|| self.naming.convert(&decapitalize(&field.name))),
            generated_key: field.generated_key,
        }
    }
}
