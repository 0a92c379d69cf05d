use std::collections::HashMap;

use crate::types::{Members, TypeDecl, TypeRef, TypeSystem};

/// Precomputed type hierarchy.
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    decls: HashMap<String, TypeDecl>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table preloaded with the iterable collection types of the Java platform.
    pub fn with_platform_types() -> Self {
        let mut table = TypeTable::new();
        let generic =
            |name: &str, param: &str| TypeRef::declared(name, vec![TypeRef::simple(param)]);

        table.insert(TypeDecl::interface("java.lang.Iterable").type_params(&["T"]));
        for (name, parent) in [
            ("java.util.Collection", "java.lang.Iterable"),
            ("java.util.List", "java.util.Collection"),
            ("java.util.Set", "java.util.Collection"),
            ("java.util.Queue", "java.util.Collection"),
            ("java.util.SortedSet", "java.util.Set"),
            ("java.util.Deque", "java.util.Queue"),
        ] {
            table.insert(
                TypeDecl::interface(name)
                    .type_params(&["E"])
                    .implements(generic(parent, "E")),
            );
        }

        table.insert(
            TypeDecl::class("java.util.ArrayList")
                .type_params(&["E"])
                .implements(generic("java.util.List", "E")),
        );
        table.insert(
            TypeDecl::class("java.util.LinkedList")
                .type_params(&["E"])
                .implements(generic("java.util.List", "E"))
                .implements(generic("java.util.Deque", "E")),
        );
        table.insert(
            TypeDecl::class("java.util.HashSet")
                .type_params(&["E"])
                .implements(generic("java.util.Set", "E")),
        );
        table.insert(
            TypeDecl::class("java.util.LinkedHashSet")
                .type_params(&["E"])
                .extends(generic("java.util.HashSet", "E")),
        );
        table.insert(
            TypeDecl::class("java.util.TreeSet")
                .type_params(&["E"])
                .implements(generic("java.util.SortedSet", "E")),
        );
        table
    }

    /// Adds a declaration, replacing any previous one of the same name.
    pub fn insert(&mut self, decl: TypeDecl) {
        let decl = decl.linked();
        self.decls.insert(decl.name.clone(), decl);
    }

    pub fn get(&self, name: &str) -> Option<&TypeDecl> {
        self.decls.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.decls.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}

impl Extend<TypeDecl> for TypeTable {
    fn extend<I: IntoIterator<Item = TypeDecl>>(&mut self, iter: I) {
        for decl in iter {
            self.insert(decl);
        }
    }
}

impl FromIterator<TypeDecl> for TypeTable {
    fn from_iter<I: IntoIterator<Item = TypeDecl>>(iter: I) -> Self {
        let mut table = TypeTable::new();
        table.extend(iter);
        table
    }
}

impl TypeSystem for TypeTable {
    fn supertypes(&self, ty: &TypeRef) -> Vec<TypeRef> {
        let TypeRef::Declared { name, args } = ty else {
            return Vec::new();
        };
        let Some(decl) = self.decls.get(name) else {
            return Vec::new();
        };

        decl.superclass
            .iter()
            .chain(decl.interfaces.iter())
            .map(|sup| {
                if args.is_empty() {
                    sup.clone()
                } else {
                    sup.substitute(&decl.name, &decl.type_params, args)
                }
            })
            .collect()
    }

    fn declared_members(&self, name: &str) -> Option<Members<'_>> {
        self.decls.get(name).map(|decl| Members {
            fields: &decl.fields,
            methods: &decl.methods,
        })
    }

    fn type_parameters(&self, name: &str) -> &[String] {
        self.decls
            .get(name)
            .map(|decl| decl.type_params.as_slice())
            .unwrap_or(&[])
    }
}
