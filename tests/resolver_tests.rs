// tests/resolver_tests.rs

use mapgen::naming::NamingStyle;
use mapgen::types::{
    BeanField, FieldDecl, MethodDecl, ResolveError, ResolverConfig, TypeDecl, TypeDescriptor,
    TypeKind, TypeRef, TypeResolver, TypeSystem, TypeTable,
};

const NAMING: NamingStyle = NamingStyle::LowerUnderScore;

fn string() -> TypeRef {
    TypeRef::simple("java.lang.String")
}

fn long() -> TypeRef {
    TypeRef::primitive("long")
}

fn sig(signature: &str) -> TypeRef {
    TypeRef::parse(signature).unwrap()
}

fn field(name: &str, column: &str) -> BeanField {
    BeanField {
        name: name.to_string(),
        column: column.to_string(),
        generated_key: false,
    }
}

fn person_table() -> TypeTable {
    let mut table = TypeTable::with_platform_types();
    table.insert(
        TypeDecl::class("a.Person")
            .field(FieldDecl::new("id", long()).generated_key())
            .getter("id", long())
            .setter("id", long())
            .property("firstName", string())
            .property("age", TypeRef::primitive("int"))
            .field(FieldDecl::new("nickname", string()).column("alias")),
    );
    table
}

fn resolve(table: &TypeTable, signature: &str) -> Result<TypeDescriptor, ResolveError> {
    let resolver = TypeResolver::new(table, &NAMING, ResolverConfig::default());
    resolver.resolve(&TypeRef::simple("a.PersonMapper"), &sig(signature))
}

// ============================================================================
// Scalars and iterables
// ============================================================================

#[test]
fn test_primitives_and_void() {
    let table = person_table();
    assert_eq!(
        resolve(&table, "int").unwrap(),
        TypeDescriptor::Scalar {
            name: "int".to_string()
        }
    );
    assert_eq!(resolve(&table, "void").unwrap(), TypeDescriptor::Void);
    assert_eq!(resolve(&table, "void").unwrap().kind(), TypeKind::Void);
}

#[test]
fn test_opaque_platform_types() {
    let table = person_table();
    for signature in [
        "java.lang.String",
        "java.time.LocalDate",
        "java.math.BigDecimal",
        "java.util.Date",
    ] {
        let descriptor = resolve(&table, signature).unwrap();
        assert_eq!(descriptor.kind(), TypeKind::Scalar, "{}", signature);
        assert_eq!(descriptor.qualified_name(), signature);
    }
}

#[test]
fn test_scalar_at_any_allowed_depth() {
    let table = person_table();
    for signature in [
        "long",
        "long[]",
        "java.util.List<java.lang.String>",
        "java.util.List<java.lang.String[]>",
        "java.util.Set<java.util.List<java.lang.Long>>",
    ] {
        let descriptor = resolve(&table, signature).unwrap();
        assert_eq!(descriptor.leaf().kind(), TypeKind::Scalar, "{}", signature);
    }
}

#[test]
fn test_iterable_of_beans() {
    let table = person_table();
    let descriptor = resolve(&table, "java.util.List<a.Person>").unwrap();
    assert_eq!(descriptor.kind(), TypeKind::Iterable);
    assert_eq!(descriptor.qualified_name(), "java.util.List");
    assert_eq!(descriptor.element().unwrap().qualified_name(), "a.Person");
    assert!(descriptor.is_iterable());
    assert!(descriptor.is_bean());
}

#[test]
fn test_iterable_through_implementation_classes() {
    let table = person_table();
    for signature in [
        "java.util.ArrayList<a.Person>",
        "java.util.LinkedHashSet<a.Person>",
        "java.util.Collection<a.Person>",
        "java.lang.Iterable<a.Person>",
    ] {
        let descriptor = resolve(&table, signature).unwrap();
        assert!(descriptor.is_iterable(), "{}", signature);
        assert_eq!(descriptor.leaf().qualified_name(), "a.Person", "{}", signature);
    }
}

#[test]
fn test_array_resolves_to_iterable() {
    let table = person_table();
    let descriptor = resolve(&table, "a.Person[]").unwrap();
    assert_eq!(descriptor.kind(), TypeKind::Iterable);
    assert_eq!(descriptor.qualified_name(), "a.Person[]");
    assert!(descriptor.is_bean());
}

#[test]
fn test_raw_iterable_fails() {
    let table = person_table();
    assert_eq!(
        resolve(&table, "java.util.List"),
        Err(ResolveError::RawIterable {
            name: "java.util.List".to_string()
        })
    );
}

// ============================================================================
// Depth
// ============================================================================

#[test]
fn test_depth_two_resolves() {
    // Array<Iterable<Bean>>
    let table = person_table();
    let descriptor = resolve(&table, "java.util.List<a.Person>[]").unwrap();
    let inner = descriptor.element().unwrap();
    assert_eq!(inner.qualified_name(), "java.util.List");
    assert_eq!(inner.element().unwrap().kind(), TypeKind::Bean);
}

#[test]
fn test_depth_three_fails() {
    // Iterable<Array<Iterable<X>>>
    let table = person_table();
    assert!(matches!(
        resolve(&table, "java.util.List<java.util.List<a.Person>[]>"),
        Err(ResolveError::DepthExceeded { max: 2, .. })
    ));
    assert!(matches!(
        resolve(&table, "int[][][]"),
        Err(ResolveError::DepthExceeded { .. })
    ));
}

// ============================================================================
// Beans
// ============================================================================

#[test]
fn test_bean_fields() {
    let table = person_table();
    let descriptor = resolve(&table, "a.Person").unwrap();
    assert_eq!(
        descriptor,
        TypeDescriptor::Bean {
            name: "a.Person".to_string(),
            fields: vec![
                BeanField {
                    name: "id".to_string(),
                    column: "id".to_string(),
                    generated_key: true,
                },
                field("firstName", "first_name"),
                field("age", "age"),
            ],
        }
    );
}

#[test]
fn test_bean_resolution_is_stable() {
    let table = person_table();
    let first = resolve(&table, "a.Person").unwrap();
    let second = resolve(&table, "a.Person").unwrap();
    assert_eq!(first, second);
    assert_eq!(first.fields(), second.fields());
}

#[test]
fn test_column_override() {
    let mut table = person_table();
    table.insert(
        TypeDecl::class("a.Tag")
            .field(FieldDecl::new("label", string()).column("tag_text"))
            .getter("label", string())
            .setter("label", string()),
    );
    assert_eq!(
        resolve(&table, "a.Tag").unwrap().fields(),
        &[field("label", "tag_text")]
    );
}

#[test]
fn test_inheritance_chain() {
    let mut table = person_table();
    table.insert(
        TypeDecl::class("a.Base")
            .property("id", long())
            .field(FieldDecl::new("secret", string()))
            .getter("secret", string()),
    );
    table.insert(
        TypeDecl::class("a.Middle")
            .extends(TypeRef::simple("a.Base"))
            .property("name", string())
            // shadows Base.id and maps it elsewhere; the ancestor wins
            .field(FieldDecl::new("id", long()).column("middle_id"))
            .getter("age", TypeRef::primitive("int")),
    );
    table.insert(
        TypeDecl::class("a.Leaf")
            .extends(TypeRef::simple("a.Middle"))
            .field(FieldDecl::new("age", TypeRef::primitive("int")))
            .setter("age", TypeRef::primitive("int"))
            .getter("secret", string()),
    );

    let descriptor = resolve(&table, "a.Leaf").unwrap();
    // `secret` has getters on two levels but no setter anywhere
    assert_eq!(
        descriptor.fields(),
        &[field("id", "id"), field("name", "name"), field("age", "age")]
    );
}

#[test]
fn test_getter_without_field_is_ignored() {
    let mut table = person_table();
    table.insert(
        TypeDecl::class("a.Computed")
            .property("total", long())
            .getter("average", long())
            .setter("average", long()),
    );
    assert_eq!(resolve(&table, "a.Computed").unwrap().fields(), &[field("total", "total")]);
}

#[test]
fn test_unknown_type_fails() {
    let table = person_table();
    assert_eq!(
        resolve(&table, "a.Missing"),
        Err(ResolveError::UnknownType {
            name: "a.Missing".to_string()
        })
    );
}

#[test]
fn test_naming_style() {
    let table = person_table();
    let upper = NamingStyle::UpperUnderScore;
    let resolver = TypeResolver::new(&table, &upper, ResolverConfig::default());
    let descriptor = resolver
        .resolve(&TypeRef::simple("a.PersonMapper"), &sig("a.Person"))
        .unwrap();
    assert_eq!(descriptor.fields()[1].column, "FIRST_NAME");

    let prefixed = |name: &str| format!("col_{}", name);
    let resolver = TypeResolver::new(&table, &prefixed, ResolverConfig::default());
    let descriptor = resolver
        .resolve(&TypeRef::simple("a.PersonMapper"), &sig("a.Person"))
        .unwrap();
    assert_eq!(descriptor.fields()[1].column, "col_firstName");
}

// ============================================================================
// Generics
// ============================================================================

fn generic_table() -> TypeTable {
    let mut table = person_table();
    table.insert(
        TypeDecl::interface("a.BaseMapper")
            .type_params(&["T"])
            .method(MethodDecl::new("findById", sig("T")))
            .method(MethodDecl::new("findAll", sig("java.util.List<T>"))),
    );
    table.insert(
        TypeDecl::interface("a.PersonMapper").implements(sig("a.BaseMapper<a.Person>")),
    );
    table
}

fn base_method_return(table: &TypeTable, method: &str) -> TypeRef {
    table
        .get("a.BaseMapper")
        .unwrap()
        .methods
        .iter()
        .find(|m| m.name == method)
        .unwrap()
        .returns
        .clone()
}

#[test]
fn test_type_variable_is_linked() {
    let table = generic_table();
    assert_eq!(base_method_return(&table, "findById"), TypeRef::var("T", "a.BaseMapper"));
}

#[test]
fn test_type_variable_substitution() {
    let table = generic_table();
    let resolver = TypeResolver::new(&table, &NAMING, ResolverConfig::default());
    let mapper = TypeRef::simple("a.PersonMapper");

    let descriptor = resolver
        .resolve(&mapper, &base_method_return(&table, "findById"))
        .unwrap();
    assert_eq!(descriptor.kind(), TypeKind::Bean);
    assert_eq!(descriptor.qualified_name(), "a.Person");

    let descriptor = resolver
        .resolve(&mapper, &base_method_return(&table, "findAll"))
        .unwrap();
    assert!(descriptor.is_iterable());
    assert_eq!(descriptor.leaf().qualified_name(), "a.Person");
}

#[test]
fn test_type_variable_through_intermediate_interface() {
    let mut table = generic_table();
    table.insert(
        TypeDecl::interface("a.CrudMapper")
            .type_params(&["E"])
            .implements(sig("a.BaseMapper<E>")),
    );
    table.insert(TypeDecl::interface("a.OtherMapper").implements(sig("a.CrudMapper<a.Person>")));

    let resolver = TypeResolver::new(&table, &NAMING, ResolverConfig::default());
    let descriptor = resolver
        .resolve(
            &TypeRef::simple("a.OtherMapper"),
            &base_method_return(&table, "findById"),
        )
        .unwrap();
    assert_eq!(descriptor.qualified_name(), "a.Person");
}

#[test]
fn test_type_variable_keeps_depth_budget() {
    let mut table = generic_table();
    table.insert(
        TypeDecl::interface("a.NestedMapper")
            .implements(sig("a.BaseMapper<java.util.List<a.Person>[]>")),
    );
    let resolver = TypeResolver::new(&table, &NAMING, ResolverConfig::default());
    let mapper = TypeRef::simple("a.NestedMapper");

    // T is at depth 0 and resolves at depth 0
    assert!(resolver.resolve(&mapper, &base_method_return(&table, "findById")).is_ok());
    // List<T> puts T at depth 1, pushing the bean to depth 3
    assert!(matches!(
        resolver.resolve(&mapper, &base_method_return(&table, "findAll")),
        Err(ResolveError::DepthExceeded { .. })
    ));
}

#[test]
fn test_unresolved_type_variable() {
    let table = generic_table();
    let resolver = TypeResolver::new(&table, &NAMING, ResolverConfig::default());
    assert_eq!(
        resolver.resolve(&TypeRef::simple("a.Person"), &TypeRef::var("T", "a.BaseMapper")),
        Err(ResolveError::UnresolvedVariable {
            name: "T".to_string(),
            owner: "a.BaseMapper".to_string()
        })
    );
}

#[test]
fn test_cyclic_type_variable() {
    let table = generic_table();
    let resolver = TypeResolver::new(&table, &NAMING, ResolverConfig::default());
    let var = TypeRef::var("T", "a.BaseMapper");
    let owner = TypeRef::declared("a.BaseMapper", vec![var.clone()]);
    assert_eq!(
        resolver.resolve(&owner, &var),
        Err(ResolveError::CyclicVariable {
            name: "T".to_string(),
            owner: "a.BaseMapper".to_string()
        })
    );
}

// ============================================================================
// Configuration and type table
// ============================================================================

#[test]
fn test_custom_opaque_prefixes() {
    let mut table = person_table();
    table.insert(TypeDecl::class("a.value.Money"));
    let config = ResolverConfig {
        opaque_prefixes: vec!["java.".to_string(), "a.value.".to_string()],
        ..ResolverConfig::default()
    };
    let resolver = TypeResolver::new(&table, &NAMING, config);
    let descriptor = resolver
        .resolve(&TypeRef::simple("a.PersonMapper"), &sig("a.value.Money"))
        .unwrap();
    assert_eq!(descriptor.kind(), TypeKind::Scalar);
}

#[test]
fn test_custom_iterable_type() {
    let mut table = TypeTable::new();
    table.insert(TypeDecl::interface("x.Seq").type_params(&["A"]));
    table.insert(
        TypeDecl::class("x.Vector")
            .type_params(&["A"])
            .implements(sig("x.Seq<A>")),
    );
    let config = ResolverConfig {
        iterable_type: "x.Seq".to_string(),
        ..ResolverConfig::default()
    };
    let resolver = TypeResolver::new(&table, &NAMING, config);
    let descriptor = resolver
        .resolve(&TypeRef::simple("x.Mapper"), &sig("x.Vector<int>"))
        .unwrap();
    assert!(descriptor.is_iterable());
    assert_eq!(descriptor.leaf().qualified_name(), "int");
}

#[test]
fn test_supertype_closure() {
    let table = TypeTable::with_platform_types();
    let closure = table.supertype_closure(&sig("java.util.LinkedHashSet<a.Person>"));
    let rendered: Vec<String> = closure.iter().map(|t| t.to_string()).collect();
    assert_eq!(
        rendered,
        vec![
            "java.util.HashSet<a.Person>",
            "java.util.Set<a.Person>",
            "java.util.Collection<a.Person>",
            "java.lang.Iterable<a.Person>",
        ]
    );
}

#[test]
fn test_supertype_closure_visits_each_type_once() {
    let table = TypeTable::with_platform_types();
    // LinkedList reaches Collection through both List and Deque
    let closure = table.supertype_closure(&sig("java.util.LinkedList<a.Person>"));
    let collections = closure
        .iter()
        .filter(|t| t.erasure() == Some("java.util.Collection"))
        .count();
    assert_eq!(collections, 1);
}
