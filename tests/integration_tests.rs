// tests/integration_tests.rs

use mapgen::ast::{Comparator, LogicOp, OperationKind, Predicate};
use mapgen::binder::MethodBinder;
use mapgen::config::{ConfigError, Manifest};
use mapgen::generator::{GenerateError, generate};
use mapgen::mapper::SkipReason;
use mapgen::naming::NamingStyle;
use mapgen::output::to_mapper_xml;
use mapgen::parser::parse_method_name;
use mapgen::translator::{
    DocumentError, SqlTranslator, StatementDocument, TranslateError, Translator,
};
use mapgen::types::{MethodDecl, ParamDecl, ResolverConfig, TypeKind, TypeRef, TypeResolver};

const MANIFEST: &str = r#"
mapper: com.example.PersonMapper
types:
  - name: com.example.BaseMapper
    kind: interface
    type_params: [T]
    methods:
      - name: insert
        params: [{ name: entity, type: T }]
        returns: int
      - name: getById
        params: [{ name: id, type: long }]
        returns: T

  - name: com.example.PersonMapper
    kind: interface
    interfaces: ["com.example.BaseMapper<com.example.Person>"]
    methods:
      - name: findByNameAndAgeGreaterThan
        params:
          - { name: name, type: java.lang.String }
          - { name: age, type: int }
        returns: "java.util.List<com.example.Person>"
      - name: countByAgeBetween
        params:
          - { name: min, type: int }
          - { name: max, type: int }
        returns: long
      - name: findByHand
        returns: "java.util.List<com.example.Person>"
        statement: SELECT * FROM person
      - name: refresh
      - name: findByTags
        params: [{ name: tags, type: java.util.List }]
        returns: "java.util.List<com.example.Person>"

  - name: com.example.Person
    fields:
      - { name: id, type: long, generated_key: true }
      - { name: name, type: java.lang.String }
      - { name: age, type: int }
    methods:
      - { name: getId, returns: long }
      - { name: setId, params: [{ name: id, type: long }] }
      - { name: getName, returns: java.lang.String }
      - { name: setName, params: [{ name: name, type: java.lang.String }] }
      - { name: getAge, returns: int }
      - { name: setAge, params: [{ name: age, type: int }] }
"#;

fn manifest() -> Manifest {
    Manifest::from_yaml_str(MANIFEST).unwrap()
}

// ============================================================================
// One method, end to end
// ============================================================================

#[test]
fn test_find_by_name_and_age_greater_than() {
    let manifest = manifest();
    let types = manifest.type_table();
    let naming = NamingStyle::LowerUnderScore;
    let binder = MethodBinder::new(TypeResolver::new(&types, &naming, ResolverConfig::default()));

    let name = "findByNameAndAgeGreaterThan";
    let query = parse_method_name(name).unwrap();
    assert_eq!(query.operation, OperationKind::Find);
    match &query.predicate {
        Some(Predicate::Binary {
            op: LogicOp::And,
            left,
            right,
        }) => {
            let conditions = [left.conditions()[0], right.conditions()[0]];
            assert_eq!(conditions[0].path.to_string(), "name");
            assert_eq!(conditions[0].comparator, Comparator::Equal);
            assert_eq!(conditions[1].path.to_string(), "age");
            assert_eq!(conditions[1].comparator, Comparator::GreaterThan);
        }
        other => panic!("Expected And predicate, got {:?}", other),
    }

    let returns = TypeRef::parse("java.util.List<com.example.Person>").unwrap();
    let method = MethodDecl::new(name, returns)
        .param(ParamDecl::new("name", TypeRef::simple("java.lang.String")))
        .param(ParamDecl::new("age", TypeRef::primitive("int")));
    let info = binder
        .bind(&TypeRef::simple(&manifest.mapper), &query, &method)
        .unwrap();

    assert_eq!(info.params.len(), 2);
    assert_eq!(info.params[0].name, "name");
    assert_eq!(info.params[0].ty.kind(), TypeKind::Scalar);
    assert_eq!(info.params[1].name, "age");
    assert_eq!(info.params[1].column, "age");
    assert!(info.ret.is_iterable);
    assert!(info.ret.is_bean);
    assert_eq!(info.ret.ty.leaf().qualified_name(), "com.example.Person");

    let translator = SqlTranslator::new(manifest.table(), naming);
    let statement = translator.translate(&query, &info).unwrap();
    assert_eq!(
        statement.sql(),
        "SELECT id, name, age FROM person WHERE name = #{name} AND age > #{age}"
    );
}

// ============================================================================
// Generation runs
// ============================================================================

#[test]
fn test_generate_fresh_document() {
    let report = generate(&manifest(), None).unwrap();

    assert_eq!(report.document.namespace, "com.example.PersonMapper");
    assert_eq!(
        report.added,
        vec!["insert", "getById", "findByNameAndAgeGreaterThan", "countByAgeBetween"]
    );
    assert!(report.existing.is_empty());
    assert!(!report.is_complete());

    let document = &report.document;
    let insert = document.get("insert").unwrap();
    assert_eq!(insert.sql(), "INSERT INTO person (name, age) VALUES (#{name}, #{age})");
    assert_eq!(insert.parameter_type.as_deref(), Some("com.example.Person"));
    assert_eq!(insert.key_property.as_deref(), Some("id"));

    let get = document.get("getById").unwrap();
    assert_eq!(get.sql(), "SELECT id, name, age FROM person WHERE id = #{id} LIMIT 1");
    assert_eq!(get.result_type.as_deref(), Some("com.example.Person"));

    assert_eq!(
        document.get("countByAgeBetween").unwrap().sql(),
        "SELECT COUNT(*) FROM person WHERE age BETWEEN #{min} AND #{max}"
    );
    assert!(document.get("findByHand").is_none());
}

#[test]
fn test_generate_reports_skipped_and_failed() {
    let report = generate(&manifest(), None).unwrap();

    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].name, "refresh");
    assert!(matches!(report.skipped[0].reason, SkipReason::NotDerivable(_)));

    // the raw List parameter is dropped, so the condition has nothing to bind
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].name, "findByTags");
    assert_eq!(
        report.failed[0].error,
        TranslateError::DroppedParameter {
            method: "findByTags".to_string(),
            param: "tags".to_string(),
        }
    );
}

#[test]
fn test_generate_into_existing_document() {
    let existing = StatementDocument::from_yaml_str(
        r#"
namespace: com.example.PersonMapper
statements:
  - id: getById
    kind: select
    result_type: com.example.Person
    body:
      - { type: text, text: "SELECT * FROM person WHERE id = " }
      - { type: param, name: id }
"#,
    )
    .unwrap();

    let report = generate(&manifest(), Some(existing)).unwrap();
    assert_eq!(report.existing, vec!["getById"]);
    assert_eq!(
        report.added,
        vec!["insert", "findByNameAndAgeGreaterThan", "countByAgeBetween"]
    );

    let ids: Vec<&str> = report.document.statements.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["getById", "insert", "findByNameAndAgeGreaterThan", "countByAgeBetween"]
    );
    assert_eq!(
        report.document.get("getById").unwrap().sql(),
        "SELECT * FROM person WHERE id = #{id}"
    );

    // a second run over its own output adds nothing
    let again = generate(&manifest(), Some(report.document.clone())).unwrap();
    assert!(again.added.is_empty());
    assert_eq!(again.existing.len(), 4);
    assert_eq!(again.document, report.document);
}

#[test]
fn test_generate_rejects_foreign_document() {
    let existing = StatementDocument::new("com.example.OrderMapper");
    assert!(matches!(
        generate(&manifest(), Some(existing)),
        Err(GenerateError::Document(DocumentError::NamespaceMismatch { .. }))
    ));
}

#[test]
fn test_generate_unknown_mapper() {
    let mut manifest = manifest();
    manifest.mapper = "com.example.Missing".to_string();
    match generate(&manifest, None) {
        Err(GenerateError::Config(ConfigError::UnknownMapper(name))) => {
            assert_eq!(name, "com.example.Missing")
        }
        other => panic!("Expected unknown mapper, got {:?}", other.map(|r| r.added)),
    }
}

#[test]
fn test_generate_with_configured_table_and_naming() {
    let mut manifest = manifest();
    manifest.config.table = Some("people".to_string());
    manifest.config.naming = NamingStyle::UpperUnderScore;
    let report = generate(&manifest, None).unwrap();

    assert_eq!(
        report.document.get("getById").unwrap().sql(),
        "SELECT ID AS id, NAME AS name, AGE AS age FROM people WHERE ID = #{id} LIMIT 1"
    );
}

#[test]
fn test_manifest_from_json() {
    let manifest = Manifest::from_json_str(
        r#"{
            "mapper": "a.TagMapper",
            "config": { "namespace": "tags", "platform_types": false },
            "types": [
                {
                    "name": "a.TagMapper",
                    "kind": "interface",
                    "methods": [
                        { "name": "countByLabel", "params": [{ "name": "label", "type": "java.lang.String" }], "returns": "long" }
                    ]
                }
            ]
        }"#,
    )
    .unwrap();
    assert_eq!(manifest.namespace(), "tags");
    assert_eq!(manifest.table(), "tag");
    assert!(!manifest.type_table().contains("java.util.List"));

    let report = generate(&manifest, None).unwrap();
    assert!(report.is_complete());
    assert_eq!(
        report.document.get("countByLabel").unwrap().sql(),
        "SELECT COUNT(*) FROM tag WHERE label = #{label}"
    );
}

#[test]
fn test_mapper_xml_of_run() {
    let report = generate(&manifest(), None).unwrap();
    let xml = to_mapper_xml(&report.document);
    assert_eq!(xml.matches("<!-- auto mapper generate -->").count(), 4);
    assert!(xml.contains(
        "<insert id=\"insert\" parameterType=\"com.example.Person\" useGeneratedKeys=\"true\" keyProperty=\"id\">"
    ));
    assert!(xml.contains("WHERE name = #{name} AND age > #{age}</select>"));
}

// ============================================================================
// CLI
// ============================================================================

#[cfg(feature = "cli")]
mod cli {
    use std::fs;
    use std::path::PathBuf;

    use mapgen::cli::{CliError, GenerateOptions, execute_generate, parse_name, resolve_type};
    use mapgen::config::ConfigError;
    use mapgen::output::OutputFormat;
    use mapgen::types::TypeKind;

    use super::MANIFEST;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("mapgen-{}-{}", std::process::id(), name));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_execute_generate() {
        let manifest = write_temp("generate.yaml", MANIFEST);
        let options = GenerateOptions {
            manifest,
            format: OutputFormat::Xml,
            ..GenerateOptions::default()
        };
        let xml = execute_generate(&options).unwrap();
        assert!(xml.starts_with("<mapper namespace=\"com.example.PersonMapper\">"));
        assert!(xml.contains("<select id=\"countByAgeBetween\""));
    }

    #[test]
    fn test_execute_generate_strict() {
        let manifest = write_temp("strict.yaml", MANIFEST);
        let options = GenerateOptions {
            manifest,
            strict: true,
            ..GenerateOptions::default()
        };
        assert!(matches!(execute_generate(&options), Err(CliError::Incomplete(2))));
    }

    #[test]
    fn test_execute_generate_with_existing() {
        let manifest = write_temp("existing.yaml", MANIFEST);
        let existing = write_temp(
            "existing.json",
            r#"{"namespace":"com.example.PersonMapper","statements":[]}"#,
        );
        let options = GenerateOptions {
            manifest,
            existing: Some(existing),
            ..GenerateOptions::default()
        };
        let json = execute_generate(&options).unwrap();
        let document: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(document["statements"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_unsupported_manifest_extension() {
        let manifest = write_temp("manifest.toml", MANIFEST);
        let options = GenerateOptions {
            manifest,
            ..GenerateOptions::default()
        };
        assert!(matches!(
            execute_generate(&options),
            Err(CliError::Config(ConfigError::UnsupportedFormat(ext))) if ext == "toml"
        ));
    }

    #[test]
    fn test_parse_name() {
        let report = parse_name("findByNameOrderByAgeDesc").unwrap();
        assert_eq!(report.tokens.len(), 7);
        assert!(report.query.order_by.is_some());
        assert!(matches!(parse_name("findByNameAnd"), Err(CliError::Parse(_))));
    }

    #[test]
    fn test_resolve_type() {
        let manifest = write_temp("resolve.yaml", MANIFEST);
        let descriptor = resolve_type(&manifest, "java.util.List<com.example.Person>").unwrap();
        assert_eq!(descriptor.kind(), TypeKind::Iterable);
        assert_eq!(descriptor.leaf().fields().len(), 3);

        assert!(matches!(
            resolve_type(&manifest, "java.util.List<"),
            Err(CliError::Signature(_))
        ));
        assert!(matches!(
            resolve_type(&manifest, "com.example.Missing"),
            Err(CliError::Resolve(_))
        ));
    }
}
