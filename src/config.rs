//! Mapper manifests.
//!
//! A manifest names the mapper type to derive statements for, carries the
//! settings of the run and declares every type the mapper's signatures refer
//! to. YAML and JSON are both accepted:
//!
//! ```yaml
//! mapper: com.example.PersonMapper
//! config:
//!   table: person                # default: mapper simple name, `Mapper` suffix removed
//!   naming: lower_under_score    # column naming style
//! types:
//!   - name: com.example.PersonMapper
//!     kind: interface
//!     methods:
//!       - name: findByName
//!         params: [{ name: name, type: java.lang.String }]
//!         returns: java.util.List<com.example.Person>
//!   - name: com.example.Person
//!     fields:
//!       - { name: id, type: long, generated_key: true }
//!       - { name: name, type: java.lang.String }
//!     methods:
//!       - { name: getName, returns: java.lang.String }
//!       - name: setName
//!         params: [{ name: name, type: java.lang.String }]
//! ```
use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    naming::{NamingConverter, NamingStyle, decapitalize},
    types::{ResolverConfig, TypeDecl, TypeTable},
};

const MAPPER_SUFFIX: &str = "Mapper";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read manifest: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse manifest: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to parse manifest: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported manifest format `{0}` (expected .yaml, .yml or .json)")]
    UnsupportedFormat(String),

    #[error("mapper type `{0}` is not declared in the manifest")]
    UnknownMapper(String),
}

/// Settings of one derivation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapperConfig {
    /// Document namespace, the mapper name by default
    #[serde(default)]
    pub namespace: Option<String>,

    /// Table the statements run against
    #[serde(default)]
    pub table: Option<String>,

    #[serde(default)]
    pub naming: NamingStyle,

    /// Replaces the default opaque prefixes when present
    #[serde(default)]
    pub opaque_prefixes: Option<Vec<String>>,

    #[serde(default)]
    pub iterable_type: Option<String>,

    /// Preload the platform collection types
    #[serde(default = "enabled")]
    pub platform_types: bool,
}

fn enabled() -> bool {
    true
}

impl Default for MapperConfig {
    fn default() -> Self {
        MapperConfig {
            namespace: None,
            table: None,
            naming: NamingStyle::default(),
            opaque_prefixes: None,
            iterable_type: None,
            platform_types: true,
        }
    }
}

impl MapperConfig {
    pub fn resolver_config(&self) -> ResolverConfig {
        let mut config = ResolverConfig::default();
        if let Some(prefixes) = &self.opaque_prefixes {
            config.opaque_prefixes = prefixes.clone();
        }
        if let Some(iterable) = &self.iterable_type {
            config.iterable_type = iterable.clone();
        }
        config
    }

    pub fn namespace(&self, mapper: &str) -> String {
        self.namespace.clone().unwrap_or_else(|| mapper.to_string())
    }

    /// Explicit table, or the converted simple name of the mapper without
    /// its `Mapper` suffix.
    pub fn table(&self, mapper: &str) -> String {
        if let Some(table) = &self.table {
            return table.clone();
        }
        let simple = mapper.rsplit('.').next().unwrap_or(mapper);
        let entity = match simple.strip_suffix(MAPPER_SUFFIX) {
            Some(stem) if !stem.is_empty() => stem,
            _ => simple,
        };
        self.naming.convert(&decapitalize(entity))
    }
}

/// Input of a derivation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Qualified name of the mapper type
    pub mapper: String,

    #[serde(default)]
    pub config: MapperConfig,

    #[serde(default)]
    pub types: Vec<TypeDecl>,
}

impl Manifest {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()).unwrap_or_default() {
            "yaml" | "yml" => Self::from_yaml_str(&fs::read_to_string(path)?),
            "json" => Self::from_json_str(&fs::read_to_string(path)?),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Type table holding the declared types, on top of the platform types
    /// unless those are disabled.
    pub fn type_table(&self) -> TypeTable {
        let mut table = if self.config.platform_types {
            TypeTable::with_platform_types()
        } else {
            TypeTable::new()
        };
        table.extend(self.types.iter().cloned());
        table
    }

    pub fn namespace(&self) -> String {
        self.config.namespace(&self.mapper)
    }

    pub fn table(&self) -> String {
        self.config.table(&self.mapper)
    }
}

#[test]
fn test_default_table_name() {
    let config = MapperConfig::default();
    assert_eq!(config.table("com.example.UserAccountMapper"), "user_account");
    assert_eq!(config.table("Mapper"), "mapper");
    assert_eq!(config.namespace("com.example.UserAccountMapper"), "com.example.UserAccountMapper");
}
