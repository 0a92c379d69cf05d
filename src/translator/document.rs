use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    ast::Query,
    binder::MethodInfo,
    translator::{IdSnapshot, MappedStatement, TranslateError, TranslateOutcome, Translator},
};

/// Structural problem with a statement document. Aborts the whole run.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("statement document is corrupt: {0}")]
    Corrupt(String),

    #[error("document namespace `{found}` does not match `{expected}`")]
    NamespaceMismatch { expected: String, found: String },

    #[error("failed to read statement document: {0}")]
    Io(#[from] io::Error),
}

/// Statements of one mapper, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementDocument {
    pub namespace: String,
    #[serde(default)]
    pub statements: Vec<MappedStatement>,
}

impl StatementDocument {
    pub fn new(namespace: impl Into<String>) -> Self {
        StatementDocument {
            namespace: namespace.into(),
            statements: Vec::new(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, DocumentError> {
        serde_json::from_str(json).map_err(|e| DocumentError::Corrupt(e.to_string()))
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, DocumentError> {
        serde_yaml::from_str(yaml).map_err(|e| DocumentError::Corrupt(e.to_string()))
    }

    /// Reads a document, as JSON for a `.json` file and as YAML otherwise.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&contents),
            _ => Self::from_yaml_str(&contents),
        }
    }

    /// Fails unless the document belongs to `namespace`.
    pub fn ensure_namespace(&self, namespace: &str) -> Result<(), DocumentError> {
        if self.namespace != namespace {
            return Err(DocumentError::NamespaceMismatch {
                expected: namespace.to_string(),
                found: self.namespace.clone(),
            });
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&MappedStatement> {
        self.statements.iter().find(|s| s.id == id)
    }

    /// Adds the statement for `method` unless `snapshot` already holds its id.
    ///
    /// The translator is only consulted for methods that are not present yet.
    pub fn apply(
        &mut self,
        translator: &dyn Translator,
        query: &Query,
        method: &MethodInfo,
        snapshot: &mut IdSnapshot,
    ) -> Result<TranslateOutcome, TranslateError> {
        if snapshot.contains(&method.name) {
            log::debug!("{}: statement already present", method.name);
            return Ok(TranslateOutcome::AlreadyExists);
        }

        let statement = translator.translate(query, method)?;
        snapshot.record(method.name.clone());
        self.statements.push(statement);
        Ok(TranslateOutcome::Added)
    }
}
