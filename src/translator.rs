//! # Statement translation
//!
//! The boundary between derived methods and a statement document.
//!
//! - **[statement]** - [`MappedStatement`] and its dynamic-SQL fragment tree
//! - **[sql]** - [`SqlTranslator`], the reference [`Translator`]
//! - **[document]** - [`StatementDocument`], the persisted statement list
//!
//! A translator only builds statements. Deciding whether a statement is needed
//! at all is the document's job: a method whose id is already present in the
//! document is left alone, so hand-written statements always win.
use std::collections::HashSet;

use thiserror::Error;

use crate::{ast::Query, binder::MethodInfo};

pub mod document;
pub mod sql;
pub mod statement;

pub use document::{DocumentError, StatementDocument};
pub use sql::SqlTranslator;
pub use statement::{MappedStatement, SqlFragment, StatementKind};

/// Builds one statement from a derived method.
pub trait Translator {
    fn translate(
        &self,
        query: &Query,
        method: &MethodInfo,
    ) -> Result<MappedStatement, TranslateError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error("`{method}` binds {expected} operand(s) but only {found} parameter(s) are available")]
    MissingOperands {
        method: String,
        expected: usize,
        found: usize,
    },

    #[error("`{method}` lost parameter `{param}` while binding, so its operands cannot be matched")]
    DroppedParameter { method: String, param: String },

    #[error("`{method}` compares `{property}` against `{param}`, which is not iterable")]
    NotIterable {
        method: String,
        property: String,
        param: String,
    },

    #[error("`{method}` has no bean parameter to take its values from")]
    MissingPayload { method: String },

    #[error("`{method}` needs `offset` and `limit` parameters")]
    MissingPageParams { method: String },

    #[error("`{method}` must return {expected}")]
    InvalidReturn { method: String, expected: String },

    #[error("`{method}`: {reason}")]
    Unsupported { method: String, reason: String },
}

/// Outcome of applying one method to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslateOutcome {
    /// A new statement was appended
    Added,
    /// A statement with the method's id was already present; nothing was done
    AlreadyExists,
}

/// Statement ids present in a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdSnapshot {
    ids: HashSet<String>,
}

impl IdSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of(document: &StatementDocument) -> Self {
        document.statements.iter().map(|s| s.id.clone()).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Records `id`, returning `false` if it was already present.
    pub fn record(&mut self, id: impl Into<String>) -> bool {
        self.ids.insert(id.into())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<String> for IdSnapshot {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        IdSnapshot {
            ids: iter.into_iter().collect(),
        }
    }
}
