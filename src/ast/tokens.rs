use serde::Serialize;

use crate::ast::{Comparator, OperationKind};

/// Kind of a lexical token produced from a method name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    /// Leading operation keyword
    ///
    /// # Examples
    /// ```text
    /// find
    /// countBy...
    /// insertAll
    /// ```
    Operation(OperationKind),

    // Structural keywords
    /// Introduces the predicate clause
    By,

    /// Conjunction between two conditions
    ///
    /// # Examples
    /// ```text
    /// findByNameAndAge
    /// ```
    And,

    /// Disjunction between two condition groups
    Or,

    /// Introduces the ordering clause
    ///
    /// # Examples
    /// ```text
    /// findByNameOrderByAgeDesc
    /// ```
    OrderBy,

    /// Ascending direction
    Asc,

    /// Descending direction
    Desc,

    /// Unfiltered or batch form of an operation
    ///
    /// # Examples
    /// ```text
    /// findAll
    /// insertAll
    /// ```
    All,

    /// Conditional-inclusion marker
    ///
    /// # Context-dependent meanings:
    /// - after the operation keyword: selective payload (`insertSelective`)
    /// - after `By`/`Or`: selective condition group (`findBySelectiveNameAndAge`)
    /// - after a condition: selective leaf (`findByNameSelective`)
    Selective,

    /// Comparator keyword
    ///
    /// # Examples
    /// ```text
    /// GreaterThan
    /// IsNotNull
    /// Between
    /// ```
    Comparator(Comparator),

    /// Property name segment (any run of words that is not a keyword)
    Property,

    /// `_`, separates segments of a nested property path
    PathSeparator,

    /// End of input
    Eof,
}

/// A lexical unit of a method name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text the token was read from
    pub text: String,
    /// Character offset of the token in the method name
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: usize) -> Self {
        Token {
            kind,
            text: text.into(),
            position,
        }
    }

    pub fn eof(position: usize) -> Self {
        Token::new(TokenKind::Eof, "", position)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}
