use std::mem;

use thiserror::Error;

use crate::{
    ast::{
        Comparator, Condition, Direction, LogicOp, OrderBy, OrderClause, Predicate,
        PropertyPath, Query, Token, TokenKind,
    },
    lexer::{LexError, Lexer},
    naming::decapitalize,
};

/// Grammar violation in a method name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("not derivable: {0}")]
    Lex(#[from] LexError),

    #[error("`{token}` at position {position} is not followed by a condition")]
    DanglingOperator { token: String, position: usize },

    #[error("expected a property name at position {position}, found `{token}`")]
    EmptyPropertyPath { token: String, position: usize },

    #[error("unexpected trailing `{token}` at position {position}")]
    TrailingTokens { token: String, position: usize },

    #[error("unexpected `{token}` at position {position}")]
    UnexpectedToken { token: String, position: usize },
}

impl ParseError {
    /// Character offset of the offending token, if any
    pub fn position(&self) -> Option<usize> {
        match self {
            ParseError::Lex(_) => None,
            ParseError::DanglingOperator { position, .. }
            | ParseError::EmptyPropertyPath { position, .. }
            | ParseError::TrailingTokens { position, .. }
            | ParseError::UnexpectedToken { position, .. } => Some(*position),
        }
    }
}

pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    previous_token: Option<Token>,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, ParseError> {
        let current_token = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current_token,
            previous_token: None,
        })
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        let next = self.lexer.next_token()?;
        self.previous_token = Some(mem::replace(&mut self.current_token, next));
        Ok(())
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current_token.kind == kind
    }

    /// Consumes the current token if it is of `kind`.
    fn accept(&mut self, kind: TokenKind) -> Result<bool, ParseError> {
        if self.check(kind) {
            self.advance()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Error for a position where a property name was required.
    fn missing_property(&self) -> ParseError {
        match (self.current_token.kind, &self.previous_token) {
            (TokenKind::Eof, Some(operator))
                if matches!(
                    operator.kind,
                    TokenKind::By | TokenKind::And | TokenKind::Or | TokenKind::OrderBy
                ) =>
            {
                ParseError::DanglingOperator {
                    token: operator.text.clone(),
                    position: operator.position,
                }
            }
            _ => ParseError::EmptyPropertyPath {
                token: self.current_token.text.clone(),
                position: self.current_token.position,
            },
        }
    }

    /// Parse a complete method name
    pub fn parse(&mut self) -> Result<Query, ParseError> {
        let operation = match self.current_token.kind {
            TokenKind::Operation(op) => op,
            _ => {
                return Err(ParseError::UnexpectedToken {
                    token: self.current_token.text.clone(),
                    position: self.current_token.position,
                });
            }
        };
        self.advance()?;

        let mut query = Query::new(operation);
        query.all = self.accept(TokenKind::All)?;
        query.selective = self.accept(TokenKind::Selective)?;

        if self.accept(TokenKind::By)? {
            query.predicate = Some(self.parse_or()?);
        }

        if self.accept(TokenKind::OrderBy)? {
            query.order_by = Some(self.parse_order_by()?);
        }

        if !self.check(TokenKind::Eof) {
            return Err(ParseError::TrailingTokens {
                token: self.current_token.text.clone(),
                position: self.current_token.position,
            });
        }
        Ok(query)
    }

    fn parse_or(&mut self) -> Result<Predicate, ParseError> {
        let mut left = self.parse_and()?;

        while self.accept(TokenKind::Or)? {
            let right = self.parse_and()?;
            left = Predicate::binary(LogicOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Predicate, ParseError> {
        let group_selective = self.accept(TokenKind::Selective)?;
        let mut left = self.parse_condition()?;

        while self.accept(TokenKind::And)? {
            let right = self.parse_condition()?;
            left = Predicate::binary(LogicOp::And, left, right);
        }

        if group_selective {
            left = Predicate::selective(left);
        }
        Ok(left)
    }

    fn parse_condition(&mut self) -> Result<Predicate, ParseError> {
        let path = self.parse_property_path()?;

        let comparator = match self.current_token.kind {
            TokenKind::Comparator(comparator) => {
                self.advance()?;
                comparator
            }
            _ => Comparator::Equal,
        };

        let condition = Predicate::Condition(Condition::new(path, comparator));
        if self.accept(TokenKind::Selective)? {
            return Ok(Predicate::selective(condition));
        }
        Ok(condition)
    }

    fn parse_property_path(&mut self) -> Result<PropertyPath, ParseError> {
        let mut segments = Vec::new();

        loop {
            if !self.check(TokenKind::Property) {
                return Err(self.missing_property());
            }
            segments.push(decapitalize(&self.current_token.text));
            self.advance()?;

            if !self.accept(TokenKind::PathSeparator)? {
                break;
            }
        }
        Ok(PropertyPath::new(segments))
    }

    fn parse_order_by(&mut self) -> Result<OrderBy, ParseError> {
        let mut clauses = vec![self.parse_order_clause()?];

        while self.check(TokenKind::Property) {
            clauses.push(self.parse_order_clause()?);
        }
        Ok(OrderBy(clauses))
    }

    fn parse_order_clause(&mut self) -> Result<OrderClause, ParseError> {
        let path = self.parse_property_path()?;

        let direction = if self.accept(TokenKind::Desc)? {
            Direction::Desc
        } else {
            self.accept(TokenKind::Asc)?;
            Direction::Asc
        };
        Ok(OrderClause { path, direction })
    }
}

/// Lexes and parses one method name.
///
/// # Examples
///
/// ```
/// use mapgen::ast::{Comparator, OperationKind, Predicate};
/// use mapgen::parser::parse_method_name;
///
/// let query = parse_method_name("findByName").unwrap();
/// assert_eq!(query.operation, OperationKind::Find);
/// match query.predicate {
///     Some(Predicate::Condition(c)) => assert_eq!(c.comparator, Comparator::Equal),
///     other => panic!("unexpected predicate: {:?}", other),
/// }
/// ```
pub fn parse_method_name(name: &str) -> Result<Query, ParseError> {
    let lexer = Lexer::new(name);
    let mut parser = Parser::new(lexer)?;
    parser.parse()
}
