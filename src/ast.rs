//! # Method-name grammar - Abstract Syntax Tree
//!
//! This module defines the AST a data-access method name is parsed into. A
//! conventional name such as `findByNameAndAgeGreaterThan` encodes a complete
//! query intent; the AST captures it without any query text being written.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[statements]** - Operation kinds (`find`, `count`, `insert`, ...)
//! - **[expressions]** - Predicate tree, conditions and property paths
//! - **[operators]** - Comparators, logical connectives and sort directions
//! - **[query]** - Root node with predicate and ordering
//!
//! ## Grammar
//!
//! ```text
//! Statement    := Op 'All'? 'Selective'? ( 'By' Predicate )? ( 'OrderBy' OrderClause+ )?
//! Predicate    := AndGroup ( 'Or' AndGroup )*
//! AndGroup     := 'Selective'? Condition ( 'And' Condition )*
//! Condition    := PropertyPath Comparator? 'Selective'?
//! PropertyPath := Segment ( '_' Segment )*
//! OrderClause  := PropertyPath ( 'Asc' | 'Desc' )?
//! ```
//!
//! ## Examples
//!
//! ```text
//! findByName                        // Find, Condition(name, Equal)
//! findByAAndBOrC                    // Find, Or(And(a, b), c)
//! countByAgeBetween                 // Count, Condition(age, Between)
//! findByAddress_CityOrderByIdDesc   // Find, Condition(address.city), OrderBy(id DESC)
//! updateSelectiveById               // Update, selective payload, Condition(id)
//! ```
pub mod tokens;
pub mod expressions;
pub mod operators;
pub mod statements;
pub mod query;

pub use tokens::{Token, TokenKind};
pub use expressions::{Condition, Predicate, PredicateGroup, PropertyPath};
pub use operators::{Comparator, Direction, LogicOp};
pub use statements::OperationKind;
pub use query::{OrderBy, OrderClause, Query};
