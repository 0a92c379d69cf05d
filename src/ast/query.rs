use serde::Serialize;

use crate::ast::{Direction, OperationKind, Predicate, PropertyPath};

/// Root of the AST derived from one method name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    /// Leading operation keyword
    pub operation: OperationKind,

    /// `All` followed the operation keyword
    pub all: bool,

    /// `Selective` followed the operation keyword (insert columns / update assignments)
    pub selective: bool,

    /// Parsed `By...` clause
    pub predicate: Option<Predicate>,

    /// Parsed `OrderBy...` clause
    pub order_by: Option<OrderBy>,
}

impl Query {
    pub fn new(operation: OperationKind) -> Self {
        Query {
            operation,
            all: false,
            selective: false,
            predicate: None,
            order_by: None,
        }
    }

    /// Whether the predicate contains any selective node
    pub fn has_selective(&self) -> bool {
        self.predicate.as_ref().is_some_and(Predicate::has_selective)
    }

    /// Operands the predicate binds from the method parameters
    pub fn operand_count(&self) -> usize {
        self.predicate.as_ref().map_or(0, Predicate::operand_count)
    }
}

/// `OrderBy` clause: ordered list of sort keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderBy(pub Vec<OrderClause>);

impl OrderBy {
    pub fn clauses(&self) -> &[OrderClause] {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderClause {
    pub path: PropertyPath,
    pub direction: Direction,
}
