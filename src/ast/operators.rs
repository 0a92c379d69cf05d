use serde::Serialize;

/// Condition comparators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Comparator {
    /// Default when no comparator keyword follows the property (`=`)
    Equal,
    /// `Not` (`!=`)
    Not,
    /// `GreaterThan` (`>`)
    GreaterThan,
    /// `GreaterThanEqual` (`>=`)
    GreaterThanEqual,
    /// `LessThan` (`<`)
    LessThan,
    /// `LessThanEqual` (`<=`)
    LessThanEqual,
    /// `Like`
    Like,
    /// `NotLike`
    NotLike,
    /// `In`, operand is an iterable
    In,
    /// `NotIn`, operand is an iterable
    NotIn,
    /// `IsNull`, no operand
    IsNull,
    /// `IsNotNull`, no operand
    IsNotNull,
    /// `Between`, two operands
    Between,
    /// `Containing` (`LIKE %x%`)
    Containing,
    /// `StartingWith` (`LIKE x%`)
    StartingWith,
    /// `EndingWith` (`LIKE %x`)
    EndingWith,
}

impl Comparator {
    /// Number of bound parameters a condition with this comparator consumes.
    pub fn arity(self) -> usize {
        match self {
            Comparator::IsNull | Comparator::IsNotNull => 0,
            Comparator::Between => 2,
            _ => 1,
        }
    }

    /// Whether the single operand is expected to be an iterable.
    pub fn expects_iterable(self) -> bool {
        matches!(self, Comparator::In | Comparator::NotIn)
    }
}

/// Logical connective of a binary predicate node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LogicOp {
    /// `And`, binds tighter than `Or`
    And,
    /// `Or`
    Or,
}

impl LogicOp {
    pub fn keyword(self) -> &'static str {
        match self {
            LogicOp::And => "AND",
            LogicOp::Or => "OR",
        }
    }
}

/// Sort direction of an order clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn keyword(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}
