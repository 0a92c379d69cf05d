use std::fmt;

use serde::Serialize;

use crate::ast::{Comparator, LogicOp};

/// Ordered field-name sequence of a (possibly nested) property.
///
/// # Examples
/// ```text
/// Name           // ["name"]
/// Address_City   // ["address", "city"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PropertyPath(pub Vec<String>);

impl PropertyPath {
    pub fn new(segments: Vec<String>) -> Self {
        PropertyPath(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// The root property the path navigates from
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn is_nested(&self) -> bool {
        self.0.len() > 1
    }

    pub fn join(&self, separator: &str) -> String {
        self.0.join(separator)
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.join("."))
    }
}

/// A predicate leaf: one property compared against its bound operands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Condition {
    pub path: PropertyPath,
    pub comparator: Comparator,
}

impl Condition {
    pub fn new(path: PropertyPath, comparator: Comparator) -> Self {
        Condition { path, comparator }
    }

    /// Number of bound parameters this condition consumes
    pub fn arity(&self) -> usize {
        self.comparator.arity()
    }
}

/// Predicate tree parsed from the `By...` clause of a method name.
///
/// `And` binds tighter than `Or`; binary nodes are left-associative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Predicate {
    /// Single condition
    ///
    /// # Example
    /// ```text
    /// findByAgeGreaterThan   // Condition(age, GreaterThan)
    /// ```
    Condition(Condition),

    /// Binary AND/OR node
    ///
    /// # Example
    /// ```text
    /// findByAAndBOrC         // Or(And(a, b), c)
    /// ```
    Binary {
        op: LogicOp,
        left: Box<Predicate>,
        right: Box<Predicate>,
    },

    /// Include the wrapped leaf or group only when its bound parameters are present
    Selective(Box<Predicate>),
}

impl Predicate {
    pub fn binary(op: LogicOp, left: Predicate, right: Predicate) -> Self {
        Predicate::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn selective(inner: Predicate) -> Self {
        Predicate::Selective(Box::new(inner))
    }

    /// Whether any node of the tree is selective
    pub fn has_selective(&self) -> bool {
        match self {
            Predicate::Condition(_) => false,
            Predicate::Selective(_) => true,
            Predicate::Binary { left, right, .. } => left.has_selective() || right.has_selective(),
        }
    }

    /// Conditions in declaration order
    pub fn conditions(&self) -> Vec<&Condition> {
        let mut out = Vec::new();
        self.collect_conditions(&mut out);
        out
    }

    fn collect_conditions<'a>(&'a self, out: &mut Vec<&'a Condition>) {
        match self {
            Predicate::Condition(c) => out.push(c),
            Predicate::Selective(inner) => inner.collect_conditions(out),
            Predicate::Binary { left, right, .. } => {
                left.collect_conditions(out);
                right.collect_conditions(out);
            }
        }
    }

    /// Total number of operands the predicate binds
    pub fn operand_count(&self) -> usize {
        self.conditions().iter().map(|c| c.arity()).sum()
    }

    /// Flattens chains of the same connective into n-ary groups.
    ///
    /// `(A AND B AND C) OR D` becomes `Or[And[A, B, C], D]`; selective markers
    /// surface as flags on the leaf or group they wrap.
    pub fn groups(&self) -> PredicateGroup<'_> {
        build_group(self, false)
    }
}

/// Traversal view of a predicate: nested AND/OR groups with selective flags.
#[derive(Debug, Clone, PartialEq)]
pub enum PredicateGroup<'a> {
    Leaf {
        condition: &'a Condition,
        selective: bool,
    },
    Group {
        op: LogicOp,
        selective: bool,
        children: Vec<PredicateGroup<'a>>,
    },
}

fn build_group(predicate: &Predicate, selective: bool) -> PredicateGroup<'_> {
    match predicate {
        Predicate::Condition(condition) => PredicateGroup::Leaf {
            condition,
            selective,
        },
        Predicate::Selective(inner) => build_group(inner, true),
        Predicate::Binary { op, .. } => {
            let mut children = Vec::new();
            flatten(*op, predicate, &mut children);
            PredicateGroup::Group {
                op: *op,
                selective,
                children,
            }
        }
    }
}

fn flatten<'a>(op: LogicOp, predicate: &'a Predicate, out: &mut Vec<PredicateGroup<'a>>) {
    match predicate {
        Predicate::Binary {
            op: inner,
            left,
            right,
        } if *inner == op => {
            flatten(op, left, out);
            flatten(op, right, out);
        }
        other => out.push(build_group(other, false)),
    }
}
