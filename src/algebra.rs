//! Relational-algebra expression tree.
//!
//! `Display` prints the canonical one-line form:
//!
//! | Node        | Printed as                          |
//! |-------------|-------------------------------------|
//! | `Relation`  | `EMPLOYEE`                          |
//! | `Product`   | `(A × B × C)`                       |
//! | `Join`      | `(<left> ⋈[<condition>] <table>)`   |
//! | `Select`    | `σ[<p1> ∧ <p2>](<input>)`           |
//! | `Group`     | `γ[<c1>, <c2>](<input>)`            |
//! | `Project`   | `π[<c1>, <c2>](<input>)`            |
//! | `Sort`      | `τ[<c1> ASC, <c2> DESC](<input>)`   |

use std::fmt;

use crate::ast::{JoinKind, OrderItem};

/// Logical AND between predicates.
pub const AND: &str = "∧";

/// Cartesian product.
pub const PRODUCT: &str = "×";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A base table.
    Relation(String),
    /// Cartesian product of two or more base tables.
    Product(Vec<String>),
    /// `left <kind> right` on a raw condition.
    Join {
        kind: JoinKind,
        condition: String,
        left: Box<Expr>,
        right: String,
    },
    /// σ: keep tuples satisfying every predicate.
    Select {
        predicates: Vec<String>,
        input: Box<Expr>,
    },
    /// γ: group by columns.
    Group {
        columns: Vec<String>,
        input: Box<Expr>,
    },
    /// π: keep columns.
    Project {
        columns: Vec<String>,
        input: Box<Expr>,
    },
    /// τ: order tuples.
    Sort {
        keys: Vec<OrderItem>,
        input: Box<Expr>,
    },
}

impl Expr {
    /// The base relation for a FROM list: one table, or their product.
    pub fn base(tables: &[String]) -> Self {
        match tables {
            [single] => Expr::Relation(single.clone()),
            _ => Expr::Product(tables.to_vec()),
        }
    }

    pub fn join(self, kind: JoinKind, condition: impl Into<String>, right: impl Into<String>) -> Self {
        Expr::Join {
            kind,
            condition: condition.into(),
            left: Box::new(self),
            right: right.into(),
        }
    }

    pub fn select(self, predicates: Vec<String>) -> Self {
        Expr::Select {
            predicates,
            input: Box::new(self),
        }
    }

    pub fn group(self, columns: Vec<String>) -> Self {
        Expr::Group {
            columns,
            input: Box::new(self),
        }
    }

    pub fn project(self, columns: Vec<String>) -> Self {
        Expr::Project {
            columns,
            input: Box::new(self),
        }
    }

    pub fn sort(self, keys: Vec<OrderItem>) -> Self {
        Expr::Sort {
            keys,
            input: Box::new(self),
        }
    }

    /// Operator glyph for this node, if it has one.
    pub fn symbol(&self) -> Option<&'static str> {
        match self {
            Expr::Relation(_) => None,
            Expr::Product(_) => Some(PRODUCT),
            Expr::Join { kind, .. } => Some(kind.symbol()),
            Expr::Select { .. } => Some("σ"),
            Expr::Group { .. } => Some("γ"),
            Expr::Project { .. } => Some("π"),
            Expr::Sort { .. } => Some("τ"),
        }
    }

    /// The bracketed subscript of a unary operator, e.g. `Name, Salary`.
    pub fn subscript(&self) -> Option<String> {
        match self {
            Expr::Relation(_) | Expr::Product(_) => None,
            Expr::Join { condition, .. } => Some(collapse_whitespace(condition)),
            Expr::Select { predicates, .. } => Some(predicates.join(&format!(" {AND} "))),
            Expr::Group { columns, .. } | Expr::Project { columns, .. } => Some(columns.join(", ")),
            Expr::Sort { keys, .. } => Some(
                keys.iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
        }
    }

    /// Number of operators between this node and the base relation.
    pub fn depth(&self) -> usize {
        match self {
            Expr::Relation(_) | Expr::Product(_) => 0,
            Expr::Join { left, .. } => 1 + left.depth(),
            Expr::Select { input, .. }
            | Expr::Group { input, .. }
            | Expr::Project { input, .. }
            | Expr::Sort { input, .. } => 1 + input.depth(),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Relation(name) => write!(f, "{name}"),
            Expr::Product(tables) => write!(f, "({})", tables.join(&format!(" {PRODUCT} "))),
            Expr::Join {
                kind,
                condition,
                left,
                right,
            } => write!(
                f,
                "({left} {}[{}] {right})",
                kind.symbol(),
                collapse_whitespace(condition)
            ),
            Expr::Select { input, .. }
            | Expr::Group { input, .. }
            | Expr::Project { input, .. }
            | Expr::Sort { input, .. } => {
                let symbol = self.symbol().unwrap_or_default();
                let subscript = self.subscript().unwrap_or_default();
                write!(f, "{symbol}[{subscript}]({input})")
            }
        }
    }
}

/// Collapse every whitespace run to a single space.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
