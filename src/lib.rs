//! # sqlra — SQL to relational algebra
//!
//! Translates a single SQL `SELECT` statement into a relational-algebra
//! expression.
//!
//! ## Quick Example
//!
//! ```
//! let algebra = sqlra::translate(
//!     "SELECT Name, Salary FROM EMPLOYEE WHERE Department = 'IT'",
//! ).unwrap();
//! assert_eq!(algebra, "π[Name, Salary](σ[Department = 'IT'](EMPLOYEE))");
//! ```
//!
//! ## Symbology
//!
//! | Symbol        | Name        | SQL                    |
//! |---------------|-------------|------------------------|
//! | `σ`           | Selection   | `WHERE`, `HAVING`      |
//! | `π`           | Projection  | `SELECT a, b`          |
//! | `⋈ ⟕ ⟖ ⟗`     | Joins       | `[INNER] / LEFT / RIGHT / FULL JOIN` |
//! | `×`           | Product     | `FROM a, b`            |
//! | `γ`           | Grouping    | `GROUP BY`             |
//! | `τ`           | Sort        | `ORDER BY`             |
//! | `∧`           | And         | joins predicates       |
//!
//! Operators always nest as `τ(π(σ_having(γ(σ_where(joins(base))))))`.
//! Predicates are copied through as text; they are not parsed or checked.

pub mod algebra;
pub mod ast;
pub mod config;
pub mod error;
pub mod fmt;
pub mod glossary;
pub mod lexer;
pub mod parser;
pub mod transpiler;

pub mod prelude {
    pub use crate::algebra::Expr;
    pub use crate::ast::*;
    pub use crate::error::*;
    pub use crate::parser::extract;
    pub use crate::transpiler::{render, ToAlgebra};
}

/// Extract the clauses of a SELECT statement.
///
/// # Example
///
/// ```
/// use sqlra::parse;
///
/// let query = parse("SELECT * FROM EMPLOYEE e, DEPARTMENT d").unwrap();
/// assert_eq!(query.tables, vec!["EMPLOYEE", "DEPARTMENT"]);
/// assert!(parse("DELETE FROM EMPLOYEE").is_err());
/// ```
pub fn parse(input: &str) -> Result<ast::ParsedQuery, error::NotParseable> {
    parser::extract(input)
}

/// Parse and render in one step.
pub fn translate(input: &str) -> Result<String, error::NotParseable> {
    parser::extract(input).map(|query| transpiler::render(&query))
}
