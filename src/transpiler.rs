//! Relational-algebra renderer.
//!
//! Folds the extracted clauses onto a base relation in a fixed order:
//!
//! ```text
//! τ( π( σ_having( γ( σ_where( joins( base ))))))
//! ```
//!
//! The nesting never depends on where a clause appeared in the source,
//! and nothing is rewritten or reordered.

use crate::algebra::Expr;
use crate::ast::ParsedQuery;

/// Trait for converting AST nodes to relational algebra.
pub trait ToAlgebra {
    /// Build the expression tree.
    fn to_expr(&self) -> Expr;

    /// Render the one-line algebra string.
    fn to_algebra(&self) -> String {
        self.to_expr().to_string()
    }
}

impl ToAlgebra for ParsedQuery {
    fn to_expr(&self) -> Expr {
        let mut expr = Expr::base(&self.tables);

        for join in &self.joins {
            expr = expr.join(join.kind, join.condition.as_str(), join.table.as_str());
        }

        if !self.conditions.is_empty() {
            expr = expr.select(self.conditions.clone());
        }

        if !self.group_by.is_empty() {
            expr = expr.group(self.group_by.clone());
        }

        if !self.having.is_empty() {
            expr = expr.select(self.having.clone());
        }

        if !self.is_wildcard() {
            expr = expr.project(self.columns.clone());
        }

        if !self.order_by.is_empty() {
            expr = expr.sort(self.order_by.clone());
        }

        expr
    }
}

/// Render a parsed query. Total: never fails.
pub fn render(parsed: &ParsedQuery) -> String {
    parsed.to_algebra()
}
