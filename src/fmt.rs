//! Indented tree layout for algebra expressions.
//!
//! ```text
//! π[Name, Salary]
//!   σ[Department = 'IT']
//!     EMPLOYEE
//! ```
//!
//! Joins and products list their operands one level deeper.

use std::fmt::{Result, Write};

use crate::algebra::Expr;

const INDENT: &str = "  ";

pub struct Formatter {
    indent_level: usize,
    buffer: String,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    pub fn new() -> Self {
        Self {
            indent_level: 0,
            buffer: String::new(),
        }
    }

    pub fn format(mut self, expr: &Expr) -> std::result::Result<String, std::fmt::Error> {
        self.visit(expr)?;
        Ok(self.buffer)
    }

    fn line(&mut self, text: &str) -> Result {
        for _ in 0..self.indent_level {
            self.buffer.push_str(INDENT);
        }
        writeln!(self.buffer, "{text}")
    }

    fn visit(&mut self, expr: &Expr) -> Result {
        match expr {
            Expr::Relation(name) => self.line(name),
            Expr::Product(tables) => {
                self.line(crate::algebra::PRODUCT)?;
                self.indent_level += 1;
                for table in tables {
                    self.line(table)?;
                }
                self.indent_level -= 1;
                Ok(())
            }
            Expr::Join { left, right, .. } => {
                self.header(expr)?;
                self.indent_level += 1;
                self.visit(left)?;
                self.line(right)?;
                self.indent_level -= 1;
                Ok(())
            }
            Expr::Select { input, .. }
            | Expr::Group { input, .. }
            | Expr::Project { input, .. }
            | Expr::Sort { input, .. } => {
                self.header(expr)?;
                self.indent_level += 1;
                self.visit(input)?;
                self.indent_level -= 1;
                Ok(())
            }
        }
    }

    fn header(&mut self, expr: &Expr) -> Result {
        let symbol = expr.symbol().unwrap_or_default();
        let subscript = expr.subscript().unwrap_or_default();
        self.line(&format!("{symbol}[{subscript}]"))
    }
}

/// Format an expression as an indented tree.
pub fn pretty(expr: &Expr) -> String {
    Formatter::new().format(expr).unwrap_or_else(|_| expr.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::extract;
    use crate::transpiler::ToAlgebra;
    use pretty_assertions::assert_eq;

    fn tree(sql: &str) -> String {
        pretty(&extract(sql).unwrap().to_expr())
    }

    #[test]
    fn test_single_relation() {
        assert_eq!(tree("SELECT * FROM EMPLOYEE"), "EMPLOYEE\n");
    }

    #[test]
    fn test_nested_unary() {
        assert_eq!(
            tree("SELECT Name, Salary FROM EMPLOYEE WHERE Department = 'IT'"),
            "π[Name, Salary]\n  σ[Department = 'IT']\n    EMPLOYEE\n"
        );
    }

    #[test]
    fn test_join_and_product() {
        assert_eq!(
            tree("SELECT * FROM A, B LEFT JOIN C ON B.id = C.id"),
            "⟕[B.id = C.id]\n  ×\n    A\n    B\n  C\n"
        );
    }

    #[test]
    fn test_formatter_reusable_per_expression() {
        let expr = extract("SELECT a FROM t").unwrap().to_expr();
        let out = Formatter::new().format(&expr).unwrap();
        assert_eq!(out, "π[a]\n  t\n");
        assert_eq!(out, pretty(&expr));
    }
}
