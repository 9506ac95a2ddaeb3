//! Symbol legend for rendered algebra.

/// One glyph that can appear in rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    pub glyph: &'static str,
    pub name: &'static str,
    pub meaning: &'static str,
    /// The SQL construct that produces it.
    pub sql: &'static str,
}

/// Every glyph the renderer emits, in the order operators nest.
pub const SYMBOLS: &[Symbol] = &[
    Symbol {
        glyph: "×",
        name: "Cartesian product",
        meaning: "Pairs every row of one relation with every row of another",
        sql: "FROM A, B",
    },
    Symbol {
        glyph: "⋈",
        name: "Join",
        meaning: "Keeps row pairs that satisfy the condition",
        sql: "[INNER] JOIN ... ON",
    },
    Symbol {
        glyph: "⟕",
        name: "Left outer join",
        meaning: "Join, also keeping unmatched rows from the left",
        sql: "LEFT [OUTER] JOIN",
    },
    Symbol {
        glyph: "⟖",
        name: "Right outer join",
        meaning: "Join, also keeping unmatched rows from the right",
        sql: "RIGHT [OUTER] JOIN",
    },
    Symbol {
        glyph: "⟗",
        name: "Full outer join",
        meaning: "Join, keeping unmatched rows from both sides",
        sql: "FULL [OUTER] JOIN",
    },
    Symbol {
        glyph: "σ",
        name: "Selection",
        meaning: "Filters rows by a predicate",
        sql: "WHERE / HAVING",
    },
    Symbol {
        glyph: "γ",
        name: "Grouping",
        meaning: "Partitions rows by shared column values",
        sql: "GROUP BY",
    },
    Symbol {
        glyph: "π",
        name: "Projection",
        meaning: "Keeps a subset of columns",
        sql: "SELECT a, b",
    },
    Symbol {
        glyph: "τ",
        name: "Sort",
        meaning: "Orders rows (not part of classic relational algebra)",
        sql: "ORDER BY",
    },
    Symbol {
        glyph: "∧",
        name: "Logical AND",
        meaning: "Conjunction of predicates",
        sql: "AND",
    },
];

/// Look up a glyph.
pub fn lookup(glyph: &str) -> Option<&'static Symbol> {
    SYMBOLS.iter().find(|s| s.glyph == glyph)
}

/// The legend entries for glyphs that occur in `rendered`, in legend order.
pub fn used_in(rendered: &str) -> Vec<&'static Symbol> {
    SYMBOLS.iter().filter(|s| rendered.contains(s.glyph)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::JoinKind;

    #[test]
    fn test_every_join_symbol_documented() {
        for kind in [JoinKind::Inner, JoinKind::Left, JoinKind::Right, JoinKind::Full] {
            assert!(lookup(kind.symbol()).is_some(), "{kind} missing");
        }
        assert_eq!(lookup("σ").map(|s| s.name), Some("Selection"));
        assert!(lookup("?").is_none());
    }

    #[test]
    fn test_used_in() {
        let glyphs: Vec<&str> = used_in("π[a](σ[x ∧ y](R))").iter().map(|s| s.glyph).collect();
        assert_eq!(glyphs, vec!["σ", "π", "∧"]);
    }
}
