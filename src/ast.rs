//! Clause-level AST for a single SELECT statement.
//!
//! Predicates (WHERE, HAVING, ON) are kept as raw text. Nothing here is
//! resolved against a schema.

use serde::{Deserialize, Serialize};

/// The statement kind. Only SELECT is supported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    #[default]
    Select,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Select => write!(f, "SELECT"),
        }
    }
}

/// Join flavour. A bare `JOIN` is `Inner`; `OUTER` is optional noise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JoinKind {
    #[default]
    Inner,
    Left,
    Right,
    Full,
}

impl JoinKind {
    /// The relational-algebra glyph for this join.
    pub fn symbol(self) -> &'static str {
        match self {
            JoinKind::Inner => "⋈",
            JoinKind::Left => "⟕",
            JoinKind::Right => "⟖",
            JoinKind::Full => "⟗",
        }
    }
}

impl std::fmt::Display for JoinKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JoinKind::Inner => write!(f, "INNER"),
            JoinKind::Left => write!(f, "LEFT"),
            JoinKind::Right => write!(f, "RIGHT"),
            JoinKind::Full => write!(f, "FULL"),
        }
    }
}

/// A single `<kind> JOIN <table> [alias] ON <condition>` clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Join {
    pub kind: JoinKind,
    pub table: String,
    /// Raw ON-predicate text.
    pub condition: String,
}

/// Sort direction for ORDER BY items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Parse `ASC`/`DESC` in any case.
    pub fn from_keyword(word: &str) -> Option<Self> {
        if word.eq_ignore_ascii_case("asc") {
            Some(SortDirection::Asc)
        } else if word.eq_ignore_ascii_case("desc") {
            Some(SortDirection::Desc)
        } else {
            None
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "ASC"),
            SortDirection::Desc => write!(f, "DESC"),
        }
    }
}

/// One ORDER BY item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub column: String,
    pub direction: SortDirection,
}

impl std::fmt::Display for OrderItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.column, self.direction)
    }
}

/// The clauses of one SELECT statement, in source order.
///
/// `conditions` and `having` hold at most one element each: the whole
/// predicate text. `columns == ["*"]` means no projection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedQuery {
    pub operation: Operation,
    /// `SELECT DISTINCT` was written. Has no algebra representation.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub distinct: bool,
    pub tables: Vec<String>,
    pub columns: Vec<String>,
    pub conditions: Vec<String>,
    pub joins: Vec<Join>,
    pub group_by: Vec<String>,
    pub order_by: Vec<OrderItem>,
    pub having: Vec<String>,
}

impl ParsedQuery {
    /// True when the select list is exactly the wildcard (or empty).
    pub fn is_wildcard(&self) -> bool {
        self.columns.is_empty() || (self.columns.len() == 1 && self.columns[0] == "*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_symbols() {
        assert_eq!(JoinKind::Inner.symbol(), "⋈");
        assert_eq!(JoinKind::Left.symbol(), "⟕");
        assert_eq!(JoinKind::Right.symbol(), "⟖");
        assert_eq!(JoinKind::Full.symbol(), "⟗");
    }

    #[test]
    fn test_sort_direction_keyword() {
        assert_eq!(SortDirection::from_keyword("desc"), Some(SortDirection::Desc));
        assert_eq!(SortDirection::from_keyword("ASC"), Some(SortDirection::Asc));
        assert_eq!(SortDirection::from_keyword("LIMIT"), None);
        assert_eq!(SortDirection::default(), SortDirection::Asc);
    }

    #[test]
    fn test_serialize_camel_case() {
        let query = ParsedQuery {
            tables: vec!["EMPLOYEE".to_string()],
            columns: vec!["*".to_string()],
            group_by: vec!["Department".to_string()],
            order_by: vec![OrderItem {
                column: "Name".to_string(),
                direction: SortDirection::Desc,
            }],
            ..Default::default()
        };
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["operation"], "SELECT");
        assert_eq!(json["groupBy"][0], "Department");
        assert_eq!(json["orderBy"][0]["direction"], "DESC");
        assert!(query.is_wildcard());
    }

    #[test]
    fn test_distinct_only_serialized_when_set() {
        let mut query = ParsedQuery::default();
        let json = serde_json::to_value(&query).unwrap();
        assert!(json.get("distinct").is_none());

        query.distinct = true;
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["distinct"], true);
    }
}
