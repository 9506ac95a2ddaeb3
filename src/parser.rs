//! Clause extractor.
//!
//! Pulls the SELECT list, FROM list, JOINs, WHERE, GROUP BY, HAVING and
//! ORDER BY out of a single statement. The input is tokenized first and
//! clause keywords are only recognised at parenthesis depth 0, so a
//! `FROM` inside a string literal or a sub-expression never ends a clause.
//!
//! ```text
//! SELECT e.Name FROM EMPLOYEE e JOIN DEPARTMENT d ON e.DeptID = d.ID WHERE ...
//! ──┬─── ──┬─── ──────┬──────── ───────────────┬─────────────────── ───┬─────
//!   │      │          │                        │                       └── conditions
//!   │      │          │                        └── joins (kind, table, raw ON text)
//!   │      │          └── tables (alias dropped)
//!   │      └── columns (qualifier and alias dropped)
//!   └── operation
//! ```
//!
//! Predicates are never decomposed; they are sliced out of the source
//! verbatim. Extraction only fails when there is no SELECT list or no
//! FROM list.

use std::ops::Range;

use crate::ast::*;
use crate::error::NotParseable;
use crate::lexer::{first_token, strip_comments, tokenize, Token, TokenKind};

/// Words that never act as a column alias, nor as the expression an
/// alias would follow.
const RESERVED: &[&str] = &[
    "ALL", "AND", "AS", "BETWEEN", "CASE", "DISTINCT", "ELSE", "END", "FALSE", "IN", "IS",
    "LIKE", "NOT", "NULL", "OR", "THEN", "TRUE", "WHEN",
];

/// Extract the clauses of a SELECT statement.
///
/// # Example
///
/// ```
/// use sqlra::parser::extract;
///
/// let query = extract("SELECT Name FROM EMPLOYEE WHERE Salary > 10").unwrap();
/// assert_eq!(query.tables, vec!["EMPLOYEE"]);
/// assert_eq!(query.columns, vec!["Name"]);
/// assert_eq!(query.conditions, vec!["Salary > 10"]);
/// ```
pub fn extract(text: &str) -> Result<ParsedQuery, NotParseable> {
    // The statement itself must open with SELECT; a leading comment does not count.
    if !first_token(text).is_some_and(|t| t.is_keyword("SELECT")) {
        return Err(NotParseable);
    }
    let source = strip_comments(text);
    let tokens = tokenize(&source);
    Extractor::new(&source, &tokens).extract()
}

struct Extractor<'s, 't> {
    source: &'s str,
    tokens: &'t [Token<'s>],
    /// Parenthesis depth of each token; `(` and `)` sit at the outer depth.
    depths: Vec<usize>,
}

impl<'s, 't> Extractor<'s, 't> {
    fn new(source: &'s str, tokens: &'t [Token<'s>]) -> Self {
        let mut depths = Vec::with_capacity(tokens.len());
        let mut depth = 0usize;
        for token in tokens {
            match token.kind {
                TokenKind::LParen => {
                    depths.push(depth);
                    depth += 1;
                }
                TokenKind::RParen => {
                    depth = depth.saturating_sub(1);
                    depths.push(depth);
                }
                _ => depths.push(depth),
            }
        }

        // A single statement: stop at the first top-level `;`.
        let end = (0..tokens.len())
            .find(|&i| depths[i] == 0 && tokens[i].kind == TokenKind::Semicolon)
            .unwrap_or(tokens.len());
        depths.truncate(end);

        Self {
            source,
            tokens: &tokens[..end],
            depths,
        }
    }

    fn extract(&self) -> Result<ParsedQuery, NotParseable> {
        if !self.tokens.first().is_some_and(|t| t.is_keyword("SELECT")) {
            return Err(NotParseable);
        }

        let (distinct, list_start) = match self.tokens.get(1) {
            Some(t) if t.is_keyword("DISTINCT") => (true, 2),
            Some(t) if t.is_keyword("ALL") => (false, 2),
            _ => (false, 1),
        };

        let from = self
            .find(list_start, |i| self.keyword_at(i, "FROM"))
            .ok_or(NotParseable)?;

        let columns: Vec<String> = self
            .split_commas(list_start..from)
            .into_iter()
            .map(|item| self.select_item(item))
            .filter(|c| !c.is_empty())
            .collect();
        if columns.is_empty() {
            return Err(NotParseable);
        }

        let from_end = self
            .find(from + 1, |i| {
                self.keyword_at(i, "WHERE")
                    || self.join_at(i).is_some()
                    || self.group_by_at(i)
                    || self.order_by_at(i)
                    || self.keyword_at(i, "HAVING")
            })
            .unwrap_or(self.len());

        let tables: Vec<String> = self
            .split_commas(from + 1..from_end)
            .into_iter()
            .filter_map(|item| self.table_name(item))
            .collect();
        if tables.is_empty() {
            return Err(NotParseable);
        }

        Ok(ParsedQuery {
            operation: Operation::Select,
            distinct,
            tables,
            columns,
            conditions: self.where_clause(from_end),
            joins: self.joins(from_end),
            group_by: self.group_by(from_end),
            order_by: self.order_by(from_end),
            having: self.having(from_end),
        })
    }

    /// WHERE runs to GROUP BY, ORDER BY, HAVING or the end.
    fn where_clause(&self, from: usize) -> Vec<String> {
        let Some(start) = self.find(from, |i| self.keyword_at(i, "WHERE")) else {
            return Vec::new();
        };
        let end = self
            .find(start + 1, |i| {
                self.group_by_at(i) || self.order_by_at(i) || self.keyword_at(i, "HAVING")
            })
            .unwrap_or(self.len());
        self.predicate(start + 1..end)
    }

    /// HAVING runs to ORDER BY or the end.
    fn having(&self, from: usize) -> Vec<String> {
        let Some(start) = self.find(from, |i| self.keyword_at(i, "HAVING")) else {
            return Vec::new();
        };
        let end = self
            .find(start + 1, |i| self.order_by_at(i))
            .unwrap_or(self.len());
        self.predicate(start + 1..end)
    }

    /// GROUP BY runs to HAVING, ORDER BY or the end.
    fn group_by(&self, from: usize) -> Vec<String> {
        let Some(start) = self.find(from, |i| self.group_by_at(i)) else {
            return Vec::new();
        };
        let end = self
            .find(start + 2, |i| self.keyword_at(i, "HAVING") || self.order_by_at(i))
            .unwrap_or(self.len());
        self.split_commas(start + 2..end)
            .into_iter()
            .map(|item| self.slice(item).to_string())
            .collect()
    }

    /// ORDER BY runs to the end of the statement. Each item is
    /// `column [ASC|DESC] ...`; anything past the second word is ignored.
    fn order_by(&self, from: usize) -> Vec<OrderItem> {
        let Some(start) = self.find(from, |i| self.order_by_at(i)) else {
            return Vec::new();
        };
        self.split_commas(start + 2..self.len())
            .into_iter()
            .filter_map(|item| {
                let mut words = self.slice(item).split_whitespace();
                let column = words.next()?.to_string();
                let direction = words
                    .next()
                    .and_then(SortDirection::from_keyword)
                    .unwrap_or_default();
                Some(OrderItem { column, direction })
            })
            .collect()
    }

    /// Every well-formed `<kind> JOIN <table> [[AS] alias] ON <condition>`,
    /// left to right. Anything else that starts with a join keyword is
    /// skipped.
    fn joins(&self, from: usize) -> Vec<Join> {
        let mut joins = Vec::new();
        let mut i = from;

        while i < self.len() {
            let Some((kind, after)) = self.join_at(i) else {
                i += 1;
                continue;
            };
            match self.join_body(kind, after) {
                Ok((join, next)) => {
                    joins.push(join);
                    i = next;
                }
                Err(next) => i = next,
            }
        }

        joins
    }

    /// Parse what follows a join keyword. On failure returns the index to
    /// resume scanning from.
    fn join_body(&self, kind: JoinKind, start: usize) -> Result<(Join, usize), usize> {
        let table_end = self.name_path(start).ok_or(start)?;
        let table = self.slice(start..table_end).to_string();

        let mut i = table_end;
        if self.keyword_at(i, "AS") {
            i += 1;
        }
        if self.tokens.get(i).is_some_and(|t| t.is_name()) && !self.keyword_at(i, "ON") {
            i += 1;
        }
        if !self.keyword_at(i, "ON") {
            return Err(i);
        }

        let end = self
            .find(i + 1, |k| {
                self.join_at(k).is_some()
                    || self.keyword_at(k, "WHERE")
                    || self.group_by_at(k)
                    || self.order_by_at(k)
                    || self.keyword_at(k, "HAVING")
            })
            .unwrap_or(self.len());
        if end <= i + 1 {
            return Err(end);
        }

        let condition = self.slice(i + 1..end).to_string();
        Ok((
            Join {
                kind,
                table,
                condition,
            },
            end,
        ))
    }

    /// Recognise a join keyword phrase at `i`, returning its kind and the
    /// index just past `JOIN`.
    fn join_at(&self, i: usize) -> Option<(JoinKind, usize)> {
        if self.keyword_at(i, "JOIN") {
            return Some((JoinKind::Inner, i + 1));
        }
        let kind = if self.keyword_at(i, "INNER") {
            JoinKind::Inner
        } else if self.keyword_at(i, "LEFT") {
            JoinKind::Left
        } else if self.keyword_at(i, "RIGHT") {
            JoinKind::Right
        } else if self.keyword_at(i, "FULL") {
            JoinKind::Full
        } else {
            return None;
        };

        let mut next = i + 1;
        if kind != JoinKind::Inner && self.keyword_at(next, "OUTER") {
            next += 1;
        }
        self.keyword_at(next, "JOIN").then_some((kind, next + 1))
    }

    fn group_by_at(&self, i: usize) -> bool {
        self.keyword_at(i, "GROUP") && self.keyword_at(i + 1, "BY")
    }

    fn order_by_at(&self, i: usize) -> bool {
        self.keyword_at(i, "ORDER") && self.keyword_at(i + 1, "BY")
    }

    fn keyword_at(&self, i: usize, keyword: &str) -> bool {
        i < self.len() && self.depths[i] == 0 && self.tokens[i].is_keyword(keyword)
    }

    /// First index at or after `start` satisfying `pred`.
    fn find(&self, start: usize, pred: impl Fn(usize) -> bool) -> Option<usize> {
        (start..self.len()).find(|&i| pred(i))
    }

    fn len(&self) -> usize {
        self.tokens.len()
    }

    /// `name(.name)*` starting at `i`; returns the index past the path.
    fn name_path(&self, i: usize) -> Option<usize> {
        if !self.tokens.get(i).is_some_and(|t| t.is_name()) {
            return None;
        }
        let mut end = i + 1;
        while end + 1 < self.len()
            && self.tokens[end].kind == TokenKind::Dot
            && self.tokens[end + 1].is_name()
        {
            end += 2;
        }
        Some(end)
    }

    /// Split a token range on commas at depth 0, dropping empty items.
    fn split_commas(&self, range: Range<usize>) -> Vec<Range<usize>> {
        let mut items = Vec::new();
        let mut item_start = range.start;
        for i in range.clone() {
            if self.depths[i] == 0 && self.tokens[i].kind == TokenKind::Comma {
                items.push(item_start..i);
                item_start = i + 1;
            }
        }
        items.push(item_start..range.end);
        items.retain(|item| !item.is_empty());
        items
    }

    /// Source text spanned by a token range.
    fn slice(&self, range: Range<usize>) -> &'s str {
        if range.is_empty() {
            return "";
        }
        &self.source[self.tokens[range.start].start..self.tokens[range.end - 1].end]
    }

    fn predicate(&self, range: Range<usize>) -> Vec<String> {
        let text = self.slice(range);
        if text.is_empty() {
            Vec::new()
        } else {
            vec![text.to_string()]
        }
    }

    /// A FROM item's table: the leading name path, alias dropped.
    fn table_name(&self, item: Range<usize>) -> Option<String> {
        match self.name_path(item.start) {
            Some(end) if end <= item.end => Some(self.slice(item.start..end).to_string()),
            _ => self
                .slice(item)
                .split_whitespace()
                .next()
                .map(str::to_string),
        }
    }

    /// A SELECT item with its alias and every `qualifier.` prefix removed.
    fn select_item(&self, item: Range<usize>) -> String {
        let end = self.alias_start(item.clone()).unwrap_or(item.end);
        let tokens = &self.tokens[item.start..end];

        let mut out = String::new();
        let mut cursor: Option<usize> = None;
        let mut gap_end: Option<usize> = None;
        let mut k = 0;

        while k < tokens.len() {
            let qualifier = tokens[k].is_name()
                && tokens.get(k + 1).is_some_and(|t| t.kind == TokenKind::Dot)
                && tokens
                    .get(k + 2)
                    .is_some_and(|t| t.is_name() || t.kind == TokenKind::Star);
            if qualifier {
                gap_end.get_or_insert(tokens[k].start);
                k += 2;
                continue;
            }

            let token = tokens[k];
            if let Some(c) = cursor {
                out.push_str(&self.source[c..gap_end.unwrap_or(token.start)]);
            }
            out.push_str(token.text);
            cursor = Some(token.end);
            gap_end = None;
            k += 1;
        }

        out
    }

    /// Where the alias of a SELECT item begins: at a top-level `AS`, or a
    /// trailing bare name that directly follows an operand.
    fn alias_start(&self, item: Range<usize>) -> Option<usize> {
        if let Some(i) = (item.start + 1..item.end).find(|&i| self.keyword_at(i, "AS")) {
            return Some(i);
        }
        if item.len() < 2 {
            return None;
        }

        let last = &self.tokens[item.end - 1];
        let prev = &self.tokens[item.end - 2];
        let is_reserved = |t: &Token| {
            t.kind == TokenKind::Word && RESERVED.iter().any(|r| t.text.eq_ignore_ascii_case(r))
        };

        let alias_like = last.is_name() && !is_reserved(last);
        let follows_operand = match prev.kind {
            TokenKind::Word => !is_reserved(prev),
            TokenKind::QuotedIdent
            | TokenKind::RParen
            | TokenKind::Str
            | TokenKind::Number
            | TokenKind::Star => true,
            _ => false,
        };

        (alias_like && follows_operand && self.depths[item.end - 1] == 0).then_some(item.end - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn join(kind: JoinKind, table: &str, condition: &str) -> Join {
        Join {
            kind,
            table: table.to_string(),
            condition: condition.to_string(),
        }
    }

    #[test]
    fn test_simple_select() {
        let query = extract("SELECT * FROM EMPLOYEE").unwrap();
        assert_eq!(query.operation, Operation::Select);
        assert_eq!(query.tables, vec!["EMPLOYEE"]);
        assert_eq!(query.columns, vec!["*"]);
        assert!(query.conditions.is_empty());
        assert!(query.joins.is_empty());
        assert!(query.group_by.is_empty());
        assert!(query.order_by.is_empty());
        assert!(query.having.is_empty());
    }

    #[test]
    fn test_not_select() {
        assert_eq!(extract("UPDATE t SET a = 1"), Err(NotParseable));
        assert_eq!(extract(""), Err(NotParseable));
        assert_eq!(extract("   "), Err(NotParseable));
        assert_eq!(extract("'SELECT' * FROM t"), Err(NotParseable));
    }

    #[test]
    fn test_missing_from_or_lists() {
        assert_eq!(extract("SELECT 1"), Err(NotParseable));
        assert_eq!(extract("SELECT FROM t"), Err(NotParseable));
        assert_eq!(extract("SELECT a FROM"), Err(NotParseable));
        assert_eq!(extract("SELECT a FROM WHERE x = 1"), Err(NotParseable));
    }

    #[test]
    fn test_case_insensitive_keywords() {
        let query = extract("  select name from emp where id = 3 order by name desc;").unwrap();
        assert_eq!(query.tables, vec!["emp"]);
        assert_eq!(query.columns, vec!["name"]);
        assert_eq!(query.conditions, vec!["id = 3"]);
        assert_eq!(query.order_by[0].direction, SortDirection::Desc);
    }

    #[test]
    fn test_distinct_is_recognised() {
        let query = extract("SELECT DISTINCT Department FROM EMPLOYEE").unwrap();
        assert!(query.distinct);
        assert_eq!(query.columns, vec!["Department"]);
    }

    #[test]
    fn test_select_items_drop_qualifier_and_alias() {
        let query = extract(
            "SELECT e.Name AS n, d.DepartmentName dept, COUNT(*) total, SUM(e.Salary) FROM EMPLOYEE e",
        )
        .unwrap();
        assert_eq!(
            query.columns,
            vec!["Name", "DepartmentName", "COUNT(*)", "SUM(Salary)"]
        );
    }

    #[test]
    fn test_select_expression_kept() {
        let query = extract(
            "SELECT Salary * 12, CASE WHEN a > 1 THEN 'x' ELSE 'y' END, COALESCE(a, b) FROM t",
        )
        .unwrap();
        assert_eq!(
            query.columns,
            vec![
                "Salary * 12",
                "CASE WHEN a > 1 THEN 'x' ELSE 'y' END",
                "COALESCE(a, b)"
            ]
        );
    }

    #[test]
    fn test_from_list_drops_aliases() {
        let query = extract("SELECT * FROM EMPLOYEE e, DEPARTMENT AS d, dbo.PROJECT").unwrap();
        assert_eq!(query.tables, vec!["EMPLOYEE", "DEPARTMENT", "dbo.PROJECT"]);
    }

    #[test]
    fn test_joins_in_order() {
        let query = extract(
            "SELECT * FROM A a \
             JOIN B b ON a.id = b.a_id \
             LEFT OUTER JOIN C ON b.id = C.b_id \
             RIGHT JOIN D AS d ON d.id = a.d_id \
             FULL JOIN E ON E.x = a.x \
             INNER JOIN F f ON f.y = a.y",
        )
        .unwrap();
        assert_eq!(query.tables, vec!["A"]);
        assert_eq!(
            query.joins,
            vec![
                join(JoinKind::Inner, "B", "a.id = b.a_id"),
                join(JoinKind::Left, "C", "b.id = C.b_id"),
                join(JoinKind::Right, "D", "d.id = a.d_id"),
                join(JoinKind::Full, "E", "E.x = a.x"),
                join(JoinKind::Inner, "F", "f.y = a.y"),
            ]
        );
    }

    #[test]
    fn test_join_condition_stops_at_where() {
        let query = extract(
            "SELECT * FROM A JOIN B ON A.id = B.id AND B.ok = 1 WHERE A.x > 2 GROUP BY A.x",
        )
        .unwrap();
        assert_eq!(query.joins[0].condition, "A.id = B.id AND B.ok = 1");
        assert_eq!(query.conditions, vec!["A.x > 2"]);
        assert_eq!(query.group_by, vec!["A.x"]);
    }

    #[test]
    fn test_malformed_joins_dropped() {
        let query = extract("SELECT * FROM A JOIN B USING (id) LEFT JOIN C ON A.c = C.id").unwrap();
        assert_eq!(query.joins, vec![join(JoinKind::Left, "C", "A.c = C.id")]);

        let query = extract("SELECT * FROM A JOIN B ON WHERE x = 1").unwrap();
        assert!(query.joins.is_empty());
        assert_eq!(query.conditions, vec!["x = 1"]);
    }

    #[test]
    fn test_where_keeps_raw_text() {
        let query =
            extract("SELECT * FROM t WHERE (a = 1 OR b  =  2) AND note = 'ORDER BY me'").unwrap();
        assert_eq!(
            query.conditions,
            vec!["(a = 1 OR b  =  2) AND note = 'ORDER BY me'"]
        );
        assert!(query.order_by.is_empty());
    }

    #[test]
    fn test_group_by_having_order_by() {
        let query = extract(
            "SELECT Department, COUNT(*) FROM EMPLOYEE \
             WHERE Salary > 1000 \
             GROUP BY Department, Location \
             HAVING COUNT(*) > 5 \
             ORDER BY Department DESC, Location",
        )
        .unwrap();
        assert_eq!(query.conditions, vec!["Salary > 1000"]);
        assert_eq!(query.group_by, vec!["Department", "Location"]);
        assert_eq!(query.having, vec!["COUNT(*) > 5"]);
        assert_eq!(
            query.order_by,
            vec![
                OrderItem {
                    column: "Department".to_string(),
                    direction: SortDirection::Desc,
                },
                OrderItem {
                    column: "Location".to_string(),
                    direction: SortDirection::Asc,
                },
            ]
        );
    }

    #[test]
    fn test_order_by_ignores_trailing_words() {
        let query = extract("SELECT * FROM t ORDER BY a asc, b NULLS FIRST LIMIT 5").unwrap();
        assert_eq!(query.order_by[0].direction, SortDirection::Asc);
        assert_eq!(query.order_by[1].column, "b");
        assert_eq!(query.order_by[1].direction, SortDirection::Asc);
        assert_eq!(query.order_by.len(), 2);
    }

    #[test]
    fn test_keywords_in_parens_are_not_boundaries() {
        let query = extract(
            "SELECT a FROM t WHERE a IN (SELECT b FROM u WHERE c = 1 ORDER BY c) ORDER BY a",
        )
        .unwrap();
        assert_eq!(
            query.conditions,
            vec!["a IN (SELECT b FROM u WHERE c = 1 ORDER BY c)"]
        );
        assert_eq!(query.order_by.len(), 1);
        assert_eq!(query.order_by[0].column, "a");
    }

    #[test]
    fn test_statement_ends_at_semicolon() {
        let query = extract("SELECT a FROM t ORDER BY a; DROP TABLE t").unwrap();
        assert_eq!(query.order_by.len(), 1);
        assert_eq!(query.order_by[0].column, "a");
    }

    #[test]
    fn test_comments_stripped() {
        let query = extract("SELECT Name /* pk */ FROM EMPLOYEE -- all\nWHERE id > 1").unwrap();
        assert_eq!(query.columns, vec!["Name"]);
        assert_eq!(query.tables, vec!["EMPLOYEE"]);
        assert_eq!(query.conditions, vec!["id > 1"]);
    }

    #[test]
    fn test_leading_comment_is_not_parseable() {
        assert_eq!(extract("-- list staff\nSELECT Name FROM EMPLOYEE"), Err(NotParseable));
        assert_eq!(extract("  /* c */ SELECT * FROM t"), Err(NotParseable));
        assert!(extract("SELECT/* c */* FROM t").is_ok());
    }

    #[test]
    fn test_fresh_instance_per_call() {
        let a = extract("SELECT x FROM t").unwrap();
        let b = extract("SELECT x FROM t").unwrap();
        assert_eq!(a, b);
    }
}
