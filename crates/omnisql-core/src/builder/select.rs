//! SELECT statement builder.

use super::{Predicate, Rendered, SqlWriter};
use crate::dialect::{Dialect, Pagination};
use crate::error::{Result, SpecError};

/// Join type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// `INNER JOIN`
    Inner,
    /// `LEFT JOIN`
    Left,
}

impl JoinKind {
    const fn as_sql(self) -> &'static str {
        match self {
            Self::Inner => " INNER JOIN ",
            Self::Left => " LEFT JOIN ",
        }
    }
}

/// A join against another source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    /// Join type.
    pub kind: JoinKind,
    /// Joined table.
    pub table: String,
    /// Raw ON condition.
    pub on: String,
}

/// One ORDER BY term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Column or expression.
    pub column: String,
    /// Sort descending.
    pub descending: bool,
}

/// Accumulated fragments of a SELECT statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectStatement {
    /// Source tables, comma-joined in FROM.
    pub sources: Vec<String>,
    /// Selected columns; empty selects `*`.
    pub columns: Vec<String>,
    /// SELECT DISTINCT.
    pub distinct: bool,
    /// Joins in registration order.
    pub joins: Vec<Join>,
    /// WHERE predicates, joined with AND.
    pub predicates: Vec<Predicate>,
    /// GROUP BY columns.
    pub group_by: Vec<String>,
    /// HAVING predicates, joined with AND.
    pub having: Vec<Predicate>,
    /// ORDER BY terms.
    pub order_by: Vec<OrderBy>,
    /// Maximum number of rows.
    pub limit: Option<u64>,
    /// Rows to skip; only rendered together with a limit.
    pub offset: Option<u64>,
}

/// SELECT builder bound to a dialect.
#[derive(Debug, Clone)]
pub struct Select<'d> {
    dialect: &'d dyn Dialect,
    stmt: SelectStatement,
}

impl<'d> Select<'d> {
    /// Creates an empty SELECT for the dialect.
    #[must_use]
    pub fn new(dialect: &'d dyn Dialect) -> Self {
        Self {
            dialect,
            stmt: SelectStatement::default(),
        }
    }

    /// Adds a source table.
    #[must_use]
    pub fn from(mut self, table: &str) -> Self {
        self.stmt.sources.push(String::from(table));
        self
    }

    /// Adds columns to the select list.
    #[must_use]
    pub fn columns(mut self, cols: &[&str]) -> Self {
        self.stmt.columns.extend(cols.iter().map(|c| String::from(*c)));
        self
    }

    /// Adds one column or expression to the select list.
    #[must_use]
    pub fn column(mut self, expr: &str) -> Self {
        self.stmt.columns.push(String::from(expr));
        self
    }

    /// Sets the DISTINCT flag.
    #[must_use]
    pub const fn distinct(mut self, distinct: bool) -> Self {
        self.stmt.distinct = distinct;
        self
    }

    /// Adds an INNER JOIN.
    #[must_use]
    pub fn join(self, table: &str, on: &str) -> Self {
        self.push_join(JoinKind::Inner, table, on)
    }

    /// Adds a LEFT JOIN.
    #[must_use]
    pub fn left_join(self, table: &str, on: &str) -> Self {
        self.push_join(JoinKind::Left, table, on)
    }

    fn push_join(mut self, kind: JoinKind, table: &str, on: &str) -> Self {
        self.stmt.joins.push(Join {
            kind,
            table: String::from(table),
            on: String::from(on),
        });
        self
    }

    /// Adds a WHERE predicate.
    #[must_use]
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.stmt.predicates.push(predicate);
        self
    }

    /// Adds GROUP BY columns.
    #[must_use]
    pub fn group_by(mut self, cols: &[&str]) -> Self {
        self.stmt.group_by.extend(cols.iter().map(|c| String::from(*c)));
        self
    }

    /// Adds a HAVING predicate.
    #[must_use]
    pub fn having(mut self, predicate: Predicate) -> Self {
        self.stmt.having.push(predicate);
        self
    }

    /// Adds an ascending ORDER BY term.
    #[must_use]
    pub fn order_by(self, column: &str) -> Self {
        self.push_order(column, false)
    }

    /// Adds a descending ORDER BY term.
    #[must_use]
    pub fn order_by_desc(self, column: &str) -> Self {
        self.push_order(column, true)
    }

    fn push_order(mut self, column: &str, descending: bool) -> Self {
        self.stmt.order_by.push(OrderBy {
            column: String::from(column),
            descending,
        });
        self
    }

    /// Sets the LIMIT.
    #[must_use]
    pub const fn limit(mut self, n: u64) -> Self {
        self.stmt.limit = Some(n);
        self
    }

    /// Sets the OFFSET.
    #[must_use]
    pub const fn offset(mut self, n: u64) -> Self {
        self.stmt.offset = Some(n);
        self
    }

    /// Returns the accumulated fragments.
    #[must_use]
    pub const fn statement(&self) -> &SelectStatement {
        &self.stmt
    }

    /// Renders the statement for the bound dialect.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::MissingSource`] when no source table was added.
    pub fn render(&self) -> Result<Rendered> {
        self.dialect.render_select(&self.stmt)
    }

    /// Renders the statement and returns only the SQL text.
    ///
    /// # Errors
    ///
    /// See [`Select::render`].
    pub fn sql(&self) -> Result<String> {
        self.render().map(|r| r.sql)
    }
}

/// Generic SELECT rendering shared by every dialect.
pub(crate) fn render<D: Dialect + ?Sized>(dialect: &D, stmt: &SelectStatement) -> Result<Rendered> {
    let sources: Vec<&str> = stmt
        .sources
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if sources.is_empty() {
        return Err(SpecError::MissingSource);
    }

    let descriptor = dialect.descriptor();
    let mut w = SqlWriter::new(descriptor);
    let offset = stmt.offset.unwrap_or(0);

    w.push_str("SELECT ");

    if let (Pagination::FirstSkip, Some(limit)) = (descriptor.pagination, stmt.limit) {
        w.push_str("FIRST ");
        w.count(limit);
        w.push_str(" SKIP ");
        w.count(offset);
        w.push_str(" ");
    }

    if stmt.distinct {
        w.push_str("DISTINCT ");
    }

    if stmt.columns.is_empty() {
        w.push_str("*");
    } else {
        w.push_str(&stmt.columns.join(", "));
    }

    w.push_str(" FROM ");
    w.push_str(&sources.join(", "));

    for join in &stmt.joins {
        w.push_str(join.kind.as_sql());
        w.push_str(&join.table);
        w.push_str(" ON ");
        w.push_str(&join.on);
    }

    w.where_clause(&stmt.predicates);

    if !stmt.group_by.is_empty() {
        w.push_str(" GROUP BY ");
        w.push_str(&stmt.group_by.join(", "));
    }

    w.conjunction(" HAVING ", &stmt.having);

    if !stmt.order_by.is_empty() {
        let terms: Vec<String> = stmt
            .order_by
            .iter()
            .map(|o| {
                if o.descending {
                    format!("{} DESC", o.column)
                } else {
                    o.column.clone()
                }
            })
            .collect();
        w.push_str(" ORDER BY ");
        w.push_str(&terms.join(", "));
    }

    match (descriptor.pagination, stmt.limit) {
        (Pagination::OffsetFetch, Some(limit)) => {
            if stmt.order_by.is_empty() {
                w.push_str(" ORDER BY 1");
            }
            w.push_str(" OFFSET ");
            w.count(offset);
            w.push_str(" ROWS FETCH NEXT ");
            w.count(limit);
            w.push_str(" ROWS ONLY");
        }
        (Pagination::LimitOffset, Some(limit)) => {
            w.push_str(" LIMIT ");
            w.count(limit);
            w.push_str(" OFFSET ");
            w.count(offset);
        }
        _ => {}
    }

    Ok(w.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::col;
    use crate::dialect::{MsSql, Sqlite};
    use crate::value::SqlValue;

    #[test]
    fn test_simple_select() {
        let dialect = Sqlite::new();
        let sql = Select::new(&dialect)
            .columns(&["id", "name"])
            .from("users")
            .sql()
            .unwrap();
        assert_eq!(sql, "SELECT id, name FROM users");
    }

    #[test]
    fn test_select_star_and_multiple_sources() {
        let dialect = Sqlite::new();
        let sql = Select::new(&dialect).from("a").from("b").sql().unwrap();
        assert_eq!(sql, "SELECT * FROM a, b");
    }

    #[test]
    fn test_missing_source() {
        let dialect = Sqlite::new();
        assert_eq!(
            Select::new(&dialect).columns(&["id"]).render(),
            Err(SpecError::MissingSource)
        );
        assert_eq!(
            Select::new(&dialect).from("  ").render(),
            Err(SpecError::MissingSource)
        );
    }

    #[test]
    fn test_clause_order_is_independent_of_call_order() {
        let dialect = Sqlite::new();
        let a = Select::new(&dialect)
            .order_by("name")
            .filter(col("active").eq(true))
            .group_by(&["name"])
            .distinct(true)
            .column("name")
            .from("users")
            .render()
            .unwrap();
        let b = Select::new(&dialect)
            .from("users")
            .column("name")
            .distinct(true)
            .filter(col("active").eq(true))
            .group_by(&["name"])
            .order_by("name")
            .render()
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(
            a.sql,
            "SELECT DISTINCT name FROM users WHERE active = ? GROUP BY name ORDER BY name"
        );
    }

    #[test]
    fn test_multiple_filters_joined_with_and() {
        let dialect = Sqlite::new();
        let rendered = Select::new(&dialect)
            .from("users")
            .filter(col("active").eq(true))
            .filter(col("role").eq("admin").or(col("role").eq("owner")))
            .render()
            .unwrap();
        assert_eq!(
            rendered.sql,
            "SELECT * FROM users WHERE active = ? AND (role = ? OR role = ?)"
        );
        assert_eq!(rendered.params.len(), 3);
    }

    #[test]
    fn test_joins_and_having() {
        let dialect = Sqlite::new();
        let rendered = Select::new(&dialect)
            .columns(&["u.id", "COUNT(o.id)"])
            .from("users u")
            .left_join("orders o", "o.user_id = u.id")
            .group_by(&["u.id"])
            .having(Predicate::raw("COUNT(o.id) > 1"))
            .order_by_desc("u.id")
            .render()
            .unwrap();
        assert_eq!(
            rendered.sql,
            "SELECT u.id, COUNT(o.id) FROM users u LEFT JOIN orders o ON o.user_id = u.id \
             GROUP BY u.id HAVING COUNT(o.id) > 1 ORDER BY u.id DESC"
        );
    }

    #[test]
    fn test_limit_offset_trailing() {
        let dialect = Sqlite::new();
        let rendered = Select::new(&dialect).from("t").limit(5).render().unwrap();
        assert_eq!(rendered.sql, "SELECT * FROM t LIMIT ? OFFSET ?");
        assert_eq!(rendered.params, vec![SqlValue::Int(5), SqlValue::Int(0)]);
    }

    #[test]
    fn test_offset_without_limit_is_ignored() {
        let dialect = MsSql::new();
        let rendered = Select::new(&dialect).from("t").offset(5).render().unwrap();
        assert_eq!(rendered.sql, "SELECT * FROM t");
        assert!(rendered.params.is_empty());
    }

    #[test]
    fn test_offset_fetch_keeps_explicit_order() {
        let dialect = MsSql::new();
        let rendered = Select::new(&dialect)
            .from("t")
            .order_by("id")
            .limit(10)
            .render()
            .unwrap();
        assert_eq!(
            rendered.sql,
            "SELECT * FROM t ORDER BY id OFFSET ? ROWS FETCH NEXT ? ROWS ONLY"
        );
        assert_eq!(rendered.params, vec![SqlValue::Int(0), SqlValue::Int(10)]);
    }

    #[test]
    fn test_render_does_not_mutate() {
        let dialect = MsSql::new();
        let select = Select::new(&dialect).from("t").limit(1);
        let before = select.statement().clone();
        let first = select.render().unwrap();
        let second = select.render().unwrap();
        assert_eq!(first, second);
        assert_eq!(select.statement(), &before);
    }
}
