//! UPDATE statement builder.

use super::{target, Predicate, Rendered, SqlWriter};
use crate::dialect::Dialect;
use crate::error::{Result, SpecError};
use crate::value::{SqlValue, ToSqlValue};

/// Accumulated fragments of an UPDATE statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateStatement {
    /// Target table.
    pub table: Option<String>,
    /// Column bindings in first-bound order.
    pub assignments: Vec<(String, SqlValue)>,
    /// WHERE predicates, joined with AND.
    pub predicates: Vec<Predicate>,
}

/// UPDATE builder bound to a dialect.
#[derive(Debug, Clone)]
pub struct Update<'d> {
    dialect: &'d dyn Dialect,
    stmt: UpdateStatement,
}

impl<'d> Update<'d> {
    /// Creates an empty UPDATE for the dialect.
    #[must_use]
    pub fn new(dialect: &'d dyn Dialect) -> Self {
        Self {
            dialect,
            stmt: UpdateStatement::default(),
        }
    }

    /// Sets the target table.
    #[must_use]
    pub fn table(mut self, table: &str) -> Self {
        self.stmt.table = Some(String::from(table));
        self
    }

    /// Binds a column to a new value. Binding a column twice keeps the later value.
    #[must_use]
    pub fn set<T: ToSqlValue>(mut self, column: &str, value: T) -> Self {
        let value = value.to_sql_value();
        match self.stmt.assignments.iter_mut().find(|(c, _)| c == column) {
            Some((_, slot)) => *slot = value,
            None => self.stmt.assignments.push((String::from(column), value)),
        }
        self
    }

    /// Adds a WHERE predicate.
    #[must_use]
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.stmt.predicates.push(predicate);
        self
    }

    /// Returns the accumulated fragments.
    #[must_use]
    pub const fn statement(&self) -> &UpdateStatement {
        &self.stmt
    }

    /// Renders the statement for the bound dialect.
    ///
    /// # Errors
    ///
    /// Fails when no table or no assignments were given.
    pub fn render(&self) -> Result<Rendered> {
        self.dialect.render_update(&self.stmt)
    }

    /// Renders the statement and returns only the SQL text.
    ///
    /// # Errors
    ///
    /// See [`Update::render`].
    pub fn sql(&self) -> Result<String> {
        self.render().map(|r| r.sql)
    }
}

pub(crate) fn render<D: Dialect + ?Sized>(dialect: &D, stmt: &UpdateStatement) -> Result<Rendered> {
    let table = target(stmt.table.as_ref()).ok_or(SpecError::MissingName)?;
    if stmt.assignments.is_empty() {
        return Err(SpecError::MissingValues("UPDATE"));
    }

    let mut w = SqlWriter::new(dialect.descriptor());
    w.push_str("UPDATE ");
    w.push_str(table);
    w.push_str(" SET ");
    for (i, (column, value)) in stmt.assignments.iter().enumerate() {
        if i > 0 {
            w.push_str(", ");
        }
        w.push_str(column);
        w.push_str(" = ");
        w.bind(value.clone());
    }
    w.where_clause(&stmt.predicates);
    Ok(w.finish())
}
