//! DELETE statement builder.

use super::{target, Predicate, Rendered, SqlWriter};
use crate::dialect::Dialect;
use crate::error::{Result, SpecError};

/// Accumulated fragments of a DELETE statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteStatement {
    /// Target table.
    pub table: Option<String>,
    /// WHERE predicates, joined with AND.
    pub predicates: Vec<Predicate>,
}

/// DELETE builder bound to a dialect.
#[derive(Debug, Clone)]
pub struct Delete<'d> {
    dialect: &'d dyn Dialect,
    stmt: DeleteStatement,
}

impl<'d> Delete<'d> {
    /// Creates an empty DELETE for the dialect.
    #[must_use]
    pub fn new(dialect: &'d dyn Dialect) -> Self {
        Self {
            dialect,
            stmt: DeleteStatement::default(),
        }
    }

    /// Sets the target table.
    #[must_use]
    pub fn from(mut self, table: &str) -> Self {
        self.stmt.table = Some(String::from(table));
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
    pub const fn statement(&self) -> &DeleteStatement {
        &self.stmt
    }

    /// Renders the statement for the bound dialect.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::MissingName`] when no table was given.
    pub fn render(&self) -> Result<Rendered> {
        self.dialect.render_delete(&self.stmt)
    }

    /// Renders the statement and returns only the SQL text.
    ///
    /// # Errors
    ///
    /// See [`Delete::render`].
    pub fn sql(&self) -> Result<String> {
        self.render().map(|r| r.sql)
    }
}

pub(crate) fn render<D: Dialect + ?Sized>(dialect: &D, stmt: &DeleteStatement) -> Result<Rendered> {
    let table = target(stmt.table.as_ref()).ok_or(SpecError::MissingName)?;
    let mut w = SqlWriter::new(dialect.descriptor());
    w.push_str("DELETE FROM ");
    w.push_str(table);
    w.where_clause(&stmt.predicates);
    Ok(w.finish())
}
