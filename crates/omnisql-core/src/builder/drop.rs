//! DROP TABLE / DROP DATABASE builder.

use tracing::debug;

use super::{target, unqualified, Rendered};
use crate::dialect::Dialect;
use crate::error::{Result, SpecError};

/// Kind of object being dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ObjectKind {
    /// A table.
    #[default]
    Table,
    /// A database.
    Database,
}

impl ObjectKind {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Table => "TABLE",
            Self::Database => "DATABASE",
        }
    }
}

/// Accumulated fragments of a DROP statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropStatement {
    /// Object kind.
    pub kind: ObjectKind,
    /// Object name.
    pub name: Option<String>,
    /// Skip silently when the object does not exist.
    pub if_exists: bool,
}

/// DROP builder bound to a dialect.
#[derive(Debug, Clone)]
pub struct DropObject<'d> {
    dialect: &'d dyn Dialect,
    stmt: DropStatement,
}

impl<'d> DropObject<'d> {
    /// Creates an empty DROP for the dialect.
    #[must_use]
    pub fn new(dialect: &'d dyn Dialect) -> Self {
        Self {
            dialect,
            stmt: DropStatement::default(),
        }
    }

    /// Targets a table.
    #[must_use]
    pub fn table(mut self, name: &str) -> Self {
        self.stmt.kind = ObjectKind::Table;
        self.stmt.name = Some(String::from(name));
        self
    }

    /// Targets a database.
    #[must_use]
    pub fn database(mut self, name: &str) -> Self {
        self.stmt.kind = ObjectKind::Database;
        self.stmt.name = Some(String::from(name));
        self
    }

    /// Skips silently when the object does not exist.
    #[must_use]
    pub const fn if_exists(mut self) -> Self {
        self.stmt.if_exists = true;
        self
    }

    /// Returns the accumulated fragments.
    #[must_use]
    pub const fn statement(&self) -> &DropStatement {
        &self.stmt
    }

    /// Renders the statement for the bound dialect.
    ///
    /// # Errors
    ///
    /// Fails when no name is set or the dialect cannot drop the object kind.
    pub fn render(&self) -> Result<Rendered> {
        self.sql().map(Rendered::from)
    }

    /// Renders the statement text.
    ///
    /// # Errors
    ///
    /// See [`DropObject::render`].
    pub fn sql(&self) -> Result<String> {
        self.dialect.render_drop(&self.stmt)
    }
}

pub(crate) fn render<D: Dialect + ?Sized>(dialect: &D, stmt: &DropStatement) -> Result<String> {
    let name = target(stmt.name.as_ref()).ok_or(SpecError::MissingName)?;
    let name = match stmt.kind {
        ObjectKind::Table => unqualified(name),
        ObjectKind::Database => name,
    };

    let mut sql = format!("DROP {} ", stmt.kind.as_sql());
    if stmt.if_exists {
        if dialect.supports_if_exists() {
            sql.push_str("IF EXISTS ");
        } else {
            debug!(dialect = dialect.name(), "IF EXISTS ignored");
        }
    }
    sql.push_str(&dialect.quote_identifier(name));
    Ok(sql)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{Firebird, MsSql};

    #[test]
    fn test_drop_table() {
        let dialect = MsSql::new();
        let sql = DropObject::new(&dialect)
            .table("dbo.users")
            .if_exists()
            .sql()
            .unwrap();
        assert_eq!(sql, "DROP TABLE IF EXISTS [users]");
    }

    #[test]
    fn test_drop_database() {
        let dialect = MsSql::new();
        let sql = DropObject::new(&dialect).database("shop").sql().unwrap();
        assert_eq!(sql, "DROP DATABASE [shop]");
    }

    #[test]
    fn test_if_exists_ignored_where_unsupported() {
        let dialect = Firebird::new();
        let sql = DropObject::new(&dialect).table("t").if_exists().sql().unwrap();
        assert_eq!(sql, "DROP TABLE \"t\"");
    }

    #[test]
    fn test_missing_name() {
        let dialect = Firebird::new();
        assert_eq!(DropObject::new(&dialect).sql(), Err(SpecError::MissingName));
    }
}
