//! CREATE DATABASE and CREATE TABLE builders.

use indexmap::IndexMap;
use tracing::debug;

use super::{target, unqualified, Rendered};
use crate::column::ColumnSpec;
use crate::dialect::Dialect;
use crate::error::{Result, SpecError};

/// Accumulated fragments of a CREATE DATABASE statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateDatabaseStatement {
    /// Database name.
    pub name: Option<String>,
    /// Skip creation when the database exists.
    pub if_not_exists: bool,
    /// Collation of the form `<charset>[_<collation>]`.
    pub collation: Option<String>,
}

/// Accumulated fragments of a CREATE TABLE statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateTableStatement {
    /// Table name; schema qualifiers are stripped at render time.
    pub name: Option<String>,
    /// Columns keyed by name, in insertion order.
    pub columns: IndexMap<String, ColumnSpec>,
    /// Primary key column.
    pub primary_key: Option<String>,
    /// Skip creation when the table exists.
    pub if_not_exists: bool,
    /// Create a temporary table.
    pub temporary: bool,
}

/// Entry point for CREATE statements.
#[derive(Debug, Clone, Copy)]
pub struct Create<'d> {
    dialect: &'d dyn Dialect,
}

impl<'d> Create<'d> {
    /// Creates the entry point for the dialect.
    #[must_use]
    pub fn new(dialect: &'d dyn Dialect) -> Self {
        Self { dialect }
    }

    /// Starts a CREATE DATABASE statement.
    #[must_use]
    pub fn database(self, name: &str) -> CreateDatabase<'d> {
        CreateDatabase {
            dialect: self.dialect,
            stmt: CreateDatabaseStatement {
                name: Some(String::from(name)),
                ..CreateDatabaseStatement::default()
            },
        }
    }

    /// Starts a CREATE TABLE statement.
    #[must_use]
    pub fn table(self, name: &str) -> CreateTable<'d> {
        CreateTable {
            dialect: self.dialect,
            stmt: CreateTableStatement {
                name: Some(String::from(name)),
                ..CreateTableStatement::default()
            },
        }
    }
}

/// CREATE DATABASE builder bound to a dialect.
#[derive(Debug, Clone)]
pub struct CreateDatabase<'d> {
    dialect: &'d dyn Dialect,
    stmt: CreateDatabaseStatement,
}

impl CreateDatabase<'_> {
    /// Replaces the database name.
    #[must_use]
    pub fn name(mut self, name: &str) -> Self {
        self.stmt.name = Some(String::from(name));
        self
    }

    /// Skips creation when the database already exists.
    #[must_use]
    pub const fn if_not_exists(mut self) -> Self {
        self.stmt.if_not_exists = true;
        self
    }

    /// Sets the collation, e.g. `utf8mb4_unicode_ci`.
    #[must_use]
    pub fn collate(mut self, collation: &str) -> Self {
        self.stmt.collation = Some(String::from(collation));
        self
    }

    /// Returns the accumulated fragments.
    #[must_use]
    pub const fn statement(&self) -> &CreateDatabaseStatement {
        &self.stmt
    }

    /// Renders the statement for the bound dialect.
    ///
    /// # Errors
    ///
    /// Fails when no name is set or the dialect has no CREATE DATABASE.
    pub fn render(&self) -> Result<Rendered> {
        self.sql().map(Rendered::from)
    }

    /// Renders the statement text.
    ///
    /// # Errors
    ///
    /// See [`CreateDatabase::render`].
    pub fn sql(&self) -> Result<String> {
        self.dialect.render_create_database(&self.stmt)
    }
}

/// CREATE TABLE builder bound to a dialect.
#[derive(Debug, Clone)]
pub struct CreateTable<'d> {
    dialect: &'d dyn Dialect,
    stmt: CreateTableStatement,
}

impl CreateTable<'_> {
    /// Replaces the table name.
    #[must_use]
    pub fn name(mut self, name: &str) -> Self {
        self.stmt.name = Some(String::from(name));
        self
    }

    /// Adds a column. A column with the same name is replaced in place.
    #[must_use]
    pub fn column(mut self, column: ColumnSpec) -> Self {
        self.stmt.columns.insert(column.name.clone(), column);
        self
    }

    /// Adds several columns.
    #[must_use]
    pub fn columns(self, columns: impl IntoIterator<Item = ColumnSpec>) -> Self {
        columns.into_iter().fold(self, Self::column)
    }

    /// Declares the primary key column.
    #[must_use]
    pub fn primary_key(mut self, column: &str) -> Self {
        self.stmt.primary_key = Some(String::from(column));
        self
    }

    /// Skips creation when the table already exists.
    #[must_use]
    pub const fn if_not_exists(mut self) -> Self {
        self.stmt.if_not_exists = true;
        self
    }

    /// Creates a temporary table.
    #[must_use]
    pub const fn temporary(mut self) -> Self {
        self.stmt.temporary = true;
        self
    }

    /// Returns the accumulated fragments.
    #[must_use]
    pub const fn statement(&self) -> &CreateTableStatement {
        &self.stmt
    }

    /// Renders the statement for the bound dialect.
    ///
    /// # Errors
    ///
    /// Fails when no name is set or a column specification is malformed.
    pub fn render(&self) -> Result<Rendered> {
        self.sql().map(Rendered::from)
    }

    /// Renders the statement text.
    ///
    /// # Errors
    ///
    /// See [`CreateTable::render`].
    pub fn sql(&self) -> Result<String> {
        self.dialect.render_create_table(&self.stmt)
    }
}

/// Splits `<charset>[_<collation>]` on the first underscore.
pub(crate) fn split_collation(collation: &str) -> (&str, Option<&str>) {
    match collation.split_once('_') {
        Some((charset, rest)) => (charset, Some(rest).filter(|s| !s.is_empty())),
        None => (collation, None),
    }
}

/// Translates every column in insertion order.
pub(crate) fn column_fragments<D: Dialect + ?Sized>(
    dialect: &D,
    stmt: &CreateTableStatement,
) -> Result<Vec<(String, String)>> {
    stmt.columns
        .values()
        .map(|column| Ok((column.name.clone(), dialect.field_spec(column)?)))
        .collect()
}

/// Appends the parenthesised column block, or nothing when there are no columns.
pub(crate) fn push_column_block(sql: &mut String, fragments: &[String]) {
    if fragments.is_empty() {
        return;
    }
    sql.push_str(" (\n\t");
    sql.push_str(&fragments.join(",\n\t"));
    sql.push_str("\n)");
}

/// Writes `CREATE [<temporary>] TABLE [IF NOT EXISTS] ` for the dialect.
fn table_prefix<D: Dialect + ?Sized>(dialect: &D, stmt: &CreateTableStatement) -> String {
    let mut sql = String::from("CREATE ");
    if stmt.temporary {
        match dialect.temporary_keyword() {
            Some(keyword) => {
                sql.push_str(keyword);
                sql.push(' ');
            }
            None => debug!(dialect = dialect.name(), "temporary flag ignored"),
        }
    }
    sql.push_str("TABLE ");
    if stmt.if_not_exists {
        if dialect.supports_if_not_exists() {
            sql.push_str("IF NOT EXISTS ");
        } else {
            debug!(dialect = dialect.name(), "IF NOT EXISTS ignored");
        }
    }
    sql
}

/// Generic CREATE DATABASE rendering: `CHARACTER SET x [COLLATE x_y]`.
pub(crate) fn render_database<D: Dialect + ?Sized>(
    dialect: &D,
    stmt: &CreateDatabaseStatement,
) -> Result<String> {
    let name = target(stmt.name.as_ref()).ok_or(SpecError::MissingName)?;

    let mut sql = String::from("CREATE DATABASE ");
    if stmt.if_not_exists {
        if dialect.supports_if_not_exists() {
            sql.push_str("IF NOT EXISTS ");
        } else {
            debug!(dialect = dialect.name(), "IF NOT EXISTS ignored");
        }
    }
    sql.push_str(&dialect.quote_identifier(name));

    if let Some(collation) = target(stmt.collation.as_ref()) {
        let (charset, suffix) = split_collation(collation);
        sql.push_str(" CHARACTER SET ");
        sql.push_str(charset);
        if suffix.is_some() {
            sql.push_str(" COLLATE ");
            sql.push_str(collation);
        }
    }

    Ok(sql)
}

/// Generic CREATE TABLE rendering with a trailing `PRIMARY KEY (col)` clause.
pub(crate) fn render_table<D: Dialect + ?Sized>(
    dialect: &D,
    stmt: &CreateTableStatement,
) -> Result<String> {
    let name = target(stmt.name.as_ref()).ok_or(SpecError::MissingName)?;

    let mut sql = table_prefix(dialect, stmt);
    sql.push_str(&dialect.quote_identifier(unqualified(name)));

    let mut fragments: Vec<String> = column_fragments(dialect, stmt)?
        .into_iter()
        .map(|(_, fragment)| fragment)
        .collect();
    if !fragments.is_empty() {
        if let Some(pk) = target(stmt.primary_key.as_ref()) {
            fragments.push(format!("PRIMARY KEY ({})", dialect.quote_identifier(pk)));
        }
    }
    push_column_block(&mut sql, &fragments);

    Ok(sql)
}
