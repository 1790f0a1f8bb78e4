//! ALTER TABLE builder.

use super::{target, unqualified, Rendered};
use crate::column::ColumnSpec;
use crate::dialect::Dialect;
use crate::error::{Result, SpecError};

/// One alteration of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterAction {
    /// Adds a column.
    AddColumn(ColumnSpec),
    /// Drops a column by name.
    DropColumn(String),
}

/// Accumulated fragments of an ALTER TABLE statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlterTableStatement {
    /// Table name.
    pub name: Option<String>,
    /// Alterations in registration order.
    pub actions: Vec<AlterAction>,
}

/// ALTER TABLE builder bound to a dialect.
#[derive(Debug, Clone)]
pub struct AlterTable<'d> {
    dialect: &'d dyn Dialect,
    stmt: AlterTableStatement,
}

impl<'d> AlterTable<'d> {
    /// Creates an empty ALTER TABLE for the dialect.
    #[must_use]
    pub fn new(dialect: &'d dyn Dialect) -> Self {
        Self {
            dialect,
            stmt: AlterTableStatement::default(),
        }
    }

    /// Sets the table name.
    #[must_use]
    pub fn table(mut self, name: &str) -> Self {
        self.stmt.name = Some(String::from(name));
        self
    }

    /// Adds a column.
    #[must_use]
    pub fn add_column(mut self, column: ColumnSpec) -> Self {
        self.stmt.actions.push(AlterAction::AddColumn(column));
        self
    }

    /// Drops a column.
    #[must_use]
    pub fn drop_column(mut self, name: &str) -> Self {
        self.stmt
            .actions
            .push(AlterAction::DropColumn(String::from(name)));
        self
    }

    /// Returns the accumulated fragments.
    #[must_use]
    pub const fn statement(&self) -> &AlterTableStatement {
        &self.stmt
    }

    /// Renders the statement for the bound dialect.
    ///
    /// # Errors
    ///
    /// Fails when no name or no alteration is set, or when a column
    /// specification is malformed.
    pub fn render(&self) -> Result<Rendered> {
        self.sql().map(Rendered::from)
    }

    /// Renders the statement text.
    ///
    /// # Errors
    ///
    /// See [`AlterTable::render`].
    pub fn sql(&self) -> Result<String> {
        self.dialect.render_alter(&self.stmt)
    }
}

pub(crate) fn render<D: Dialect + ?Sized>(dialect: &D, stmt: &AlterTableStatement) -> Result<String> {
    let name = unqualified(target(stmt.name.as_ref()).ok_or(SpecError::MissingName)?);
    if stmt.actions.is_empty() {
        return Err(SpecError::NoAlterations(String::from(name)));
    }

    let (add, drop) = dialect.alter_keywords();
    let actions = stmt
        .actions
        .iter()
        .map(|action| match action {
            AlterAction::AddColumn(column) => Ok(format!("{add} {}", dialect.field_spec(column)?)),
            AlterAction::DropColumn(column) => {
                Ok(format!("{drop} {}", dialect.quote_identifier(column)))
            }
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(format!(
        "ALTER TABLE {} {}",
        dialect.quote_identifier(name),
        actions.join(", ")
    ))
}
