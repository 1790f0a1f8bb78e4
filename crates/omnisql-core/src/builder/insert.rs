//! INSERT statement builder.

use super::{target, Rendered, SqlWriter};
use crate::dialect::Dialect;
use crate::error::{Result, SpecError};
use crate::value::{SqlValue, ToSqlValue};

/// Accumulated fragments of an INSERT statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertStatement {
    /// Target table.
    pub table: Option<String>,
    /// Column names.
    pub columns: Vec<String>,
    /// Value rows; every row must match `columns` in length.
    pub rows: Vec<Vec<SqlValue>>,
}

/// One-row INSERT text plus the value lists to execute it with.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// Statement text with placeholders for a single row.
    pub sql: String,
    /// Value lists, one per row.
    pub rows: Vec<Vec<SqlValue>>,
}

/// INSERT builder bound to a dialect.
#[derive(Debug, Clone)]
pub struct Insert<'d> {
    dialect: &'d dyn Dialect,
    stmt: InsertStatement,
}

impl<'d> Insert<'d> {
    /// Creates an empty INSERT for the dialect.
    #[must_use]
    pub fn new(dialect: &'d dyn Dialect) -> Self {
        Self {
            dialect,
            stmt: InsertStatement::default(),
        }
    }

    /// Sets the target table.
    #[must_use]
    pub fn table(mut self, table: &str) -> Self {
        self.stmt.table = Some(String::from(table));
        self
    }

    /// Binds a value to a column in the first row.
    ///
    /// Binding the same column again replaces the earlier value.
    #[must_use]
    pub fn set<T: ToSqlValue>(mut self, column: &str, value: T) -> Self {
        let value = value.to_sql_value();
        if self.stmt.rows.is_empty() {
            self.stmt.rows.push(vec![]);
        }
        match self.stmt.columns.iter().position(|c| c == column) {
            Some(i) => {
                if let Some(slot) = self.stmt.rows[0].get_mut(i) {
                    *slot = value;
                }
            }
            None => {
                self.stmt.columns.push(String::from(column));
                self.stmt.rows[0].push(value);
            }
        }
        self
    }

    /// Declares the column list for rows added with [`Insert::values`].
    #[must_use]
    pub fn columns(mut self, cols: &[&str]) -> Self {
        self.stmt.columns.extend(cols.iter().map(|c| String::from(*c)));
        self
    }

    /// Adds a row of values.
    #[must_use]
    pub fn values<T: ToSqlValue>(mut self, row: Vec<T>) -> Self {
        self.stmt
            .rows
            .push(row.into_iter().map(ToSqlValue::to_sql_value).collect());
        self
    }

    /// Returns the accumulated fragments.
    #[must_use]
    pub const fn statement(&self) -> &InsertStatement {
        &self.stmt
    }

    /// Renders the statement for the bound dialect.
    ///
    /// # Errors
    ///
    /// Fails when no table or no values were given, or when a row does not
    /// match the column list.
    pub fn render(&self) -> Result<Rendered> {
        self.dialect.render_insert(&self.stmt)
    }

    /// Renders the statement and returns only the SQL text.
    ///
    /// # Errors
    ///
    /// See [`Insert::render`].
    pub fn sql(&self) -> Result<String> {
        self.render().map(|r| r.sql)
    }

    /// Renders single-row SQL and returns every row as a separate value list,
    /// for drivers that execute one prepared statement many times.
    ///
    /// # Errors
    ///
    /// See [`Insert::render`].
    pub fn render_batch(&self) -> Result<Batch> {
        let single = InsertStatement {
            table: self.stmt.table.clone(),
            columns: self.stmt.columns.clone(),
            rows: self.stmt.rows.iter().take(1).cloned().collect(),
        };
        check_rows(&self.stmt)?;
        let rendered = self.dialect.render_insert(&single)?;
        Ok(Batch {
            sql: rendered.sql,
            rows: self.stmt.rows.clone(),
        })
    }
}

fn check_rows(stmt: &InsertStatement) -> Result<()> {
    if stmt.columns.is_empty() || stmt.rows.is_empty() {
        return Err(SpecError::MissingValues("INSERT"));
    }
    let expected = stmt.columns.len();
    for (row, values) in stmt.rows.iter().enumerate() {
        if values.len() != expected {
            return Err(SpecError::ColumnCountMismatch {
                row,
                expected,
                found: values.len(),
            });
        }
    }
    Ok(())
}

/// Generic INSERT rendering shared by every dialect.
pub(crate) fn render<D: Dialect + ?Sized>(dialect: &D, stmt: &InsertStatement) -> Result<Rendered> {
    let table = target(stmt.table.as_ref()).ok_or(SpecError::MissingName)?;
    check_rows(stmt)?;

    let mut w = SqlWriter::new(dialect.descriptor());
    w.push_str("INSERT INTO ");
    w.push_str(table);
    w.push_str(" (");
    w.push_str(&stmt.columns.join(", "));
    w.push_str(") VALUES ");
    for (i, row) in stmt.rows.iter().enumerate() {
        if i > 0 {
            w.push_str(", ");
        }
        w.push_str("(");
        w.bind_list(row);
        w.push_str(")");
    }
    Ok(w.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{DialectOptions, MySql, PlaceholderStyle, Sqlite};

    #[test]
    fn test_simple_insert() {
        let dialect = Sqlite::new();
        let rendered = Insert::new(&dialect)
            .table("users")
            .set("name", "Alice")
            .set("age", 30)
            .render()
            .unwrap();
        assert_eq!(rendered.sql, "INSERT INTO users (name, age) VALUES (?, ?)");
        assert_eq!(
            rendered.params,
            vec![SqlValue::Text(String::from("Alice")), SqlValue::Int(30)]
        );
    }

    #[test]
    fn test_rebinding_overwrites() {
        let dialect = Sqlite::new();
        let rendered = Insert::new(&dialect)
            .table("users")
            .set("name", "Alice")
            .set("name", "Bob")
            .render()
            .unwrap();
        assert_eq!(rendered.sql, "INSERT INTO users (name) VALUES (?)");
        assert_eq!(rendered.params, vec![SqlValue::Text(String::from("Bob"))]);
    }

    #[test]
    fn test_multi_row_insert() {
        let dialect = MySql::new();
        let rendered = Insert::new(&dialect)
            .table("users")
            .columns(&["name", "age"])
            .values(vec![SqlValue::Text(String::from("Alice")), SqlValue::Int(30)])
            .values(vec![SqlValue::Text(String::from("Bob")), SqlValue::Int(25)])
            .render()
            .unwrap();
        assert_eq!(
            rendered.sql,
            "INSERT INTO users (name, age) VALUES (?, ?), (?, ?)"
        );
        assert_eq!(rendered.params.len(), 4);
    }

    #[test]
    fn test_named_placeholders() {
        let options = DialectOptions {
            placeholder: Some(PlaceholderStyle::Named),
            ..DialectOptions::default()
        };
        let dialect = Sqlite::with_options(&options);
        let sql = Insert::new(&dialect)
            .table("t")
            .set("a", 1)
            .set("b", 2)
            .sql()
            .unwrap();
        assert_eq!(sql, "INSERT INTO t (a, b) VALUES (:p1, :p2)");
    }

    #[test]
    fn test_errors() {
        let dialect = Sqlite::new();
        assert_eq!(
            Insert::new(&dialect).set("a", 1).render(),
            Err(SpecError::MissingName)
        );
        assert_eq!(
            Insert::new(&dialect).table("t").render(),
            Err(SpecError::MissingValues("INSERT"))
        );
        assert_eq!(
            Insert::new(&dialect)
                .table("t")
                .columns(&["a", "b"])
                .values(vec![1])
                .render(),
            Err(SpecError::ColumnCountMismatch {
                row: 0,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_render_batch() {
        let dialect = Sqlite::new();
        let batch = Insert::new(&dialect)
            .table("t")
            .columns(&["a"])
            .values(vec![1])
            .values(vec![2])
            .values(vec![3])
            .render_batch()
            .unwrap();
        assert_eq!(batch.sql, "INSERT INTO t (a) VALUES (?)");
        assert_eq!(batch.rows.len(), 3);
        assert_eq!(batch.rows[2], vec![SqlValue::Int(3)]);
    }
}
