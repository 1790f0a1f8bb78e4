//! Statement builders.
//!
//! One builder per statement kind. Each builder borrows the dialect it was
//! created from and accumulates fragments in a plain statement struct.
//! Clause setters can be called in any order; singular fragments overwrite,
//! list fragments append. Nothing is validated until `render()`.
//!
//! # Example
//!
//! ```rust
//! use omnisql_core::builder::{col, Select};
//! use omnisql_core::dialect::MsSql;
//!
//! let dialect = MsSql::new();
//! let rendered = Select::new(&dialect)
//!     .columns(&["id", "name"])
//!     .from("users")
//!     .filter(col("active").eq(true))
//!     .limit(10)
//!     .offset(20)
//!     .render()
//!     .unwrap();
//!
//! assert_eq!(
//!     rendered.sql,
//!     "SELECT id, name FROM users WHERE active = ? ORDER BY 1 \
//!      OFFSET ? ROWS FETCH NEXT ? ROWS ONLY"
//! );
//! assert_eq!(rendered.params.len(), 3);
//! ```

pub(crate) mod alter;
pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod drop;
mod expr;
pub(crate) mod insert;
pub(crate) mod select;
pub(crate) mod update;

pub use alter::{AlterAction, AlterTable, AlterTableStatement};
pub use create::{
    Create, CreateDatabase, CreateDatabaseStatement, CreateTable, CreateTableStatement,
};
pub use delete::{Delete, DeleteStatement};
pub use drop::{DropObject, DropStatement, ObjectKind};
pub use expr::{col, Column, CompareOp, Predicate};
pub use insert::{Batch, Insert, InsertStatement};
pub use select::{Join, JoinKind, OrderBy, Select, SelectStatement};
pub use update::{Update, UpdateStatement};

use crate::dialect::{DialectDescriptor, PlaceholderStyle};
use crate::value::SqlValue;

/// Rendered SQL text plus the ordered parameters the driver must bind.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    /// Statement text.
    pub sql: String,
    /// Parameters in placeholder order.
    pub params: Vec<SqlValue>,
}

impl From<String> for Rendered {
    fn from(sql: String) -> Self {
        Self {
            sql,
            params: vec![],
        }
    }
}

impl Rendered {
    /// Consumes the rendered statement and returns SQL and parameters.
    #[must_use]
    pub fn into_parts(self) -> (String, Vec<SqlValue>) {
        (self.sql, self.params)
    }
}

/// Accumulates statement text and allocates placeholders in textual order.
pub(crate) struct SqlWriter {
    sql: String,
    params: Vec<SqlValue>,
    placeholder: PlaceholderStyle,
    inline_counts: bool,
}

impl SqlWriter {
    pub(crate) fn new(descriptor: &DialectDescriptor) -> Self {
        Self {
            sql: String::new(),
            params: vec![],
            placeholder: descriptor.placeholder,
            inline_counts: descriptor.inline_pagination,
        }
    }

    pub(crate) fn push_str(&mut self, s: &str) {
        self.sql.push_str(s);
    }

    /// Binds a value and writes its placeholder.
    pub(crate) fn bind(&mut self, value: SqlValue) {
        self.params.push(value);
        let placeholder = self.placeholder.placeholder(self.params.len());
        self.sql.push_str(&placeholder);
    }

    /// Writes a row count, inline or bound depending on the dialect options.
    pub(crate) fn count(&mut self, n: u64) {
        if self.inline_counts {
            self.sql.push_str(&n.to_string());
        } else {
            self.bind(SqlValue::count(n));
        }
    }

    /// Writes a comma-separated list of bound values.
    pub(crate) fn bind_list(&mut self, values: &[SqlValue]) {
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                self.sql.push_str(", ");
            }
            self.bind(value.clone());
        }
    }

    /// Writes `WHERE a AND b ...` when predicates were registered.
    pub(crate) fn where_clause(&mut self, predicates: &[Predicate]) {
        self.conjunction(" WHERE ", predicates);
    }

    pub(crate) fn conjunction(&mut self, keyword: &str, predicates: &[Predicate]) {
        if predicates.is_empty() {
            return;
        }
        self.sql.push_str(keyword);
        let grouped = predicates.len() > 1;
        for (i, predicate) in predicates.iter().enumerate() {
            if i > 0 {
                self.sql.push_str(" AND ");
            }
            if grouped && predicate.is_disjunction() {
                self.sql.push('(');
                predicate.write(self);
                self.sql.push(')');
            } else {
                predicate.write(self);
            }
        }
    }

    pub(crate) fn finish(self) -> Rendered {
        Rendered {
            sql: self.sql,
            params: self.params,
        }
    }
}

/// Strips schema or database qualifiers: `db.schema.table` becomes `table`.
pub(crate) fn unqualified(name: &str) -> &str {
    let name = name.trim();
    name.rsplit('.').next().unwrap_or(name)
}

/// Returns the trimmed name, or `None` when blank.
pub(crate) fn target(name: Option<&String>) -> Option<&str> {
    name.map(|n| n.trim()).filter(|n| !n.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unqualified() {
        assert_eq!(unqualified("db.dbo.users"), "users");
        assert_eq!(unqualified(" users "), "users");
    }

    #[test]
    fn test_target() {
        let blank = String::from("  ");
        let named = String::from(" users ");
        assert_eq!(target(None), None);
        assert_eq!(target(Some(&blank)), None);
        assert_eq!(target(Some(&named)), Some("users"));
    }
}
