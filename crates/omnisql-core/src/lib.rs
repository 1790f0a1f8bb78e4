//! # omnisql-core
//!
//! Dialect-independent SQL statement building.
//!
//! This crate provides:
//! - Product-neutral column specifications and a per-dialect field-spec translator
//! - Fluent statement builders for SELECT, INSERT, UPDATE, DELETE, CREATE, ALTER and DROP
//! - Dialect strategies for Firebird, SQL Server, MySQL and SQLite
//!
//! ## Building Statements
//!
//! Builders are obtained from a dialect and render to SQL text plus the
//! ordered parameters to bind:
//!
//! ```rust
//! use omnisql_core::builder::col;
//! use omnisql_core::dialect::{Dialect, DialectKind, DialectOptions};
//!
//! let dialect = DialectKind::Mssql.build(&DialectOptions::default());
//! let rendered = dialect
//!     .select()
//!     .columns(&["id", "name"])
//!     .from("users")
//!     .filter(col("active").eq(true))
//!     .limit(10)
//!     .render()
//!     .unwrap();
//!
//! assert_eq!(
//!     rendered.sql,
//!     "SELECT id, name FROM users WHERE active = ? ORDER BY 1 \
//!      OFFSET ? ROWS FETCH NEXT ? ROWS ONLY"
//! );
//! ```
//!
//! ## Table Definitions
//!
//! ```rust
//! use omnisql_core::column::{CanonicalType, ColumnSpec};
//! use omnisql_core::dialect::{Dialect, Firebird};
//!
//! let firebird = Firebird::new();
//! let dialect: &dyn Dialect = &firebird;
//! let sql = dialect
//!     .create()
//!     .table("users")
//!     .column(ColumnSpec::new("id", CanonicalType::Int).not_null())
//!     .column(ColumnSpec::new("active", CanonicalType::Boolean))
//!     .primary_key("id")
//!     .sql()
//!     .unwrap();
//!
//! assert_eq!(
//!     sql,
//!     "CREATE TABLE \"users\" (\n\t\"id\" INT NOT NULL PRIMARY KEY,\n\t\"active\" CHAR(1)\n)"
//! );
//! ```
//!
//! ## SQL Injection Prevention
//!
//! Values never reach the statement text; they are returned as parameters:
//!
//! ```rust
//! use omnisql_core::builder::{col, Select};
//! use omnisql_core::dialect::Sqlite;
//! use omnisql_core::value::SqlValue;
//!
//! let dialect = Sqlite::new();
//! let user_input = "'; DROP TABLE users; --";
//! let (sql, params) = Select::new(&dialect)
//!     .columns(&["id"])
//!     .from("users")
//!     .filter(col("name").eq(user_input))
//!     .render()
//!     .unwrap()
//!     .into_parts();
//!
//! assert_eq!(sql, "SELECT id FROM users WHERE name = ?");
//! assert_eq!(params, vec![SqlValue::Text(String::from(user_input))]);
//! ```

pub mod builder;
pub mod column;
pub mod dialect;
pub mod error;
pub mod field;
pub mod value;

pub use builder::{col, Rendered};
pub use column::{CanonicalType, ColumnSpec, DefaultKind, Length};
pub use dialect::{Dialect, DialectKind, DialectOptions};
pub use error::{Result, SpecError};
pub use value::{SqlValue, ToSqlValue};
