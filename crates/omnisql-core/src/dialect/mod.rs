//! SQL dialect support.
//!
//! Databases disagree on quoting, pagination, placeholder syntax, type names
//! and default-value spelling. A [`Dialect`] bundles a [`DialectDescriptor`]
//! with a type map and a set of render hooks. Every hook has a generic
//! default; a dialect overrides only the steps where its grammar differs.
//!
//! Dialects are stateless beyond their descriptor and are shared freely
//! between threads. Builders borrow them for the duration of one statement:
//!
//! ```rust
//! use omnisql_core::dialect::{Dialect, Firebird};
//!
//! let firebird = Firebird::new();
//! let dialect: &dyn Dialect = &firebird;
//! let rendered = dialect.select().from("t").limit(10).render().unwrap();
//!
//! assert_eq!(rendered.sql, "SELECT FIRST ? SKIP ? * FROM t");
//! ```

mod firebird;
mod mssql;
mod mysql;
mod sqlite;

pub use firebird::Firebird;
pub use mssql::MsSql;
pub use mysql::MySql;
pub use sqlite::Sqlite;

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::builder::{
    self, AlterTable, AlterTableStatement, Create, CreateDatabaseStatement, CreateTableStatement,
    Delete, DeleteStatement, DropObject, DropStatement, Insert, InsertStatement, Rendered, Select,
    SelectStatement, Update, UpdateStatement,
};
use crate::column::{CanonicalType, ColumnSpec};
use crate::error::{Result, SpecError};
use crate::field;

/// Bind-parameter syntax.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderStyle {
    /// `?` for every parameter.
    #[default]
    Positional,
    /// `:p1`, `:p2`, ... numbered in textual order.
    Named,
}

impl PlaceholderStyle {
    /// Returns the placeholder for the 1-based parameter `index`.
    #[must_use]
    pub fn placeholder(self, index: usize) -> String {
        match self {
            Self::Positional => String::from("?"),
            Self::Named => format!(":p{index}"),
        }
    }
}

/// How a dialect limits the number of returned rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    /// `SELECT FIRST n SKIP m ...` before the column list.
    FirstSkip,
    /// Trailing `OFFSET m ROWS FETCH NEXT n ROWS ONLY`; requires ORDER BY.
    OffsetFetch,
    /// Trailing `LIMIT n OFFSET m`.
    LimitOffset,
}

/// Case applied to type names that pass through the type map unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeCase {
    /// `VARCHAR`.
    Upper,
    /// `varchar`.
    Lower,
}

impl TypeCase {
    /// Applies the case to a type name.
    #[must_use]
    pub fn apply(self, name: &str) -> String {
        match self {
            Self::Upper => name.to_ascii_uppercase(),
            Self::Lower => name.to_ascii_lowercase(),
        }
    }
}

/// The static description of a dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialectDescriptor {
    /// Dialect name.
    pub name: &'static str,
    /// Opening identifier quote.
    pub quote_open: char,
    /// Closing identifier quote.
    pub quote_close: char,
    /// Placeholder style.
    pub placeholder: PlaceholderStyle,
    /// Row-limiting syntax.
    pub pagination: Pagination,
    /// Case of passthrough type names.
    pub type_case: TypeCase,
    /// Render LIMIT/OFFSET counts as integer literals instead of parameters.
    pub inline_pagination: bool,
}

impl DialectDescriptor {
    /// Applies caller options on top of the dialect defaults.
    #[must_use]
    pub fn with_options(mut self, options: &DialectOptions) -> Self {
        if let Some((open, close)) = options.quotes {
            self.quote_open = open;
            self.quote_close = close;
        }
        if let Some(placeholder) = options.placeholder {
            self.placeholder = placeholder;
        }
        if let Some(type_case) = options.type_case {
            self.type_case = type_case;
        }
        self.inline_pagination = options.inline_pagination;
        self
    }
}

/// Construction-time overrides for a dialect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DialectOptions {
    /// Replacement quote pair.
    pub quotes: Option<(char, char)>,
    /// Replacement placeholder style.
    pub placeholder: Option<PlaceholderStyle>,
    /// Replacement case for passthrough type names.
    pub type_case: Option<TypeCase>,
    /// Inline LIMIT/OFFSET counts.
    pub inline_pagination: bool,
}

/// A canonical type resolved for one dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMapping {
    /// Native type keyword.
    pub native: Cow<'static, str>,
    /// Whether a supplied length is appended as `(length)`.
    pub lengthed: bool,
}

impl TypeMapping {
    /// A mapping to a fixed native keyword.
    #[must_use]
    pub const fn native(native: &'static str, lengthed: bool) -> Self {
        Self {
            native: Cow::Borrowed(native),
            lengthed,
        }
    }

    /// The identity mapping in the given case.
    #[must_use]
    pub fn identity(ty: &CanonicalType, case: TypeCase, lengthed: bool) -> Self {
        Self {
            native: Cow::Owned(case.apply(ty.name())),
            lengthed,
        }
    }
}

/// Trait for SQL dialect-specific behavior.
pub trait Dialect: Send + Sync + fmt::Debug {
    /// Returns the dialect descriptor.
    fn descriptor(&self) -> &DialectDescriptor;

    /// Returns the name of the dialect.
    fn name(&self) -> &'static str {
        self.descriptor().name
    }

    /// Quotes an identifier.
    fn quote_identifier(&self, name: &str) -> String {
        let d = self.descriptor();
        let close = d.quote_close.to_string();
        let escaped = name.trim().replace(&close, &close.repeat(2));
        format!("{}{}{}", d.quote_open, escaped, d.quote_close)
    }

    /// Resolves a canonical type to the native type keyword.
    fn map_type(&self, ty: &CanonicalType) -> TypeMapping;

    /// Returns whether `NOT NULL` may follow the given type.
    fn allows_not_null(&self, _ty: &CanonicalType) -> bool {
        true
    }

    /// Returns whether nullable columns are spelled out with `NULL`.
    fn explicit_null(&self) -> bool {
        false
    }

    /// Returns the default clause used for a zero-equivalent literal on the
    /// given type, if the dialect has one.
    fn zero_default(&self, _ty: &CanonicalType) -> Option<&'static str> {
        None
    }

    /// Returns whether `COLLATE` directly follows the type (otherwise it
    /// follows the constraint).
    fn collation_follows_type(&self) -> bool {
        true
    }

    /// Keyword for temporary tables, if the dialect has them.
    fn temporary_keyword(&self) -> Option<&'static str> {
        Some("TEMPORARY")
    }

    /// Returns whether CREATE accepts `IF NOT EXISTS`.
    fn supports_if_not_exists(&self) -> bool {
        true
    }

    /// Returns whether DROP accepts `IF EXISTS`.
    fn supports_if_exists(&self) -> bool {
        true
    }

    /// Keywords for adding and dropping a column in ALTER TABLE.
    fn alter_keywords(&self) -> (&'static str, &'static str) {
        ("ADD COLUMN", "DROP COLUMN")
    }

    /// Translates a column specification into a column-definition fragment.
    ///
    /// # Errors
    ///
    /// Fails when the specification is malformed.
    fn field_spec(&self, column: &ColumnSpec) -> Result<String> {
        field::translate(self, column)
    }

    /// Renders a SELECT statement.
    ///
    /// # Errors
    ///
    /// Fails with [`SpecError::MissingSource`] when no source is set.
    fn render_select(&self, stmt: &SelectStatement) -> Result<Rendered> {
        builder::select::render(self, stmt)
    }

    /// Renders an INSERT statement.
    ///
    /// # Errors
    ///
    /// Fails when the target or the bindings are missing.
    fn render_insert(&self, stmt: &InsertStatement) -> Result<Rendered> {
        builder::insert::render(self, stmt)
    }

    /// Renders an UPDATE statement.
    ///
    /// # Errors
    ///
    /// Fails when the target or the bindings are missing.
    fn render_update(&self, stmt: &UpdateStatement) -> Result<Rendered> {
        builder::update::render(self, stmt)
    }

    /// Renders a DELETE statement.
    ///
    /// # Errors
    ///
    /// Fails when the target is missing.
    fn render_delete(&self, stmt: &DeleteStatement) -> Result<Rendered> {
        builder::delete::render(self, stmt)
    }

    /// Renders a CREATE DATABASE statement.
    ///
    /// # Errors
    ///
    /// Fails with [`SpecError::MissingName`] when no name is set.
    fn render_create_database(&self, stmt: &CreateDatabaseStatement) -> Result<String> {
        builder::create::render_database(self, stmt)
    }

    /// Renders a CREATE TABLE statement.
    ///
    /// # Errors
    ///
    /// Fails with [`SpecError::MissingName`] when no name is set or when a
    /// column specification is malformed.
    fn render_create_table(&self, stmt: &CreateTableStatement) -> Result<String> {
        builder::create::render_table(self, stmt)
    }

    /// Renders an ALTER TABLE statement.
    ///
    /// # Errors
    ///
    /// Fails when the name or the alterations are missing.
    fn render_alter(&self, stmt: &AlterTableStatement) -> Result<String> {
        builder::alter::render(self, stmt)
    }

    /// Renders a DROP statement.
    ///
    /// # Errors
    ///
    /// Fails with [`SpecError::MissingName`] when no target is set.
    fn render_drop(&self, stmt: &DropStatement) -> Result<String> {
        builder::drop::render(self, stmt)
    }
}

impl<'a> dyn Dialect + 'a {
    /// Starts a SELECT statement.
    #[must_use]
    pub fn select(&self) -> Select<'_> {
        Select::new(self)
    }

    /// Starts an INSERT statement.
    #[must_use]
    pub fn insert(&self) -> Insert<'_> {
        Insert::new(self)
    }

    /// Starts an UPDATE statement.
    #[must_use]
    pub fn update(&self) -> Update<'_> {
        Update::new(self)
    }

    /// Starts a DELETE statement.
    #[must_use]
    pub fn delete(&self) -> Delete<'_> {
        Delete::new(self)
    }

    /// Starts a CREATE DATABASE or CREATE TABLE statement.
    #[must_use]
    pub fn create(&self) -> Create<'_> {
        Create::new(self)
    }

    /// Starts an ALTER TABLE statement.
    #[must_use]
    pub fn alter(&self) -> AlterTable<'_> {
        AlterTable::new(self)
    }

    /// Starts a DROP statement.
    #[must_use]
    pub fn drop_object(&self) -> DropObject<'_> {
        DropObject::new(self)
    }
}

/// Identifies one of the built-in dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    /// Firebird / InterBase.
    Firebird,
    /// Microsoft SQL Server.
    Mssql,
    /// MySQL / MariaDB.
    Mysql,
    /// SQLite.
    Sqlite,
}

impl DialectKind {
    /// Builds a shareable dialect with the given options.
    #[must_use]
    pub fn build(self, options: &DialectOptions) -> Arc<dyn Dialect> {
        match self {
            Self::Firebird => Arc::new(Firebird::with_options(options)),
            Self::Mssql => Arc::new(MsSql::with_options(options)),
            Self::Mysql => Arc::new(MySql::with_options(options)),
            Self::Sqlite => Arc::new(Sqlite::with_options(options)),
        }
    }

    /// Returns the identifier used in configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Firebird => "firebird",
            Self::Mssql => "mssql",
            Self::Mysql => "mysql",
            Self::Sqlite => "sqlite",
        }
    }
}

impl FromStr for DialectKind {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "firebird" | "fb" | "interbase" => Ok(Self::Firebird),
            "mssql" | "sqlserver" | "sqlsrv" => Ok(Self::Mssql),
            "mysql" | "mariadb" => Ok(Self::Mysql),
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            _ => Err(SpecError::UnknownDialect(String::from(s))),
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_styles() {
        assert_eq!(PlaceholderStyle::Positional.placeholder(3), "?");
        assert_eq!(PlaceholderStyle::Named.placeholder(3), ":p3");
    }

    #[test]
    fn test_dialect_kind_from_str() {
        assert_eq!("Firebird".parse::<DialectKind>().unwrap(), DialectKind::Firebird);
        assert_eq!("sqlserver".parse::<DialectKind>().unwrap(), DialectKind::Mssql);
        assert_eq!("mariadb".parse::<DialectKind>().unwrap(), DialectKind::Mysql);
        assert_eq!("sqlite3".parse::<DialectKind>().unwrap(), DialectKind::Sqlite);
        assert_eq!(
            "oracle".parse::<DialectKind>(),
            Err(SpecError::UnknownDialect(String::from("oracle")))
        );
    }

    #[test]
    fn test_dialect_kind_builds_named_dialect() {
        let options = DialectOptions::default();
        for kind in [
            DialectKind::Firebird,
            DialectKind::Mssql,
            DialectKind::Mysql,
            DialectKind::Sqlite,
        ] {
            assert_eq!(kind.build(&options).name(), kind.as_str());
        }
    }

    #[test]
    fn test_options_override_descriptor() {
        let options = DialectOptions {
            quotes: Some(('`', '`')),
            placeholder: Some(PlaceholderStyle::Named),
            type_case: Some(TypeCase::Upper),
            inline_pagination: true,
        };
        let dialect = DialectKind::Mssql.build(&options);
        assert_eq!(dialect.quote_identifier(" col "), "`col`");
        assert_eq!(dialect.descriptor().placeholder, PlaceholderStyle::Named);
        assert_eq!(dialect.descriptor().type_case, TypeCase::Upper);
        assert!(dialect.descriptor().inline_pagination);
    }

    #[test]
    fn test_type_case_applies_to_passthrough_types() {
        let options = DialectOptions {
            type_case: Some(TypeCase::Upper),
            ..DialectOptions::default()
        };
        let dialect = DialectKind::Mssql.build(&options);
        let id = ColumnSpec::new("id", CanonicalType::Int);
        let name = ColumnSpec::new("name", CanonicalType::Varchar).length(20u32);
        let flag = ColumnSpec::new("flag", CanonicalType::Boolean);
        assert_eq!(dialect.field_spec(&id).unwrap(), "[id] INT");
        assert_eq!(dialect.field_spec(&name).unwrap(), "[name] VARCHAR(20)");
        // fixed native keywords keep their spelling
        assert_eq!(dialect.field_spec(&flag).unwrap(), "[flag] tinyint");

        let options = DialectOptions {
            type_case: Some(TypeCase::Lower),
            ..DialectOptions::default()
        };
        let firebird = DialectKind::Firebird.build(&options);
        assert_eq!(firebird.field_spec(&name).unwrap(), "\"name\" varchar(20)");
    }

    #[test]
    fn test_quote_identifier_doubles_closing_quote() {
        let mssql = DialectKind::Mssql.build(&DialectOptions::default());
        assert_eq!(mssql.quote_identifier("a]b"), "[a]]b]");
        let sqlite = DialectKind::Sqlite.build(&DialectOptions::default());
        assert_eq!(sqlite.quote_identifier("say \"hi\""), "\"say \"\"hi\"\"\"");
        let mysql = DialectKind::Mysql.build(&DialectOptions::default());
        assert_eq!(mysql.quote_identifier("a`b"), "`a``b`");
    }

    #[test]
    fn test_options_deserialize() {
        let options: DialectOptions =
            serde_json::from_str(r#"{"quotes": ["`", "`"], "placeholder": "named", "type_case": "lower"}"#)
                .unwrap();
        assert_eq!(options.quotes, Some(('`', '`')));
        assert_eq!(options.type_case, Some(TypeCase::Lower));
        assert_eq!(options.placeholder, Some(PlaceholderStyle::Named));
        assert!(!options.inline_pagination);
    }
}
