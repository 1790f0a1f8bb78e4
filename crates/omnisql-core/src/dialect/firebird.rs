//! Firebird dialect.

use super::{
    Dialect, DialectDescriptor, DialectOptions, Pagination, PlaceholderStyle, TypeCase, TypeMapping,
};
use crate::builder::create::{column_fragments, push_column_block, split_collation};
use crate::builder::{target, unqualified, CreateDatabaseStatement, CreateTableStatement};
use crate::column::CanonicalType;
use crate::error::{Result, SpecError};

const DESCRIPTOR: DialectDescriptor = DialectDescriptor {
    name: "firebird",
    quote_open: '"',
    quote_close: '"',
    placeholder: PlaceholderStyle::Positional,
    pagination: Pagination::FirstSkip,
    type_case: TypeCase::Upper,
    inline_pagination: false,
};

/// Firebird dialect: `SELECT FIRST n SKIP m`, `RECREATE TABLE`, inline
/// primary keys.
#[derive(Debug, Clone)]
pub struct Firebird {
    descriptor: DialectDescriptor,
}

impl Firebird {
    /// Creates the dialect with default options.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            descriptor: DESCRIPTOR,
        }
    }

    /// Creates the dialect with caller overrides.
    #[must_use]
    pub fn with_options(options: &DialectOptions) -> Self {
        Self {
            descriptor: DESCRIPTOR.with_options(options),
        }
    }
}

impl Default for Firebird {
    fn default() -> Self {
        Self::new()
    }
}

/// Puts `PRIMARY KEY` right after the first `NOT NULL`, adding one if absent.
fn splice_primary_key(fragment: &str) -> String {
    match fragment.split_once(" NOT NULL") {
        Some((head, tail)) => format!("{head} NOT NULL PRIMARY KEY{tail}"),
        None => format!("{fragment} NOT NULL PRIMARY KEY"),
    }
}

impl Dialect for Firebird {
    fn descriptor(&self) -> &DialectDescriptor {
        &self.descriptor
    }

    fn map_type(&self, ty: &CanonicalType) -> TypeMapping {
        use CanonicalType as T;
        match ty {
            T::TinyInt => TypeMapping::native("SMALLINT", false),
            T::MediumInt => TypeMapping::native("INT", false),
            T::BigInt => TypeMapping::native("INT64", false),
            T::Real | T::Double => TypeMapping::native("DOUBLE PRECISION", false),
            T::Boolean => TypeMapping::native("CHAR(1)", false),
            T::Binary | T::VarBinary => TypeMapping::native("CHAR", false),
            T::TinyText => TypeMapping::native("VARCHAR(255)", false),
            T::DateTime => TypeMapping::native("TIMESTAMP", false),
            T::Image => TypeMapping::native("BLOB", false),
            T::Text | T::MediumText | T::LongText => {
                TypeMapping::native("BLOB SUB_TYPE TEXT", false)
            }
            T::Char | T::Varchar | T::Decimal | T::Numeric => {
                TypeMapping::identity(ty, self.descriptor.type_case, true)
            }
            other => TypeMapping::identity(other, self.descriptor.type_case, false),
        }
    }

    fn allows_not_null(&self, ty: &CanonicalType) -> bool {
        !matches!(
            ty,
            CanonicalType::Date | CanonicalType::Time | CanonicalType::Timestamp
        )
    }

    fn zero_default(&self, ty: &CanonicalType) -> Option<&'static str> {
        matches!(ty, CanonicalType::Timestamp).then_some("DEFAULT 0")
    }

    fn collation_follows_type(&self) -> bool {
        false
    }

    fn temporary_keyword(&self) -> Option<&'static str> {
        Some("GLOBAL TEMPORARY")
    }

    fn supports_if_not_exists(&self) -> bool {
        false
    }

    fn supports_if_exists(&self) -> bool {
        false
    }

    fn alter_keywords(&self) -> (&'static str, &'static str) {
        ("ADD", "DROP")
    }

    fn render_create_database(&self, stmt: &CreateDatabaseStatement) -> Result<String> {
        let name = target(stmt.name.as_ref()).ok_or(SpecError::MissingName)?;
        let mut sql = format!("CREATE DATABASE {}", self.quote_identifier(name));

        if let Some(collation) = target(stmt.collation.as_ref()) {
            let (charset, suffix) = split_collation(collation);
            sql.push_str(" DEFAULT CHARACTER SET ");
            sql.push_str(&charset.to_ascii_uppercase());
            if let Some(suffix) = suffix {
                sql.push_str(" COLLATION ");
                sql.push_str(&suffix.to_ascii_uppercase());
            }
        }

        Ok(sql)
    }

    fn render_create_table(&self, stmt: &CreateTableStatement) -> Result<String> {
        let name = target(stmt.name.as_ref()).ok_or(SpecError::MissingName)?;

        // RECREATE replaces an existing table, the closest Firebird has to IF NOT EXISTS
        let mut sql = String::from(if stmt.if_not_exists {
            "RECREATE "
        } else {
            "CREATE "
        });
        if stmt.temporary {
            sql.push_str("GLOBAL TEMPORARY ");
        }
        sql.push_str("TABLE ");
        sql.push_str(&self.quote_identifier(unqualified(name)));

        let primary_key = target(stmt.primary_key.as_ref());
        let fragments: Vec<String> = column_fragments(self, stmt)?
            .into_iter()
            .map(|(column, fragment)| match primary_key {
                Some(pk) if column.trim().eq_ignore_ascii_case(pk) => {
                    splice_primary_key(&fragment)
                }
                _ => fragment,
            })
            .collect();
        push_column_block(&mut sql, &fragments);

        Ok(sql)
    }
}
