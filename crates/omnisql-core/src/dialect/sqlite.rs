//! SQLite dialect.

use super::{
    Dialect, DialectDescriptor, DialectOptions, Pagination, PlaceholderStyle, TypeCase, TypeMapping,
};
use crate::builder::{self, AlterTableStatement, CreateDatabaseStatement, DropStatement, ObjectKind};
use crate::column::CanonicalType;
use crate::error::{Result, SpecError};

const DESCRIPTOR: DialectDescriptor = DialectDescriptor {
    name: "sqlite",
    quote_open: '"',
    quote_close: '"',
    placeholder: PlaceholderStyle::Positional,
    pagination: Pagination::LimitOffset,
    type_case: TypeCase::Upper,
    inline_pagination: false,
};

/// SQLite dialect.
///
/// SQLite has no databases to create or drop (a database is a file) and
/// accepts a single action per ALTER TABLE.
#[derive(Debug, Clone)]
pub struct Sqlite {
    descriptor: DialectDescriptor,
}

impl Sqlite {
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

    fn unsupported(statement: &'static str) -> SpecError {
        SpecError::Unsupported {
            dialect: DESCRIPTOR.name,
            statement,
        }
    }
}

impl Default for Sqlite {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialect for Sqlite {
    fn descriptor(&self) -> &DialectDescriptor {
        &self.descriptor
    }

    fn map_type(&self, ty: &CanonicalType) -> TypeMapping {
        use CanonicalType as T;
        match ty {
            // no bool type, stored as 0/1
            T::Boolean => TypeMapping::native("INTEGER", false),
            T::TinyText | T::MediumText | T::LongText => TypeMapping::native("TEXT", false),
            T::Image => TypeMapping::native("BLOB", false),
            T::Double => TypeMapping::native("REAL", false),
            T::Char | T::Varchar | T::NChar | T::NVarchar | T::Decimal | T::Numeric => {
                TypeMapping::identity(ty, self.descriptor.type_case, true)
            }
            other => TypeMapping::identity(other, self.descriptor.type_case, false),
        }
    }

    fn temporary_keyword(&self) -> Option<&'static str> {
        Some("TEMP")
    }

    fn render_create_database(&self, _stmt: &CreateDatabaseStatement) -> Result<String> {
        Err(Self::unsupported("CREATE DATABASE"))
    }

    fn render_alter(&self, stmt: &AlterTableStatement) -> Result<String> {
        if stmt.actions.len() > 1 {
            return Err(Self::unsupported("ALTER TABLE with several actions"));
        }
        builder::alter::render(self, stmt)
    }

    fn render_drop(&self, stmt: &DropStatement) -> Result<String> {
        if stmt.kind == ObjectKind::Database {
            return Err(Self::unsupported("DROP DATABASE"));
        }
        builder::drop::render(self, stmt)
    }
}
