//! MySQL / MariaDB dialect.

use super::{
    Dialect, DialectDescriptor, DialectOptions, Pagination, PlaceholderStyle, TypeCase, TypeMapping,
};
use crate::column::CanonicalType;

const DESCRIPTOR: DialectDescriptor = DialectDescriptor {
    name: "mysql",
    quote_open: '`',
    quote_close: '`',
    placeholder: PlaceholderStyle::Positional,
    pagination: Pagination::LimitOffset,
    type_case: TypeCase::Upper,
    inline_pagination: false,
};

/// MySQL dialect.
#[derive(Debug, Clone)]
pub struct MySql {
    descriptor: DialectDescriptor,
}

impl MySql {
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

impl Default for MySql {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialect for MySql {
    fn descriptor(&self) -> &DialectDescriptor {
        &self.descriptor
    }

    fn map_type(&self, ty: &CanonicalType) -> TypeMapping {
        use CanonicalType as T;
        match ty {
            T::Boolean => TypeMapping::native("TINYINT(1)", false),
            T::Image => TypeMapping::native("LONGBLOB", false),
            T::Char
            | T::Varchar
            | T::NChar
            | T::NVarchar
            | T::Binary
            | T::VarBinary
            | T::Decimal
            | T::Numeric => TypeMapping::identity(ty, self.descriptor.type_case, true),
            other => TypeMapping::identity(other, self.descriptor.type_case, false),
        }
    }

    fn zero_default(&self, ty: &CanonicalType) -> Option<&'static str> {
        matches!(ty, CanonicalType::DateTime | CanonicalType::Timestamp)
            .then_some("DEFAULT '0000-00-00 00:00:00'")
    }
}
