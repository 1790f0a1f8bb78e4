#![allow(dead_code)]

use std::sync::Arc;

use omnisql_core::column::{CanonicalType, ColumnSpec};
use omnisql_core::dialect::{Dialect, DialectKind, DialectOptions};

pub const ALL_KINDS: [DialectKind; 4] = [
    DialectKind::Firebird,
    DialectKind::Mssql,
    DialectKind::Mysql,
    DialectKind::Sqlite,
];

pub fn dialect(kind: DialectKind) -> Arc<dyn Dialect> {
    kind.build(&DialectOptions::default())
}

pub fn dialect_with(kind: DialectKind, options: &DialectOptions) -> Arc<dyn Dialect> {
    kind.build(options)
}

pub fn all_dialects() -> Vec<Arc<dyn Dialect>> {
    ALL_KINDS.into_iter().map(dialect).collect()
}

/// A small table definition exercising lengths, defaults and nullability.
pub fn users_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("id", CanonicalType::Int).not_null(),
        ColumnSpec::new("email", CanonicalType::Varchar)
            .length(255u32)
            .not_null(),
        ColumnSpec::new("active", CanonicalType::Boolean)
            .not_null()
            .default_value("1"),
        ColumnSpec::new("bio", CanonicalType::Text).nullable(true),
    ]
}
