//! Column-definition translation.
//!
//! Turns a [`ColumnSpec`] into the `name type [NOT NULL] [DEFAULT ..] ...`
//! fragment of a CREATE TABLE or ALTER TABLE statement for one dialect.

use tracing::warn;

use crate::column::{ColumnSpec, DefaultKind};
use crate::dialect::Dialect;
use crate::error::Result;

/// Translates a column specification using the dialect's type map and hooks.
///
/// Output is a pure function of the specification and the dialect.
///
/// # Errors
///
/// Fails when the specification does not validate (empty name, user-defined
/// default without a value).
pub fn translate<D: Dialect + ?Sized>(dialect: &D, column: &ColumnSpec) -> Result<String> {
    column.validate()?;

    let ty = &column.data_type;
    let mapping = dialect.map_type(ty);
    let mut field = vec![dialect.quote_identifier(&column.name)];

    match column.length {
        Some(length) if mapping.lengthed => field.push(format!("{}({length})", mapping.native)),
        _ => field.push(mapping.native.into_owned()),
    }

    let collate = column.collation.as_ref().map(|c| format!("COLLATE {c}"));
    if dialect.collation_follows_type() {
        field.extend(collate.clone());
    }

    match column.nullable {
        Some(false) if dialect.allows_not_null(ty) => field.push(String::from("NOT NULL")),
        Some(true) if dialect.explicit_null() => field.push(String::from("NULL")),
        _ => {}
    }

    match column.default_kind {
        DefaultKind::UserDefined => {
            let value = column.default_value.as_deref().unwrap_or_default();
            match dialect.zero_default(ty) {
                Some(zero) if is_zero_literal(value) => field.push(String::from(zero)),
                _ if value.eq_ignore_ascii_case("NULL") && column.nullable == Some(true) => {
                    field.push(String::from("DEFAULT NULL"));
                }
                _ => field.push(format!("DEFAULT '{}'", value.replace('\'', "''"))),
            }
        }
        DefaultKind::CurrentTimestamp => field.push(String::from("DEFAULT CURRENT_TIMESTAMP")),
        DefaultKind::Null if column.nullable == Some(true) => {
            field.push(String::from("DEFAULT NULL"));
        }
        DefaultKind::Null => {
            warn!(
                column = %column.name,
                dialect = dialect.name(),
                "DEFAULT NULL ignored on a column that is not declared nullable"
            );
        }
        DefaultKind::None => {}
    }

    if let Some(ref constraint) = column.constraint {
        field.push(constraint.clone());
    }

    if !dialect.collation_follows_type() {
        field.extend(collate);
    }

    if let Some(ref extra) = column.extra {
        field.push(extra.clone());
    }

    Ok(field.join(" "))
}

/// Returns true when the literal's leading integer is zero or absent
/// (`"0"`, `"0000-00-00 00:00:00"`, `""`).
fn is_zero_literal(value: &str) -> bool {
    let trimmed = value.trim_start();
    let unsigned = trimmed
        .strip_prefix('-')
        .or_else(|| trimmed.strip_prefix('+'))
        .unwrap_or(trimmed);
    unsigned
        .chars()
        .take_while(char::is_ascii_digit)
        .all(|c| c == '0')
}
