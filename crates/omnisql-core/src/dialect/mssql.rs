//! Microsoft SQL Server dialect.

use super::{
    Dialect, DialectDescriptor, DialectOptions, Pagination, PlaceholderStyle, TypeCase, TypeMapping,
};
use crate::builder::{target, CreateDatabaseStatement};
use crate::column::CanonicalType;
use crate::error::{Result, SpecError};

const DESCRIPTOR: DialectDescriptor = DialectDescriptor {
    name: "mssql",
    quote_open: '[',
    quote_close: ']',
    placeholder: PlaceholderStyle::Positional,
    pagination: Pagination::OffsetFetch,
    type_case: TypeCase::Lower,
    inline_pagination: false,
};

/// Native types that accept a `(length)` suffix.
const LENGTHED: &[&str] = &[
    "char",
    "varchar",
    "nchar",
    "nvarchar",
    "decimal",
    "numeric",
    "datetime2",
    "time",
];

/// SQL Server dialect: bracket quotes, `OFFSET .. FETCH NEXT` pagination.
#[derive(Debug, Clone)]
pub struct MsSql {
    descriptor: DialectDescriptor,
}

impl MsSql {
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

impl Default for MsSql {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialect for MsSql {
    fn descriptor(&self) -> &DialectDescriptor {
        &self.descriptor
    }

    fn map_type(&self, ty: &CanonicalType) -> TypeMapping {
        use CanonicalType as T;
        match ty {
            T::Boolean => TypeMapping::native("tinyint", false),
            T::MediumInt => TypeMapping::native("int", false),
            T::Double => TypeMapping::native("float", false),
            T::TinyText | T::MediumText | T::LongText => TypeMapping::native("text", false),
            T::Timestamp => TypeMapping::native("datetime2", false),
            other => {
                let lengthed = LENGTHED.contains(&other.name().to_ascii_lowercase().as_str());
                TypeMapping::identity(other, self.descriptor.type_case, lengthed)
            }
        }
    }

    fn explicit_null(&self) -> bool {
        true
    }

    fn temporary_keyword(&self) -> Option<&'static str> {
        None
    }

    fn supports_if_not_exists(&self) -> bool {
        false
    }

    fn alter_keywords(&self) -> (&'static str, &'static str) {
        ("ADD", "DROP COLUMN")
    }

    fn render_create_database(&self, stmt: &CreateDatabaseStatement) -> Result<String> {
        let name = target(stmt.name.as_ref()).ok_or(SpecError::MissingName)?;
        let mut sql = format!("CREATE DATABASE {}", self.quote_identifier(name));
        if let Some(collation) = target(stmt.collation.as_ref()) {
            sql.push_str(" COLLATE ");
            sql.push_str(collation);
        }
        Ok(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{col, Create, Select};
    use crate::column::{ColumnSpec, Length};
    use crate::value::SqlValue;

    #[test]
    fn test_mssql_dialect() {
        let dialect = MsSql::new();
        assert_eq!(dialect.name(), "mssql");
        assert_eq!(dialect.quote_identifier("users"), "[users]");
    }

    #[test]
    fn test_boolean_with_backtick_override() {
        let options = DialectOptions {
            quotes: Some(('`', '`')),
            ..DialectOptions::default()
        };
        let dialect = MsSql::with_options(&options);
        let column = ColumnSpec::new("col", CanonicalType::Boolean);
        assert_eq!(dialect.field_spec(&column).unwrap(), "`col` tinyint");
    }

    #[test]
    fn test_type_map_and_lengths() {
        let dialect = MsSql::new();
        let ts = ColumnSpec::new("ts", CanonicalType::Timestamp).length(7u32);
        let name = ColumnSpec::new("name", CanonicalType::NVarchar).length(Length::Max);
        let price = ColumnSpec::new("price", CanonicalType::Decimal).length((10u32, 2u32));
        let custom = ColumnSpec::new("at", CanonicalType::from(String::from("DATETIME2"))).length(3u32);
        assert_eq!(dialect.field_spec(&ts).unwrap(), "[ts] datetime2");
        assert_eq!(dialect.field_spec(&name).unwrap(), "[name] nvarchar(max)");
        assert_eq!(dialect.field_spec(&price).unwrap(), "[price] decimal(10,2)");
        assert_eq!(dialect.field_spec(&custom).unwrap(), "[at] datetime2(3)");
    }

    #[test]
    fn test_explicit_nullability() {
        let dialect = MsSql::new();
        let nullable = ColumnSpec::new("a", CanonicalType::Int).nullable(true).default_null();
        let required = ColumnSpec::new("b", CanonicalType::Int).not_null();
        let unspecified = ColumnSpec::new("c", CanonicalType::Int);
        assert_eq!(dialect.field_spec(&nullable).unwrap(), "[a] int NULL DEFAULT NULL");
        assert_eq!(dialect.field_spec(&required).unwrap(), "[b] int NOT NULL");
        assert_eq!(dialect.field_spec(&unspecified).unwrap(), "[c] int");
    }

    #[test]
    fn test_default_null_on_required_column_is_omitted() {
        let dialect = MsSql::new();
        let column = ColumnSpec::new("a", CanonicalType::Int).not_null().default_null();
        assert_eq!(dialect.field_spec(&column).unwrap(), "[a] int NOT NULL");
    }

    #[test]
    fn test_select_synthesizes_order_by() {
        let dialect = MsSql::new();
        let rendered = Select::new(&dialect)
            .from("t")
            .limit(10)
            .offset(20)
            .render()
            .unwrap();
        assert_eq!(
            rendered.sql,
            "SELECT * FROM t ORDER BY 1 OFFSET ? ROWS FETCH NEXT ? ROWS ONLY"
        );
        assert_eq!(rendered.params, vec![SqlValue::Int(20), SqlValue::Int(10)]);
    }

    #[test]
    fn test_select_placeholders_in_text_order() {
        let dialect = MsSql::new();
        let rendered = Select::new(&dialect)
            .from("t")
            .filter(col("a").eq("x"))
            .limit(3)
            .render()
            .unwrap();
        assert_eq!(
            rendered.params,
            vec![
                SqlValue::Text(String::from("x")),
                SqlValue::Int(0),
                SqlValue::Int(3)
            ]
        );
    }

    #[test]
    fn test_create_database_collate() {
        let dialect = MsSql::new();
        let sql = Create::new(&dialect)
            .database("shop")
            .if_not_exists()
            .collate("Latin1_General_CI_AS")
            .sql()
            .unwrap();
        assert_eq!(sql, "CREATE DATABASE [shop] COLLATE Latin1_General_CI_AS");
    }

    #[test]
    fn test_create_table_trailing_primary_key() {
        let dialect = MsSql::new();
        let sql = Create::new(&dialect)
            .table("dbo.users")
            .temporary()
            .if_not_exists()
            .column(ColumnSpec::new("id", CanonicalType::Int).not_null())
            .column(ColumnSpec::new("active", CanonicalType::Boolean).nullable(true))
            .primary_key("id")
            .sql()
            .unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE [users] (\n\t[id] int NOT NULL,\n\t[active] tinyint NULL,\n\tPRIMARY KEY ([id])\n)"
        );
    }

    #[test]
    fn test_alter_keywords() {
        let dialect = MsSql::new();
        let dialect: &dyn Dialect = &dialect;
        let sql = dialect
            .alter()
            .table("users")
            .add_column(ColumnSpec::new("age", CanonicalType::SmallInt))
            .sql()
            .unwrap();
        assert_eq!(sql, "ALTER TABLE [users] ADD [age] smallint");
    }
}
