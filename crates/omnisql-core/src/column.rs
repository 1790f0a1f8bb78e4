//! Column specifications.
//!
//! A [`ColumnSpec`] describes one table column in dialect-neutral terms. The
//! active dialect turns it into a column-definition fragment through
//! [`crate::field::translate`].
//!
//! # Example
//!
//! ```rust
//! use omnisql_core::column::{CanonicalType, ColumnSpec};
//!
//! let spec = ColumnSpec::new("email", CanonicalType::Varchar)
//!     .length(255)
//!     .not_null()
//!     .constraint("UNIQUE");
//!
//! assert_eq!(spec.name, "email");
//! ```

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpecError};

/// A product-neutral column type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CanonicalType {
    /// 1-byte integer.
    TinyInt,
    /// 2-byte integer.
    SmallInt,
    /// 3-byte integer.
    MediumInt,
    /// 4-byte integer.
    Int,
    /// 8-byte integer.
    BigInt,
    /// Single precision float.
    Real,
    /// Double precision float.
    Double,
    /// Float of unspecified precision.
    Float,
    /// Exact decimal.
    Decimal,
    /// Exact numeric.
    Numeric,
    /// Boolean.
    Boolean,
    /// Fixed-length string.
    Char,
    /// Variable-length string.
    Varchar,
    /// Fixed-length national string.
    NChar,
    /// Variable-length national string.
    NVarchar,
    /// Fixed-length binary.
    Binary,
    /// Variable-length binary.
    VarBinary,
    /// Short text.
    TinyText,
    /// Text.
    Text,
    /// Medium text.
    MediumText,
    /// Long text.
    LongText,
    /// Binary large object.
    Blob,
    /// Image blob.
    Image,
    /// Date.
    Date,
    /// Time of day.
    Time,
    /// Date and time.
    DateTime,
    /// Timestamp.
    Timestamp,
    /// Any other type name, passed through to the dialect unchanged.
    Custom(String),
}

impl CanonicalType {
    /// Returns the canonical (upper case) type name.
    ///
    /// Custom types return their trimmed spelling as given.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::TinyInt => "TINYINT",
            Self::SmallInt => "SMALLINT",
            Self::MediumInt => "MEDIUMINT",
            Self::Int => "INT",
            Self::BigInt => "BIGINT",
            Self::Real => "REAL",
            Self::Double => "DOUBLE",
            Self::Float => "FLOAT",
            Self::Decimal => "DECIMAL",
            Self::Numeric => "NUMERIC",
            Self::Boolean => "BOOLEAN",
            Self::Char => "CHAR",
            Self::Varchar => "VARCHAR",
            Self::NChar => "NCHAR",
            Self::NVarchar => "NVARCHAR",
            Self::Binary => "BINARY",
            Self::VarBinary => "VARBINARY",
            Self::TinyText => "TINYTEXT",
            Self::Text => "TEXT",
            Self::MediumText => "MEDIUMTEXT",
            Self::LongText => "LONGTEXT",
            Self::Blob => "BLOB",
            Self::Image => "IMAGE",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::DateTime => "DATETIME",
            Self::Timestamp => "TIMESTAMP",
            Self::Custom(name) => name.as_str(),
        }
    }

    /// Returns true for date and time types.
    #[must_use]
    pub const fn is_temporal(&self) -> bool {
        matches!(
            self,
            Self::Date | Self::Time | Self::DateTime | Self::Timestamp
        )
    }
}

impl FromStr for CanonicalType {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let ty = match trimmed.to_ascii_uppercase().as_str() {
            "TINYINT" => Self::TinyInt,
            "SMALLINT" => Self::SmallInt,
            "MEDIUMINT" => Self::MediumInt,
            "INT" | "INTEGER" => Self::Int,
            "BIGINT" => Self::BigInt,
            "REAL" => Self::Real,
            "DOUBLE" => Self::Double,
            "FLOAT" => Self::Float,
            "DECIMAL" => Self::Decimal,
            "NUMERIC" => Self::Numeric,
            "BOOLEAN" | "BOOL" => Self::Boolean,
            "CHAR" => Self::Char,
            "VARCHAR" => Self::Varchar,
            "NCHAR" => Self::NChar,
            "NVARCHAR" => Self::NVarchar,
            "BINARY" => Self::Binary,
            "VARBINARY" => Self::VarBinary,
            "TINYTEXT" => Self::TinyText,
            "TEXT" => Self::Text,
            "MEDIUMTEXT" => Self::MediumText,
            "LONGTEXT" => Self::LongText,
            "BLOB" => Self::Blob,
            "IMAGE" => Self::Image,
            "DATE" => Self::Date,
            "TIME" => Self::Time,
            "DATETIME" => Self::DateTime,
            "TIMESTAMP" => Self::Timestamp,
            _ => Self::Custom(String::from(trimmed)),
        };
        Ok(ty)
    }
}

impl From<String> for CanonicalType {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(ty) => ty,
            Err(never) => match never {},
        }
    }
}

impl From<CanonicalType> for String {
    fn from(ty: CanonicalType) -> Self {
        match ty {
            CanonicalType::Custom(name) => name,
            other => String::from(other.name()),
        }
    }
}

impl fmt::Display for CanonicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Length or precision suffix of a column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "LengthRepr", into = "String")]
pub enum Length {
    /// A plain length, e.g. `VARCHAR(255)`.
    Size(u32),
    /// Precision and scale, e.g. `DECIMAL(10,2)`.
    Precision {
        /// Total number of digits.
        precision: u32,
        /// Digits after the decimal point.
        scale: u32,
    },
    /// The `max` length marker.
    Max,
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Size(n) => write!(f, "{n}"),
            Self::Precision { precision, scale } => write!(f, "{precision},{scale}"),
            Self::Max => f.write_str("max"),
        }
    }
}

impl FromStr for Length {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("max") {
            return Ok(Self::Max);
        }
        let invalid = || SpecError::InvalidLength(String::from(s));
        match trimmed.split_once(',') {
            Some((precision, scale)) => Ok(Self::Precision {
                precision: precision.trim().parse().map_err(|_| invalid())?,
                scale: scale.trim().parse().map_err(|_| invalid())?,
            }),
            None => trimmed.parse().map(Self::Size).map_err(|_| invalid()),
        }
    }
}

impl From<u32> for Length {
    fn from(n: u32) -> Self {
        Self::Size(n)
    }
}

impl From<(u32, u32)> for Length {
    fn from((precision, scale): (u32, u32)) -> Self {
        Self::Precision { precision, scale }
    }
}

impl From<Length> for String {
    fn from(length: Length) -> Self {
        length.to_string()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LengthRepr {
    Number(u32),
    Text(String),
}

impl TryFrom<LengthRepr> for Length {
    type Error = SpecError;

    fn try_from(repr: LengthRepr) -> Result<Self> {
        match repr {
            LengthRepr::Number(n) => Ok(Self::Size(n)),
            LengthRepr::Text(s) => s.parse(),
        }
    }
}

/// How a column's default value is produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DefaultKind {
    /// No default clause.
    #[default]
    None,
    /// A literal supplied in `default_value`.
    UserDefined,
    /// `DEFAULT CURRENT_TIMESTAMP`.
    CurrentTimestamp,
    /// `DEFAULT NULL`, honoured only on nullable columns.
    Null,
}

impl FromStr for DefaultKind {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "" | "NONE" => Ok(Self::None),
            "USER_DEFINED" => Ok(Self::UserDefined),
            "CURRENT_TIMESTAMP" => Ok(Self::CurrentTimestamp),
            "NULL" => Ok(Self::Null),
            _ => Err(SpecError::UnknownDefaultKind(String::from(s))),
        }
    }
}

/// A dialect-neutral description of one table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name.
    pub name: String,
    /// Canonical column type.
    #[serde(rename = "type")]
    pub data_type: CanonicalType,
    /// Optional length or precision.
    #[serde(default)]
    pub length: Option<Length>,
    /// `Some(false)` renders NOT NULL; `None` leaves nullability unspecified.
    #[serde(default)]
    pub nullable: Option<bool>,
    /// Constraint fragment appended verbatim (e.g. `UNIQUE`).
    #[serde(default)]
    pub constraint: Option<String>,
    /// Collation name.
    #[serde(default)]
    pub collation: Option<String>,
    /// Default kind.
    #[serde(default)]
    pub default_kind: DefaultKind,
    /// Literal for `DefaultKind::UserDefined`.
    #[serde(default)]
    pub default_value: Option<String>,
    /// Extra fragment appended verbatim after everything else.
    #[serde(default)]
    pub extra: Option<String>,
}

impl ColumnSpec {
    /// Creates a column with the given name and type and no other attributes.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: CanonicalType) -> Self {
        Self {
            name: name.into(),
            data_type,
            length: None,
            nullable: None,
            constraint: None,
            collation: None,
            default_kind: DefaultKind::None,
            default_value: None,
            extra: None,
        }
    }

    /// Sets the length or precision.
    #[must_use]
    pub fn length(mut self, length: impl Into<Length>) -> Self {
        self.length = Some(length.into());
        self
    }

    /// Sets nullability explicitly.
    #[must_use]
    pub const fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    /// Marks the column NOT NULL.
    #[must_use]
    pub const fn not_null(self) -> Self {
        self.nullable(false)
    }

    /// Appends a constraint fragment.
    #[must_use]
    pub fn constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraint = Some(constraint.into());
        self
    }

    /// Sets the collation.
    #[must_use]
    pub fn collation(mut self, collation: impl Into<String>) -> Self {
        self.collation = Some(collation.into());
        self
    }

    /// Sets a user-defined default literal.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_kind = DefaultKind::UserDefined;
        self.default_value = Some(value.into());
        self
    }

    /// Defaults the column to the current timestamp.
    #[must_use]
    pub fn default_current_timestamp(mut self) -> Self {
        self.default_kind = DefaultKind::CurrentTimestamp;
        self.default_value = None;
        self
    }

    /// Defaults the column to NULL.
    #[must_use]
    pub fn default_null(mut self) -> Self {
        self.default_kind = DefaultKind::Null;
        self.default_value = None;
        self
    }

    /// Appends an extra fragment (e.g. `AUTO_INCREMENT`).
    #[must_use]
    pub fn extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = Some(extra.into());
        self
    }

    /// Checks that the column specification is well formed.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::EmptyColumnName`] for a blank name and
    /// [`SpecError::MissingDefaultValue`] for a user-defined default without
    /// a value.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SpecError::EmptyColumnName);
        }
        if self.default_kind == DefaultKind::UserDefined && self.default_value.is_none() {
            return Err(SpecError::MissingDefaultValue(self.name.clone()));
        }
        Ok(())
    }
}
